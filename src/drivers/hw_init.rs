//! One-shot hardware peripheral initialization.
//!
//! Configures GPIO directions and the LEDC motor PWM channel using raw
//! ESP-IDF sys calls. Called once from `main()` before the event loop
//! starts.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use log::info;

use crate::error::ActuatorError;
#[cfg(target_os = "espidf")]
use crate::error::InitError;
use crate::pins;

#[cfg(target_os = "espidf")]
pub fn init_peripherals() -> crate::error::Result<()> {
    // SAFETY: Called once from main() before event loop; single-threaded.
    unsafe {
        init_gpio_inputs()?;
        init_gpio_outputs()?;
        init_ledc()?;
    }
    info!("hw_init: all peripherals configured");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_peripherals() -> crate::error::Result<()> {
    log::info!("hw_init(sim): peripheral init skipped");
    Ok(())
}

// ── GPIO Inputs ───────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_gpio_inputs() -> Result<(), InitError> {
    // Panel keys: active-low, pulled up, no interrupt — they are polled by
    // the key scanner at control-tick rate.
    for &pin in &pins::KEY_GPIOS {
        let cfg = gpio_config_t {
            pin_bit_mask: 1u64 << pin,
            mode: gpio_mode_t_GPIO_MODE_INPUT,
            pull_up_en: gpio_pullup_t_GPIO_PULLUP_ENABLE,
            pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
            intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
        };
        let ret = unsafe { gpio_config(&cfg) };
        if ret != ESP_OK as i32 {
            return Err(InitError::GpioConfigFailed(ret));
        }
    }

    // Encoder pulse input: interrupt on rising edge, registered in
    // init_isr_service().
    let enc_cfg = gpio_config_t {
        pin_bit_mask: 1u64 << pins::ENCODER_PULSE_GPIO,
        mode: gpio_mode_t_GPIO_MODE_INPUT,
        pull_up_en: gpio_pullup_t_GPIO_PULLUP_ENABLE,
        pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
        intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
    };
    let ret = unsafe { gpio_config(&enc_cfg) };
    if ret != ESP_OK as i32 {
        return Err(InitError::GpioConfigFailed(ret));
    }

    info!("hw_init: GPIO inputs configured");
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn gpio_read(pin: i32) -> bool {
    // SAFETY: gpio_get_level is a read-only register access on an
    // already-configured input pin; safe to call from main context.
    (unsafe { gpio_get_level(pin) }) != 0
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_read(_pin: i32) -> bool {
    // Keys are active-low; a high level reads as "released" in simulation.
    true
}

// ── GPIO Outputs ──────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_gpio_outputs() -> Result<(), InitError> {
    let output_pins = [pins::MOTOR_IN1_GPIO, pins::MOTOR_IN2_GPIO];

    for &pin in &output_pins {
        let cfg = gpio_config_t {
            pin_bit_mask: 1u64 << pin,
            mode: gpio_mode_t_GPIO_MODE_OUTPUT,
            pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
            pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
            intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
        };
        let ret = unsafe { gpio_config(&cfg) };
        if ret != ESP_OK as i32 {
            return Err(InitError::GpioConfigFailed(ret));
        }
        // Both bridge inputs low = coast; the safe power-up state.
        unsafe { gpio_set_level(pin, 0) };
    }

    info!("hw_init: GPIO outputs configured");
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn gpio_write(pin: i32, high: bool) -> Result<(), ActuatorError> {
    // SAFETY: gpio_set_level writes to an already-configured output pin;
    // pin was validated during init_gpio_outputs(). Main-loop only.
    let ret = unsafe { gpio_set_level(pin, if high { 1 } else { 0 }) };
    if ret != ESP_OK as i32 {
        return Err(ActuatorError::GpioWriteFailed);
    }
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_write(_pin: i32, _high: bool) -> Result<(), ActuatorError> {
    Ok(())
}

// ── LEDC PWM ─────────────────────────────────────────────────

pub const LEDC_CH_MOTOR: u32 = 0;

#[cfg(target_os = "espidf")]
unsafe fn init_ledc() -> Result<(), InitError> {
    // Timer 0: motor PWM (25 kHz, 8-bit).
    // SAFETY: Called from single main-task context via init_peripherals().
    let timer0 = ledc_timer_config_t {
        speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
        timer_num: ledc_timer_t_LEDC_TIMER_0,
        duty_resolution: ledc_timer_bit_t_LEDC_TIMER_8_BIT,
        freq_hz: pins::MOTOR_PWM_FREQ_HZ,
        clk_cfg: soc_periph_ledc_clk_src_legacy_t_LEDC_AUTO_CLK,
        ..Default::default()
    };
    let ret = unsafe { ledc_timer_config(&timer0) };
    if ret != ESP_OK as i32 {
        return Err(InitError::LedcInitFailed);
    }

    let ret = unsafe {
        ledc_channel_config(&ledc_channel_config_t {
            speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
            channel: ledc_channel_t_LEDC_CHANNEL_0,
            timer_sel: ledc_timer_t_LEDC_TIMER_0,
            gpio_num: pins::MOTOR_PWM_GPIO,
            duty: 0,
            hpoint: 0,
            ..Default::default()
        })
    };
    if ret != ESP_OK as i32 {
        return Err(InitError::LedcInitFailed);
    }

    info!("hw_init: LEDC configured (motor=CH0)");
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn ledc_set(channel: u32, duty: u8) -> Result<(), ActuatorError> {
    // SAFETY: LEDC channel was configured in init_ledc(); duty register
    // writes are race-free since only the main loop calls this function.
    unsafe {
        if ledc_set_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, channel, duty as u32) != ESP_OK as i32 {
            return Err(ActuatorError::PwmWriteFailed);
        }
        if ledc_update_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, channel) != ESP_OK as i32 {
            return Err(ActuatorError::PwmWriteFailed);
        }
    }
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn ledc_set(_channel: u32, _duty: u8) -> Result<(), ActuatorError> {
    Ok(())
}

// ── GPIO ISR Service ──────────────────────────────────────────

#[cfg(target_os = "espidf")]
use crate::sensors::encoder::encoder_isr_handler;

#[cfg(target_os = "espidf")]
unsafe extern "C" fn encoder_gpio_isr(_arg: *mut core::ffi::c_void) {
    encoder_isr_handler();
}

/// Install the per-pin GPIO ISR service and register the encoder handler.
/// Call after init_peripherals() and before the event loop.
#[cfg(target_os = "espidf")]
pub fn init_isr_service() -> crate::error::Result<()> {
    // SAFETY: gpio_install_isr_service is idempotent; ESP_ERR_INVALID_STATE
    // means it was already installed (acceptable). The handler registered
    // below only increments a lock-free atomic counter.
    unsafe {
        let ret = gpio_install_isr_service(0);
        if ret != ESP_OK && ret != ESP_ERR_INVALID_STATE {
            return Err(InitError::IsrInstallFailed(ret).into());
        }

        gpio_set_intr_type(
            pins::ENCODER_PULSE_GPIO,
            gpio_int_type_t_GPIO_INTR_POSEDGE,
        );
        gpio_isr_handler_add(
            pins::ENCODER_PULSE_GPIO,
            Some(encoder_gpio_isr),
            core::ptr::null_mut(),
        );
        gpio_intr_enable(pins::ENCODER_PULSE_GPIO);

        info!("hw_init: ISR service installed (encoder)");
    }
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_isr_service() -> crate::error::Result<()> {
    log::info!("hw_init(sim): ISR service skipped");
    Ok(())
}
