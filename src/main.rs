//! DriveBase Firmware — Main Entry Point
//!
//! Hexagonal architecture with event-driven execution.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                   Adapters (outer ring)                  │
//! │                                                          │
//! │  HardwareAdapter          LogEventSink    Esp32Time      │
//! │  (Sensor+Motor+KeyInput)  (EventSink)     (clock)        │
//! │                                                          │
//! │  ─────────────── Port Trait Boundary ───────────────     │
//! │                                                          │
//! │  ┌────────────────────────────────────────────────┐      │
//! │  │           AppService (pure logic)              │      │
//! │  │  KeyScanner · PID speed loop · target state    │      │
//! │  └────────────────────────────────────────────────┘      │
//! └──────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use log::info;

use drivebase::adapters::hardware::HardwareAdapter;
use drivebase::adapters::log_sink::LogEventSink;
use drivebase::adapters::time::Esp32TimeAdapter;
use drivebase::app::events::AppEvent;
use drivebase::app::ports::EventSink;
use drivebase::app::service::AppService;
use drivebase::config::SystemConfig;
use drivebase::drivers::hbridge::HBridgeDriver;
use drivebase::drivers::{hw_init, hw_timer};
use drivebase::events::{self, Event};
use drivebase::pins;
use drivebase::sensors::encoder::EncoderSensor;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("DriveBase v{}", env!("CARGO_PKG_VERSION"));

    let config = SystemConfig::default();

    // ── 2. Initialise hardware peripherals ────────────────────
    if let Err(e) = hw_init::init_peripherals() {
        // Peripheral init failure is critical — log and halt.
        // In production this triggers the watchdog reset after timeout.
        log::error!("HAL init failed: {} — halting", e);
        #[allow(clippy::empty_loop)]
        loop {}
    }
    if let Err(e) = hw_init::init_isr_service() {
        log::error!("ISR service init failed: {} — continuing without encoder", e);
    }
    hw_timer::start_timers(config.control_loop_interval_ms);

    // ── 3. Construct adapters ─────────────────────────────────
    let mut hw = HardwareAdapter::new(
        EncoderSensor::new(pins::ENCODER_PULSE_GPIO),
        HBridgeDriver::new(),
    );
    let mut log_sink = LogEventSink::new();
    let time_adapter = Esp32TimeAdapter::new();

    // ── 4. Construct app service ──────────────────────────────
    let mut app = AppService::new(config.clone());
    app.start(&mut log_sink);

    info!("System ready. Entering event loop.");

    // ── 5. Event loop ─────────────────────────────────────────
    let ticks_per_telemetry =
        u64::from(config.telemetry_interval_secs) * 1000 / u64::from(config.control_loop_interval_ms);
    let mut telemetry_counter: u64 = 0;

    loop {
        // Simulate timer interrupts via sleep on non-espidf targets.
        // On real hardware, the CPU idles until the esp_timer callback
        // pushes the next tick.
        #[cfg(not(target_os = "espidf"))]
        {
            std::thread::sleep(std::time::Duration::from_millis(u64::from(
                config.control_loop_interval_ms,
            )));
            events::push_event(Event::ControlTick);
        }

        #[cfg(target_os = "espidf")]
        {
            // The control tick arrives from the esp_timer task; yield the
            // CPU briefly so the idle task can feed the watchdog.
            std::thread::sleep(std::time::Duration::from_millis(1));
        }

        // Process all pending events.
        events::drain_events(|event| match event {
            Event::ControlTick => {
                let now_ms = time_adapter.uptime_ms();
                app.tick(&mut hw, now_ms, &mut log_sink);

                telemetry_counter += 1;
                if telemetry_counter >= ticks_per_telemetry {
                    telemetry_counter = 0;
                    events::push_event(Event::TelemetryTick);
                }
            }

            Event::TelemetryTick => {
                let t = app.build_telemetry();
                log_sink.emit(&AppEvent::Telemetry(t));
            }
        });
    }
}
