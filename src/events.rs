//! Interrupt-driven event system.
//!
//! Events are produced by:
//! - Timer callbacks (periodic control tick, telemetry)
//! - GPIO ISRs (encoder pulses are counted separately; the counter is
//!   sampled on the control tick, so no per-pulse event is queued)
//! - Software (loop housekeeping)
//!
//! Events are consumed by the main control loop, which processes them
//! one at a time in FIFO order.
//!
//! ```text
//! ┌─────────────┐     ┌──────────────┐     ┌──────────────┐
//! │ Timer task  │────▶│  Event Queue │────▶│  Main Loop   │
//! │ Software    │────▶│  (lock-free) │     │  (consumer)  │
//! └─────────────┘     └──────────────┘     └──────────────┘
//! ```

use core::sync::atomic::{AtomicU8, Ordering};

/// Maximum number of pending events.
/// Power of 2 for efficient ring buffer modulo.
const EVENT_QUEUE_CAP: usize = 32;

/// System event types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Event {
    /// Speed-loop control tick (key scan + PID + actuator update).
    ControlTick = 20,
    /// Telemetry report timer fired.
    TelemetryTick = 30,
}

// ── Lock-free SPSC ring buffer ────────────────────────────────
//
// Timer callbacks write (produce), main loop reads (consume).
// Uses atomic head/tail indices.  The buffer is intentionally
// kept in a static so timer callbacks can access it.

static EVENT_HEAD: AtomicU8 = AtomicU8::new(0);
static EVENT_TAIL: AtomicU8 = AtomicU8::new(0);
// SAFETY: EVENT_BUFFER is accessed under the SPSC discipline.
// Producer (push_event): timer-task context — one writer.
// Consumer (pop_event / drain_events): main-loop task — one reader.
// The acquire/release pairs on head and tail order the slot accesses.
static mut EVENT_BUFFER: [u8; EVENT_QUEUE_CAP] = [0; EVENT_QUEUE_CAP];

/// Push an event into the queue.
/// Safe to call from ISR or timer-task context (lock-free).
/// Returns `false` if the queue is full (event dropped).
pub fn push_event(event: Event) -> bool {
    let head = EVENT_HEAD.load(Ordering::Relaxed);
    let tail = EVENT_TAIL.load(Ordering::Acquire);
    let next_head = (head + 1) % EVENT_QUEUE_CAP as u8;

    if next_head == tail {
        return false; // Queue full — drop event.
    }

    // SAFETY: Only one producer writes slots, and the consumer never
    // reads a slot until the Release store below publishes it.
    unsafe {
        EVENT_BUFFER[head as usize] = event as u8;
    }

    EVENT_HEAD.store(next_head, Ordering::Release);
    true
}

/// Pop the next event from the queue.
/// Called from the main loop (single consumer).
/// Returns `None` if the queue is empty.
pub fn pop_event() -> Option<Event> {
    let tail = EVENT_TAIL.load(Ordering::Relaxed);
    let head = EVENT_HEAD.load(Ordering::Acquire);

    if tail == head {
        return None; // Empty.
    }

    let raw = unsafe { EVENT_BUFFER[tail as usize] };
    EVENT_TAIL.store((tail + 1) % EVENT_QUEUE_CAP as u8, Ordering::Release);

    event_from_u8(raw)
}

/// Drain all pending events into a callback.
/// Processes events in FIFO order.
pub fn drain_events(mut handler: impl FnMut(Event)) {
    while let Some(event) = pop_event() {
        handler(event);
    }
}

/// Check if the event queue is empty.
pub fn queue_is_empty() -> bool {
    let tail = EVENT_TAIL.load(Ordering::Relaxed);
    let head = EVENT_HEAD.load(Ordering::Acquire);
    tail == head
}

// ── Internal ──────────────────────────────────────────────────

fn event_from_u8(raw: u8) -> Option<Event> {
    match raw {
        20 => Some(Event::ControlTick),
        30 => Some(Event::TelemetryTick),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // The queue is a process-global static, so one test walks the whole
    // lifecycle; splitting it up would race under the parallel test runner.
    #[test]
    fn queue_lifecycle_fifo_and_overflow() {
        assert!(queue_is_empty());
        assert_eq!(pop_event(), None);

        // FIFO ordering.
        assert!(push_event(Event::ControlTick));
        assert!(push_event(Event::TelemetryTick));
        assert!(!queue_is_empty());
        assert_eq!(pop_event(), Some(Event::ControlTick));
        assert_eq!(pop_event(), Some(Event::TelemetryTick));
        assert_eq!(pop_event(), None);
        assert!(queue_is_empty());

        // One slot is sacrificed to distinguish full from empty, so the
        // usable capacity is CAP - 1.
        for i in 0..EVENT_QUEUE_CAP - 1 {
            assert!(push_event(Event::ControlTick), "push {i} rejected");
        }
        assert!(!push_event(Event::TelemetryTick), "full queue accepted a push");

        let mut drained = 0;
        drain_events(|event| {
            assert_eq!(event, Event::ControlTick);
            drained += 1;
        });
        assert_eq!(drained, EVENT_QUEUE_CAP - 1);
        assert!(queue_is_empty());
    }
}
