//! Polled key debounce and event engine for the front-panel buttons.
//!
//! Each key runs a four-state machine driven by the raw pin level and the
//! time since the last state entry:
//!
//! ```text
//!            pressed              held > debounce & still pressed
//!   Idle ───────────▶ Debouncing ───────────────────▶ Pressed
//!    ▲                    │ released before debounce     │
//!    │◀───────────────────┘ (bounce rejected, no event)  │
//!    │                                                   │
//!    │  released → SingleClick                           │
//!    │◀──────────────────────────────────────────────────┤
//!    │                                held > long_press  │
//!    │         released (no event)        → LongPress    ▼
//!    └◀─────────────────────────────────────────── LongPressed
//! ```
//!
//! Raw levels come through the injected [`KeyInput`] capability, so the
//! engine has zero dependency on GPIO registers and runs in host tests
//! against scripted level tables. Events are buffered one per key and
//! delivered exactly once via [`KeyScanner::take_event`].
//!
//! Single-writer model: `scan()` is called from one context only (the
//! control tick); callers sharing a scanner across interrupt priorities
//! must serialise access themselves.

use heapless::Vec;

/// Upper bound on panel keys; the table is sized at construction.
pub const MAX_KEYS: usize = 8;

/// Raw pin-level capability. `true` means the key is physically pressed
/// (the adapter handles active-low inversion).
pub trait KeyInput {
    fn is_pressed(&mut self, key: u8) -> bool;
}

/// Semantic events produced by the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEvent {
    /// Released before the long-press interval elapsed.
    SingleClick,
    /// Held past the long-press interval. Fires once, on crossing.
    LongPress,
}

/// Per-key machine states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyState {
    Idle,
    Debouncing,
    Pressed,
    LongPressed,
}

#[derive(Debug, Clone, Copy)]
struct KeyRecord {
    state: KeyState,
    /// Timestamp (ms) of the last state entry; wrapping u32 arithmetic.
    entered_at_ms: u32,
    pending: Option<KeyEvent>,
}

impl KeyRecord {
    const fn new() -> Self {
        Self {
            state: KeyState::Idle,
            entered_at_ms: 0,
            pending: None,
        }
    }
}

/// Debounce/event engine for a fixed set of keys.
///
/// Owns all key records — no static state. One instance per panel.
pub struct KeyScanner {
    keys: Vec<KeyRecord, MAX_KEYS>,
    debounce_ms: u32,
    long_press_ms: u32,
}

impl KeyScanner {
    /// All keys start Idle with no pending event. `count` is capped at
    /// [`MAX_KEYS`].
    pub fn new(count: usize, debounce_ms: u32, long_press_ms: u32) -> Self {
        let mut keys = Vec::new();
        for _ in 0..count.min(MAX_KEYS) {
            // Capacity checked by the loop bound.
            let _ = keys.push(KeyRecord::new());
        }
        Self {
            keys,
            debounce_ms,
            long_press_ms,
        }
    }

    /// Number of monitored keys.
    pub fn key_count(&self) -> usize {
        self.keys.len()
    }

    /// Advance every key's state machine by one step.
    ///
    /// Call once per scheduler tick with the current monotonic time.
    /// Sets at most one pending event per key; an unread event is
    /// overwritten by a newer one.
    pub fn scan(&mut self, input: &mut impl KeyInput, now_ms: u32) {
        for (id, key) in self.keys.iter_mut().enumerate() {
            let pressed = input.is_pressed(id as u8);
            let elapsed = now_ms.wrapping_sub(key.entered_at_ms);

            match key.state {
                KeyState::Idle => {
                    if pressed {
                        key.state = KeyState::Debouncing;
                        key.entered_at_ms = now_ms;
                    }
                }

                KeyState::Debouncing => {
                    // Level is only sampled once the interval has elapsed;
                    // anything shorter is bounce and is discarded.
                    if elapsed > self.debounce_ms {
                        if pressed {
                            key.state = KeyState::Pressed;
                            key.entered_at_ms = now_ms;
                        } else {
                            key.state = KeyState::Idle;
                        }
                    }
                }

                KeyState::Pressed => {
                    if !pressed {
                        key.state = KeyState::Idle;
                        key.pending = Some(KeyEvent::SingleClick);
                    } else if elapsed > self.long_press_ms {
                        key.state = KeyState::LongPressed;
                        key.pending = Some(KeyEvent::LongPress);
                    }
                }

                KeyState::LongPressed => {
                    // The event already fired on entry; the release is silent.
                    if !pressed {
                        key.state = KeyState::Idle;
                    }
                }
            }
        }
    }

    /// Return and clear the pending event for `id`.
    ///
    /// Exactly-once delivery: an event set by `scan()` is handed out on the
    /// first call and cleared atomically with the read. Unknown ids yield
    /// `None` without touching any key state.
    pub fn take_event(&mut self, id: u8) -> Option<KeyEvent> {
        self.keys.get_mut(id as usize).and_then(|k| k.pending.take())
    }

    /// Current machine state for `id`; `None` for unknown ids.
    pub fn state(&self, id: u8) -> Option<KeyState> {
        self.keys.get(id as usize).map(|k| k.state)
    }
}
