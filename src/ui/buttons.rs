//! Encoder push-button state machine.
//!
//! The raw button level is sampled once per interaction cycle and turned
//! into edge and duration events:
//!
//! ```text
//!   level  ___/‾‾‾‾‾‾‾‾\___        ___/‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾\___
//!   pressed   ^                       ^
//!   released           ^                                   ^
//!   clicked            ^  (< hold)                         (no click)
//!   held                              ........‾‾‾‾‾‾‾‾‾‾‾‾‾  (≥ hold)
//! ```
//!
//! Every flag except `pressed_at` is recomputed on each sample. Electrical
//! debouncing is assumed to happen upstream.

use crate::config::BUTTON_HOLD_MS;

/// Events derived from the push button for the current cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ButtonState {
    pressed: bool,
    released: bool,
    clicked: bool,
    held: bool,
    /// Time (ms) of the last rising edge.
    pressed_at: Option<u64>,
    /// Level seen on the previous sample.
    level: bool,
    hold_ms: u64,
}

impl ButtonState {
    pub const fn new() -> Self {
        Self::with_hold_ms(BUTTON_HOLD_MS)
    }

    /// State machine with a custom hold threshold.
    pub const fn with_hold_ms(hold_ms: u64) -> Self {
        Self {
            pressed: false,
            released: false,
            clicked: false,
            held: false,
            pressed_at: None,
            level: false,
            hold_ms,
        }
    }

    /// Feed one raw sample (`true` = pressed) taken at `now_ms`.
    pub fn update(&mut self, level: bool, now_ms: u64) {
        let rising = level && !self.level;
        let falling = !level && self.level;

        if rising {
            self.pressed_at = Some(now_ms);
        }
        let elapsed = self.pressed_at.map(|t| now_ms.saturating_sub(t));

        self.pressed = rising;
        self.released = falling;
        self.clicked = falling && elapsed.is_some_and(|e| e < self.hold_ms);
        self.held = level && elapsed.is_some_and(|e| e >= self.hold_ms);
        self.level = level;
    }

    /// Rising edge on this cycle.
    pub fn pressed(&self) -> bool {
        self.pressed
    }

    /// Falling edge on this cycle.
    pub fn released(&self) -> bool {
        self.released
    }

    /// Still down past the hold threshold. Level-based.
    pub fn held(&self) -> bool {
        self.held
    }

    /// Whether a click is pending, without consuming it.
    pub fn clicked(&self) -> bool {
        self.clicked
    }

    /// Consume the pending click. Returns `true` at most once per click.
    pub fn take_click(&mut self) -> bool {
        core::mem::take(&mut self.clicked)
    }

    pub fn pressed_at(&self) -> Option<u64> {
        self.pressed_at
    }
}

impl Default for ButtonState {
    fn default() -> Self {
        Self::new()
    }
}
