//! Digit-by-digit value editor shown on the character panel.
//!
//! Panel layout (16×2):
//!
//! ```text
//!   col 0123456789012345
//!   row0 008 000 000
//!   row1 ^              >
//!        ^ confirm      ^ leave
//! ```
//!
//! The cursor walks over the nine digit slots, then the confirm slot, then
//! the leave slot, wrapping at both ends. A click on a digit toggles the
//! digit sub-mode in which rotation changes that digit modulo 10.

use crate::config::DIGIT_COUNT;
use crate::hal::{CharDisplay, CursorStyle, Glyph};

/// Digit slots plus confirm and leave.
pub const SLOT_COUNT: usize = DIGIT_COUNT + 2;

/// Where the editor cursor is.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Slot {
    Digit(usize),
    Confirm,
    Leave,
}

/// What an input did to the editor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EditEvent {
    /// Input had no effect.
    Ignored,
    /// The cursor moved to another slot.
    Moved(Slot),
    /// A digit changed; carries the recomposed value.
    ValueChanged(i32),
    /// Digit sub-mode entered (`true`) or left (`false`).
    DigitMode(bool),
    /// Confirmation flag toggled to the carried state.
    Confirmed(bool),
    /// The user asked to leave the editor.
    Leave,
}

/// Split `value` into zero-padded decimal digits, most significant first.
///
/// Negative values are edited as zero.
pub fn decompose(value: i32) -> [u8; DIGIT_COUNT] {
    let mut digits = [0u8; DIGIT_COUNT];
    let mut n = value.max(0) as u32;
    for d in digits.iter_mut().rev() {
        *d = (n % 10) as u8;
        n /= 10;
    }
    digits
}

/// Concatenate digits back into an integer.
pub fn compose(digits: &[u8; DIGIT_COUNT]) -> i32 {
    digits.iter().fold(0i32, |n, &d| n * 10 + d as i32)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DigitEditor {
    digits: [u8; DIGIT_COUNT],
    cursor: usize,
    digit_mode: bool,
    confirmed: bool,
}

impl DigitEditor {
    pub fn new(value: i32) -> Self {
        Self {
            digits: decompose(value),
            cursor: 0,
            digit_mode: false,
            confirmed: false,
        }
    }

    pub fn value(&self) -> i32 {
        compose(&self.digits)
    }

    pub fn digits(&self) -> &[u8; DIGIT_COUNT] {
        &self.digits
    }

    pub fn slot(&self) -> Slot {
        slot_at(self.cursor)
    }

    pub fn in_digit_mode(&self) -> bool {
        self.digit_mode
    }

    pub fn is_confirmed(&self) -> bool {
        self.confirmed
    }

    /// Apply an encoder delta. Rotation is frozen while confirmed.
    pub fn rotate(&mut self, delta: i32) -> EditEvent {
        if delta == 0 || self.confirmed {
            return EditEvent::Ignored;
        }
        if self.digit_mode {
            let d = &mut self.digits[self.cursor];
            *d = (*d as i32 + delta).rem_euclid(10) as u8;
            return EditEvent::ValueChanged(self.value());
        }
        self.cursor = (self.cursor as i32 + delta).rem_euclid(SLOT_COUNT as i32) as usize;
        EditEvent::Moved(self.slot())
    }

    /// Apply a button click on the current slot.
    pub fn click(&mut self) -> EditEvent {
        match self.slot() {
            Slot::Digit(_) => {
                self.digit_mode = !self.digit_mode;
                EditEvent::DigitMode(self.digit_mode)
            }
            Slot::Confirm => {
                self.confirmed = !self.confirmed;
                EditEvent::Confirmed(self.confirmed)
            }
            Slot::Leave => EditEvent::Leave,
        }
    }

    /// Draw the static layout: digits, confirm and leave markers.
    pub fn draw_layout<P: CharDisplay>(&self, panel: &mut P) {
        panel.clear();
        for i in 0..DIGIT_COUNT {
            self.draw_digit(panel, i);
        }
        let (col, row) = panel_position(Slot::Confirm);
        panel.set_cursor(col, row);
        panel.write_glyph(Glyph::Bell);
        let (col, row) = panel_position(Slot::Leave);
        panel.set_cursor(col, row);
        panel.write_glyph(Glyph::Arrow);
    }

    /// Redraw a single digit.
    pub fn draw_digit<P: CharDisplay>(&self, panel: &mut P, index: usize) {
        let (col, row) = panel_position(Slot::Digit(index));
        let ch = [b'0' + self.digits[index]];
        panel.set_cursor(col, row);
        panel.write_str(core::str::from_utf8(&ch).unwrap_or("?"));
    }

    /// Park the panel cursor on the current slot.
    pub fn place_cursor<P: CharDisplay>(&self, panel: &mut P) {
        let (col, row) = panel_position(self.slot());
        panel.set_cursor(col, row);
        panel.set_cursor_style(if self.digit_mode {
            CursorStyle::Underline
        } else {
            CursorStyle::Blink
        });
    }
}

fn slot_at(index: usize) -> Slot {
    match index {
        i if i < DIGIT_COUNT => Slot::Digit(i),
        i if i == DIGIT_COUNT => Slot::Confirm,
        _ => Slot::Leave,
    }
}

/// Panel cell of a slot. Digits are grouped by three.
pub fn panel_position(slot: Slot) -> (u8, u8) {
    match slot {
        Slot::Digit(i) => ((i + i / 3) as u8, 0),
        Slot::Confirm => (0, 1),
        Slot::Leave => (15, 1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decompose_pads_with_leading_zeros() {
        assert_eq!(decompose(42), [0, 0, 0, 0, 0, 0, 0, 4, 2]);
        assert_eq!(decompose(0), [0; DIGIT_COUNT]);
        assert_eq!(decompose(160_000_000), [1, 6, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(decompose(-7), [0; DIGIT_COUNT]);
    }

    #[test]
    fn compose_inverts_decompose() {
        assert_eq!(compose(&decompose(42)), 42);
        assert_eq!(compose(&decompose(0)), 0);
        assert_eq!(compose(&decompose(999_999_999)), 999_999_999);
    }

    #[test]
    fn cursor_walks_digits_then_confirm_then_leave() {
        let mut ed = DigitEditor::new(0);
        assert_eq!(ed.slot(), Slot::Digit(0));
        for _ in 0..DIGIT_COUNT {
            ed.rotate(1);
        }
        assert_eq!(ed.slot(), Slot::Confirm);
        assert_eq!(ed.rotate(1), EditEvent::Moved(Slot::Leave));
        assert_eq!(ed.rotate(1), EditEvent::Moved(Slot::Digit(0)));
        assert_eq!(ed.rotate(-1), EditEvent::Moved(Slot::Leave));
    }

    #[test]
    fn digit_mode_wraps_modulo_ten() {
        let mut ed = DigitEditor::new(42);
        for _ in 0..8 {
            ed.rotate(1);
        }
        assert_eq!(ed.slot(), Slot::Digit(8));
        assert_eq!(ed.click(), EditEvent::DigitMode(true));
        assert_eq!(ed.rotate(-3), EditEvent::ValueChanged(49));
        assert_eq!(ed.rotate(1), EditEvent::ValueChanged(40));
        assert_eq!(ed.click(), EditEvent::DigitMode(false));
        assert_eq!(ed.rotate(1), EditEvent::Moved(Slot::Confirm));
    }

    #[test]
    fn most_significant_digit_changes_value_by_1e8() {
        let mut ed = DigitEditor::new(8000);
        ed.click();
        assert_eq!(ed.rotate(1), EditEvent::ValueChanged(100_008_000));
    }

    #[test]
    fn confirm_toggles_and_freezes_rotation() {
        let mut ed = DigitEditor::new(5);
        ed.rotate(-2);
        assert_eq!(ed.slot(), Slot::Confirm);
        assert_eq!(ed.click(), EditEvent::Confirmed(true));
        assert_eq!(ed.rotate(1), EditEvent::Ignored);
        assert_eq!(ed.click(), EditEvent::Confirmed(false));
        assert_eq!(ed.rotate(1), EditEvent::Moved(Slot::Leave));
        assert_eq!(ed.value(), 5);
    }

    #[test]
    fn leave_slot_requests_exit() {
        let mut ed = DigitEditor::new(5);
        ed.rotate(-1);
        assert_eq!(ed.click(), EditEvent::Leave);
    }

    #[test]
    fn panel_positions_group_digits() {
        let cols: heapless::Vec<u8, DIGIT_COUNT> = (0..DIGIT_COUNT)
            .map(|i| panel_position(Slot::Digit(i)).0)
            .collect();
        assert_eq!(cols.as_slice(), &[0, 1, 2, 4, 5, 6, 8, 9, 10]);
        assert_eq!(panel_position(Slot::Confirm), (0, 1));
        assert_eq!(panel_position(Slot::Leave), (15, 1));
    }
}
