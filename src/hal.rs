//! Collaborator interfaces consumed by the menu engine.
//!
//! The engine never touches pixels, pins or flash directly. The firmware
//! implements these traits on top of the SSD1306 drivers, the GPIO encoder
//! and the NVMC flash; host tests implement them with recording mocks.

use core::sync::atomic::{AtomicI32, Ordering};

/// Graphic display used for the menu lists.
///
/// Coordinates are in pixels, text `y` is the top of the glyph cell.
pub trait Renderer {
    fn clear(&mut self);
    /// Fill (or clear) a whole menu row.
    fn draw_filled_row(&mut self, row: usize, highlighted: bool);
    fn draw_text(&mut self, text: &str, x: i32, y: i32, inverted: bool);
    /// Scrollbar for a list of `count` entries with the cursor at `position`.
    fn draw_vertical_scrollbar(&mut self, count: usize, position: usize);
    /// Invert the whole panel (used as save feedback).
    fn set_inverted(&mut self, inverted: bool);
    /// Push the frame to the panel.
    fn present(&mut self);
}

/// Cursor appearance on the character panel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CursorStyle {
    Hidden,
    Blink,
    Underline,
}

/// Special symbols on the character panel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Glyph {
    /// Marks the confirm slot.
    Bell,
    /// Marks the leave slot.
    Arrow,
}

/// Character panel used by the digit editor.
pub trait CharDisplay {
    fn clear(&mut self);
    fn set_backlight(&mut self, on: bool);
    fn set_cursor(&mut self, col: u8, row: u8);
    fn write_str(&mut self, text: &str);
    fn write_glyph(&mut self, glyph: Glyph);
    fn set_cursor_style(&mut self, style: CursorStyle);
    fn present(&mut self) {}
}

/// Encoder and push button.
pub trait InputDevice {
    /// Net encoder steps since the last poll, zero if none.
    fn poll_rotation_delta(&mut self) -> i32;
    /// Raw button level, `true` while pressed.
    fn poll_raw_button_level(&mut self) -> bool;
}

/// Integer-addressed non-volatile store.
///
/// Byte width and endianness are up to the implementation.
pub trait PersistentStore {
    /// Returns the number of bytes written.
    fn write_int(&mut self, address: usize, value: i32) -> usize;
    /// Returns the value and the number of bytes read.
    fn read_int(&mut self, address: usize) -> (i32, usize);
}

/// Optional audio feedback.
pub trait Tone {
    fn play_tone(&mut self, frequency_hz: u32, duration_ms: u32);
}

/// A [`Tone`] that stays quiet.
#[derive(Clone, Copy, Debug, Default)]
pub struct Silent;

impl Tone for Silent {
    fn play_tone(&mut self, _frequency_hz: u32, _duration_ms: u32) {}
}

/// Encoder step accumulator shared between the sampling context and the
/// interaction loop.
///
/// The sampler `push`es signed steps; the loop `drain`s the net count once
/// per cycle. Both sides are lock-free.
pub struct RotaryAccumulator {
    steps: AtomicI32,
}

impl RotaryAccumulator {
    pub const fn new() -> Self {
        Self {
            steps: AtomicI32::new(0),
        }
    }

    pub fn push(&self, steps: i32) {
        self.steps.fetch_add(steps, Ordering::AcqRel);
    }

    /// Take the net steps accumulated so far, leaving zero behind.
    pub fn drain(&self) -> i32 {
        self.steps.swap(0, Ordering::AcqRel)
    }
}

impl Default for RotaryAccumulator {
    fn default() -> Self {
        Self::new()
    }
}
