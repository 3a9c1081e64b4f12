//! Bouncing marquee for labels wider than the display.
//!
//! Each call to [`Marquee::next_frame`] yields one fixed-width window:
//!
//! ```text
//!   phase Left   [PU CLOCK FREQUENCY ]   head walks right, tail shown
//!                [U CLOCK FREQUENCY (]
//!                ...
//!                [)                  ]
//!   phase Right  [                   ]   prefix enters from the right edge
//!                [                  C]
//!                [                 CP]
//!                ...
//!                [CPU CLOCK FREQUENCY]   offset underflows → back to Left
//! ```
//!
//! The animation never ends; it restarts from the same state after one
//! full bounce. Labels are ASCII (validated when the menu is built).

use crate::config::MARQUEE_WIDTH;
use heapless::String;

/// One rendered window of the marquee.
pub type Frame = String<MARQUEE_WIDTH>;

/// Which half of the bounce is running.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Label slides out to the left.
    Left,
    /// Label slides back in from the right edge.
    Right,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Marquee {
    head: usize,
    tail: usize,
    direction: Direction,
    offset: usize,
}

impl Marquee {
    pub const fn new() -> Self {
        Self {
            head: 0,
            tail: 0,
            direction: Direction::Left,
            offset: MARQUEE_WIDTH,
        }
    }

    /// Restart the animation from the first frame.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn head(&self) -> usize {
        self.head
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Whether `text` is wide enough to need the marquee.
    pub fn overflows(text: &str) -> bool {
        text.len() > MARQUEE_WIDTH
    }

    /// Produce the next window over `text`.
    pub fn next_frame(&mut self, text: &str) -> Frame {
        let bytes = text.as_bytes();
        let mut buf = [b' '; MARQUEE_WIDTH];

        if self.direction == Direction::Left {
            self.head += 1;
            self.tail = bytes.len().saturating_sub(self.head);
            if self.tail == 0 {
                self.direction = Direction::Right;
                self.head = 0;
            } else {
                let n = self.tail.min(MARQUEE_WIDTH);
                buf[..n].copy_from_slice(&bytes[self.head..self.head + n]);
            }
        }

        if self.direction == Direction::Right {
            self.tail = bytes.len().min(MARQUEE_WIDTH - self.offset);
            buf[self.offset..self.offset + self.tail].copy_from_slice(&bytes[..self.tail]);
            if self.offset == 0 {
                self.direction = Direction::Left;
                self.offset = MARQUEE_WIDTH;
            } else {
                self.offset -= 1;
            }
        }

        let mut frame = Frame::new();
        for &b in &buf {
            // Capacity equals the window width.
            let _ = frame.push(b as char);
        }
        frame
    }
}

impl Default for Marquee {
    fn default() -> Self {
        Self::new()
    }
}
