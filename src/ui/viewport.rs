//! Cursor and scroll window over a list of menu rows.
//!
//! ```text
//!   cursor                      cursor > last row:
//!     0  ┌──────────┐ row 0       scroll += 1, row stays pinned
//!     1  │          │ row 1       ┌──────────┐ 1
//!     2  │          │ row 2       │          │ 2
//!     3  └──────────┘ row 3       │          │ 3
//!     4                           └──────────┘ 4  ← cursor
//! ```
//!
//! Once the list scrolls, the cursor row is pinned to the bottom of the
//! window, so `scroll`, `row` and `cursor` always satisfy
//! `scroll <= cursor < scroll + rows` and `row == cursor - scroll`.

/// Absolute selection plus the scroll window that shows it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NavigationState {
    /// Index into the visible list.
    pub cursor: usize,
    /// Index of the first visible row.
    pub scroll: usize,
    /// On-screen row of the cursor.
    pub row: usize,
}

impl NavigationState {
    pub const fn new() -> Self {
        Self {
            cursor: 0,
            scroll: 0,
            row: 0,
        }
    }
}

/// Moves a [`NavigationState`] over a list of `len` entries shown through
/// a window of `rows` rows.
#[derive(Clone, Copy, Debug)]
pub struct Viewport {
    state: NavigationState,
    rows: usize,
    looping: bool,
    enabled: bool,
}

impl Viewport {
    pub const fn new(rows: usize) -> Self {
        Self {
            state: NavigationState::new(),
            rows,
            looping: false,
            enabled: true,
        }
    }

    pub fn state(&self) -> NavigationState {
        self.state
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Put back a previously saved state.
    pub fn restore(&mut self, state: NavigationState) {
        self.state = state;
    }

    /// Back to the first entry.
    pub fn reset(&mut self) {
        self.state = NavigationState::new();
    }

    /// Wrap around at both ends of the list.
    pub fn set_looping(&mut self, looping: bool) {
        self.looping = looping;
    }

    /// Disabled viewports ignore every move (used while editing).
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn usable(&self, len: usize) -> bool {
        self.enabled && self.rows > 0 && len > 0
    }

    /// Move the cursor one entry down. Returns `true` if it moved.
    pub fn advance(&mut self, len: usize) -> bool {
        if !self.usable(len) {
            return false;
        }
        let s = &mut self.state;

        if s.cursor + 1 >= len {
            if self.looping {
                *s = NavigationState::new();
                return true;
            }
            return false;
        }

        s.cursor += 1;
        if s.cursor >= self.rows {
            s.row = self.rows - 1;
            s.scroll += 1;
        } else {
            s.row += 1;
        }
        true
    }

    /// Move the cursor one entry up. Returns `true` if it moved.
    pub fn retreat(&mut self, len: usize) -> bool {
        if !self.usable(len) {
            return false;
        }
        let rows = self.rows;
        let s = &mut self.state;

        if s.cursor == 0 {
            if self.looping {
                s.cursor = len - 1;
                if len < rows {
                    s.row = s.cursor;
                    s.scroll = 0;
                } else {
                    s.row = rows - 1;
                    s.scroll = len - rows;
                }
                return true;
            }
            return false;
        }

        if s.cursor >= rows {
            s.row = rows - 1;
            s.scroll -= 1;
        } else {
            s.row -= 1;
        }
        s.cursor -= 1;
        true
    }

    /// Put the cursor on `index` of a `len` entry list, scrolling only as
    /// far as needed to show it. Works while disabled.
    pub fn select(&mut self, index: usize, len: usize) {
        if len == 0 || self.rows == 0 {
            self.reset();
            return;
        }
        let s = &mut self.state;
        s.cursor = index.min(len - 1);
        if s.cursor < s.scroll {
            s.scroll = s.cursor;
        } else if s.cursor >= s.scroll + self.rows {
            s.scroll = s.cursor + 1 - self.rows;
        }
        s.row = s.cursor - s.scroll;
    }

    /// Pull the cursor back inside a list that may have shrunk.
    pub fn fit(&mut self, len: usize) {
        if len == 0 || self.rows == 0 {
            self.reset();
            return;
        }
        let s = &mut self.state;
        if s.cursor < len {
            return;
        }
        s.cursor = len - 1;
        s.scroll = (s.cursor + 1).saturating_sub(self.rows);
        s.row = s.cursor - s.scroll;
    }
}
