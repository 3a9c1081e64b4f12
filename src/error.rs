//! Unified error type for knobmenu.
//!
//! We avoid `alloc` - all error variants carry only fixed-size data.
//! Implements `defmt::Format` for efficient on-target logging.

/// Top-level error type used across the crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    // Configuration
    /// More menus than `MAX_MENUS`.
    TooManyMenus,

    /// More items in one menu than `MAX_ITEMS`.
    TooManyItems,

    /// An item carries capability flags that cannot be combined.
    InvalidAttributes,

    /// `min > max`, or the initial value lies outside the range.
    InvalidRange,

    /// Labels must be plain ASCII.
    LabelNotAscii,

    // Storage
    /// Flash read/write/erase failed.
    Storage,
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let msg = match self {
            Error::TooManyMenus => "too many menus",
            Error::TooManyItems => "too many items in menu",
            Error::InvalidAttributes => "conflicting item attributes",
            Error::InvalidRange => "value range is invalid",
            Error::LabelNotAscii => "label is not ASCII",
            Error::Storage => "storage backend failed",
        };
        f.write_str(msg)
    }
}
