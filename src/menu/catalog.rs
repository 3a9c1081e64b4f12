//! Menu content shipped with the firmware.
//!
//! The order of menus and items here is also the order values are laid
//! out in the persistent store, so append new entries at the end.

use super::{Action, Attributes, Menu, MenuItem, MenuTree, Setting};
use crate::error::Error;

/// Build the firmware's menu tree.
pub fn default_tree() -> Result<MenuTree, Error> {
    MenuTree::new([
        Menu::new(
            "SETTINGS",
            &[
                MenuItem::number("CPU CLOCK FREQUENCY (HZ)", 8000, 8000, 160_000_000)
                    .with(Attributes::SCROLLABLE),
                MenuItem::counter("CALIBRATION", 0, -50, 50).with(Attributes::LOCKED),
                MenuItem::button("<-", Action::LeaveMenu),
            ],
        )?,
        Menu::new(
            "DISPLAY",
            &[
                MenuItem::yes_no("MENU LOOP", false).setting(Setting::LoopMenu),
                MenuItem::yes_no("KEY TONE", false).setting(Setting::KeyTone),
                MenuItem::counter("CONTRAST", 8, 0, 15),
                MenuItem::label("FACTORY").with(Attributes::HIDDEN),
                MenuItem::button("<-", Action::LeaveMenu),
            ],
        )?,
        Menu::new("SAVE", &[MenuItem::button("", Action::Store)])?,
        Menu::new("EXIT", &[MenuItem::button("", Action::Exit)])?,
    ])
}
