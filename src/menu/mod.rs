//! Menu tree model - menus, items and their capability flags.
//!
//! The tree is built once from static content and owned by the caller for
//! the whole program lifetime. The interaction engine only borrows it and
//! refers to items by index, never by copy.
//!
//! ## Shape
//!
//! ```text
//! MenuTree
//!  ├─ Menu "SETTINGS"  [item, item, "<-"]
//!  ├─ Menu "DISPLAY"   [item, label, item, "<-"]
//!  ├─ Menu "SAVE"      [button]   ← single button: acts at top level
//!  └─ Menu "EXIT"      [button]
//! ```

pub mod catalog;

use crate::config::{DIGIT_COUNT, MAX_ITEMS, MAX_MENUS};
use crate::error::Error;
use bitflags::bitflags;
use core::fmt::Write;
use heapless::{String, Vec};

bitflags! {
    /// Independent capabilities an item may carry.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Attributes: u8 {
        /// Has a value that can be opened and changed.
        const SELECTABLE = 1 << 0;
        /// Runs its action as soon as it is opened.
        const BUTTON     = 1 << 1;
        /// Decoration only; never listed for navigation.
        const LABEL      = 1 << 2;
        /// Two-state value shown as ON/OFF.
        const BOOLEAN    = 1 << 3;
        /// Two-state value shown as YES/NO.
        const YES_NO     = 1 << 4;
        /// Temporarily left out of the visible list.
        const HIDDEN     = 1 << 5;
        /// Needs a long press before it can be opened.
        const LOCKED     = 1 << 6;
        /// Long labels are animated with the marquee.
        const SCROLLABLE = 1 << 7;
    }
}

/// What happens when an item is opened.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Action {
    /// Nothing to do.
    None,
    /// Open the digit-by-digit editor on the character panel.
    EditDigits,
    /// Adjust the value with the encoder (counter or two-state toggle).
    Adjust,
    /// Return to the parent menu.
    LeaveMenu,
    /// Write every item value to the persistent store.
    Store,
    /// Reset navigation and park the UI.
    Exit,
}

/// Runtime option an item drives.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Setting {
    /// Cursor wraps around at both ends of a list.
    LoopMenu,
    /// Play a short tone on every cursor move.
    KeyTone,
}

/// Direction of one encoder step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Rotation {
    Up,
    Down,
}

impl Rotation {
    /// Direction of a non-zero encoder delta. Negative deltas move up.
    pub fn from_delta(delta: i32) -> Option<Self> {
        match delta {
            0 => None,
            d if d < 0 => Some(Rotation::Up),
            _ => Some(Rotation::Down),
        }
    }
}

/// Text of a value preview (`"OFF"`, `"YES"`, `"160000000"`, ...).
pub type ValueText = String<12>;

/// A leaf menu entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MenuItem {
    pub label: &'static str,
    pub value: i32,
    pub min: i32,
    pub max: i32,
    pub action: Action,
    pub attributes: Attributes,
    pub setting: Option<Setting>,
}

impl MenuItem {
    const fn base(label: &'static str, action: Action, attributes: Attributes) -> Self {
        Self {
            label,
            value: 0,
            min: 0,
            max: 0,
            action,
            attributes,
            setting: None,
        }
    }

    /// Numeric item edited digit by digit.
    pub const fn number(label: &'static str, value: i32, min: i32, max: i32) -> Self {
        let mut it = Self::base(label, Action::EditDigits, Attributes::SELECTABLE);
        it.value = value;
        it.min = min;
        it.max = max;
        it
    }

    /// Numeric item stepped by one per encoder detent.
    pub const fn counter(label: &'static str, value: i32, min: i32, max: i32) -> Self {
        let mut it = Self::base(label, Action::Adjust, Attributes::SELECTABLE);
        it.value = value;
        it.min = min;
        it.max = max;
        it
    }

    /// Two-state item shown as ON/OFF.
    pub const fn on_off(label: &'static str, on: bool) -> Self {
        let attrs = Attributes::SELECTABLE.union(Attributes::BOOLEAN);
        let mut it = Self::base(label, Action::Adjust, attrs);
        it.value = on as i32;
        it.max = 1;
        it
    }

    /// Two-state item shown as YES/NO.
    pub const fn yes_no(label: &'static str, yes: bool) -> Self {
        let attrs = Attributes::SELECTABLE.union(Attributes::YES_NO);
        let mut it = Self::base(label, Action::Adjust, attrs);
        it.value = yes as i32;
        it.max = 1;
        it
    }

    /// Item that runs `action` as soon as it is opened.
    pub const fn button(label: &'static str, action: Action) -> Self {
        Self::base(label, action, Attributes::BUTTON)
    }

    /// Non-interactive caption.
    pub const fn label(label: &'static str) -> Self {
        Self::base(label, Action::None, Attributes::LABEL)
    }

    /// Add capability flags.
    pub const fn with(mut self, attributes: Attributes) -> Self {
        self.attributes = self.attributes.union(attributes);
        self
    }

    /// Bind this item to a runtime option.
    pub const fn setting(mut self, setting: Setting) -> Self {
        self.setting = Some(setting);
        self
    }

    pub fn has(&self, attributes: Attributes) -> bool {
        self.attributes.intersects(attributes)
    }

    pub fn is_locked(&self) -> bool {
        self.has(Attributes::LOCKED)
    }

    /// Clear the lock flag. Idempotent.
    pub fn unlock(&mut self) {
        self.attributes.remove(Attributes::LOCKED);
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.attributes.set(Attributes::HIDDEN, !visible);
    }

    /// Whether the item takes part in navigation.
    pub fn is_listed(&self) -> bool {
        !self.has(Attributes::HIDDEN | Attributes::LABEL)
    }

    pub fn is_toggle(&self) -> bool {
        self.has(Attributes::BOOLEAN | Attributes::YES_NO)
    }

    /// Whether the item list shows a value preview for this item.
    pub fn shows_value(&self) -> bool {
        self.has(Attributes::SELECTABLE) && !self.has(Attributes::BUTTON | Attributes::LABEL)
    }

    /// Whether the label is eligible for the marquee.
    pub fn is_scrollable(&self) -> bool {
        self.shows_value() && self.has(Attributes::SCROLLABLE)
    }

    /// Inclusive value range; two-state items are always `0..=1`.
    pub fn bounds(&self) -> (i32, i32) {
        if self.is_toggle() {
            (0, 1)
        } else {
            (self.min, self.max)
        }
    }

    /// Apply one encoder step, clamped to [`bounds`](Self::bounds).
    ///
    /// Returns `true` if the value changed.
    pub fn adjust(&mut self, rotation: Rotation) -> bool {
        let (min, max) = self.bounds();
        let next = match rotation {
            Rotation::Up => self.value.saturating_add(1).min(max),
            Rotation::Down => self.value.saturating_sub(1).max(min),
        };
        let next = next.clamp(min, max);
        let changed = next != self.value;
        self.value = next;
        changed
    }

    /// Force the value back into [`bounds`](Self::bounds).
    pub fn clamp_value(&mut self) {
        let (min, max) = self.bounds();
        self.value = self.value.clamp(min, max);
    }

    /// Short textual form of the value for previews.
    pub fn value_text(&self) -> ValueText {
        let mut s = ValueText::new();
        if self.has(Attributes::BOOLEAN) {
            let _ = s.push_str(if self.value == 1 { "ON" } else { "OFF" });
        } else if self.has(Attributes::YES_NO) {
            let _ = s.push_str(if self.value == 1 { "YES" } else { "NO" });
        } else {
            let _ = write!(s, "{}", self.value);
        }
        s
    }

    /// Reject flag and range combinations that have no defined behaviour.
    pub fn validate(&self) -> Result<(), Error> {
        if !self.label.is_ascii() {
            return Err(Error::LabelNotAscii);
        }
        let a = self.attributes;
        if a.contains(Attributes::BOOLEAN | Attributes::YES_NO)
            || a.contains(Attributes::BUTTON | Attributes::LABEL)
            || (self.is_toggle() && self.action == Action::EditDigits)
        {
            return Err(Error::InvalidAttributes);
        }
        if self.is_toggle() && (self.min != 0 || self.max != 1) {
            return Err(Error::InvalidRange);
        }
        if self.action == Action::EditDigits && (self.min < 0 || self.max > max_digit_value()) {
            return Err(Error::InvalidRange);
        }
        if self.shows_value() && (self.min > self.max || !(self.min..=self.max).contains(&self.value))
        {
            return Err(Error::InvalidRange);
        }
        Ok(())
    }
}

/// Largest value the digit editor can represent.
const fn max_digit_value() -> i32 {
    let mut n: i32 = 0;
    let mut i = 0;
    while i < DIGIT_COUNT {
        n = n * 10 + 9;
        i += 1;
    }
    n
}

/// Indices into a [`Menu`]'s items that take part in navigation.
pub type VisibleList = Vec<usize, MAX_ITEMS>;

/// A titled, ordered list of items.
#[derive(Clone, Debug)]
pub struct Menu {
    pub title: &'static str,
    items: Vec<MenuItem, MAX_ITEMS>,
}

impl Menu {
    /// Build a menu, validating every item.
    pub fn new(title: &'static str, items: &[MenuItem]) -> Result<Self, Error> {
        if !title.is_ascii() {
            return Err(Error::LabelNotAscii);
        }
        let mut list = Vec::new();
        for item in items {
            item.validate()?;
            list.push(item.clone()).map_err(|_| Error::TooManyItems)?;
        }
        Ok(Self { title, items: list })
    }

    /// Number of items physically present, hidden or not.
    pub fn count(&self) -> usize {
        self.items.len()
    }

    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    pub fn items_mut(&mut self) -> &mut [MenuItem] {
        &mut self.items
    }

    pub fn item(&self, index: usize) -> Option<&MenuItem> {
        self.items.get(index)
    }

    pub fn item_mut(&mut self, index: usize) -> Option<&mut MenuItem> {
        self.items.get_mut(index)
    }

    /// A menu whose first item is a button acts as a top-level button.
    pub fn button(&self) -> Option<&MenuItem> {
        self.items.first().filter(|it| it.has(Attributes::BUTTON))
    }

    /// Recompute the navigable items, skipping hidden items and labels.
    pub fn visible_items(&self) -> VisibleList {
        build_visible_list(self)
    }
}

/// Filter out `HIDDEN` and `LABEL` items, keeping relative order.
pub fn build_visible_list(menu: &Menu) -> VisibleList {
    let mut list = VisibleList::new();
    for (i, item) in menu.items.iter().enumerate() {
        if item.is_listed() {
            // Cannot overflow: capacity matches the menu's own.
            let _ = list.push(i);
        }
    }
    list
}

/// The whole catalog of menus, in persistence order.
#[derive(Clone, Debug)]
pub struct MenuTree {
    menus: Vec<Menu, MAX_MENUS>,
}

impl MenuTree {
    pub fn new<I>(menus: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = Menu>,
    {
        let mut list = Vec::new();
        for menu in menus {
            list.push(menu).map_err(|_| Error::TooManyMenus)?;
        }
        Ok(Self { menus: list })
    }

    pub fn len(&self) -> usize {
        self.menus.len()
    }

    pub fn is_empty(&self) -> bool {
        self.menus.is_empty()
    }

    pub fn menus(&self) -> &[Menu] {
        &self.menus
    }

    pub fn menu(&self, index: usize) -> Option<&Menu> {
        self.menus.get(index)
    }

    pub fn menu_mut(&mut self, index: usize) -> Option<&mut Menu> {
        self.menus.get_mut(index)
    }

    /// Every item of every menu, menus first-to-last, items in order.
    pub fn items(&self) -> impl Iterator<Item = &MenuItem> {
        self.menus.iter().flat_map(|m| m.items.iter())
    }

    /// Mutable form of [`items`](Self::items), same order.
    pub fn items_mut(&mut self) -> impl Iterator<Item = &mut MenuItem> {
        self.menus.iter_mut().flat_map(|m| m.items.iter_mut())
    }

    /// Current value of the item bound to `setting`, if any.
    pub fn setting(&self, setting: Setting) -> Option<i32> {
        self.items()
            .find(|it| it.setting == Some(setting))
            .map(|it| it.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_menu() -> Menu {
        Menu::new(
            "TEST",
            &[
                MenuItem::counter("A", 1, 0, 5),
                MenuItem::label("--"),
                MenuItem::on_off("B", false).with(Attributes::HIDDEN),
                MenuItem::yes_no("C", true),
                MenuItem::button("<-", Action::LeaveMenu),
            ],
        )
        .unwrap()
    }

    #[test]
    fn visible_list_skips_hidden_and_labels() {
        let menu = sample_menu();
        let list = menu.visible_items();
        assert_eq!(list.as_slice(), &[0, 3, 4]);
        assert_eq!(menu.count(), 5);
    }

    #[test]
    fn visible_list_follows_visibility_changes() {
        let mut menu = sample_menu();
        menu.item_mut(2).unwrap().set_visible(true);
        assert_eq!(menu.visible_items().as_slice(), &[0, 2, 3, 4]);
        menu.item_mut(0).unwrap().set_visible(false);
        assert_eq!(menu.visible_items().as_slice(), &[2, 3, 4]);
    }

    #[test]
    fn unlock_is_idempotent() {
        let mut it = MenuItem::counter("X", 0, 0, 1).with(Attributes::LOCKED);
        assert!(it.is_locked());
        it.unlock();
        assert!(!it.is_locked());
        it.unlock();
        assert!(!it.is_locked());
        assert!(it.has(Attributes::SELECTABLE));
    }

    #[test]
    fn toggle_clamps_to_two_states() {
        let mut it = MenuItem::on_off("T", false);
        assert!(!it.adjust(Rotation::Down));
        assert_eq!(it.value, 0);
        assert!(it.adjust(Rotation::Up));
        assert_eq!(it.value, 1);
        assert!(!it.adjust(Rotation::Up));
        assert_eq!(it.value, 1);
    }

    #[test]
    fn counter_clamps_to_range() {
        let mut it = MenuItem::counter("CLOCK", 8000, 8000, 160_000_000);
        it.adjust(Rotation::Down);
        assert_eq!(it.value, 8000);
        it.adjust(Rotation::Up);
        assert_eq!(it.value, 8001);

        let mut top = MenuItem::counter("TOP", 10, 0, 10);
        top.adjust(Rotation::Up);
        assert_eq!(top.value, 10);
    }

    #[test]
    fn value_text_by_kind() {
        assert_eq!(MenuItem::on_off("A", true).value_text().as_str(), "ON");
        assert_eq!(MenuItem::on_off("A", false).value_text().as_str(), "OFF");
        assert_eq!(MenuItem::yes_no("A", true).value_text().as_str(), "YES");
        assert_eq!(MenuItem::yes_no("A", false).value_text().as_str(), "NO");
        assert_eq!(
            MenuItem::number("A", 160_000_000, 0, 999_999_999)
                .value_text()
                .as_str(),
            "160000000"
        );
        assert_eq!(MenuItem::counter("A", -3, -5, 5).value_text().as_str(), "-3");
    }

    #[test]
    fn conflicting_flags_are_rejected() {
        let both = MenuItem::on_off("X", false).with(Attributes::YES_NO);
        assert_eq!(both.validate(), Err(Error::InvalidAttributes));

        let mut digits_toggle = MenuItem::on_off("X", false);
        digits_toggle.action = Action::EditDigits;
        assert_eq!(digits_toggle.validate(), Err(Error::InvalidAttributes));

        let button_label = MenuItem::button("X", Action::None).with(Attributes::LABEL);
        assert_eq!(button_label.validate(), Err(Error::InvalidAttributes));
    }

    #[test]
    fn bad_ranges_are_rejected() {
        assert_eq!(
            MenuItem::counter("X", 0, 5, 1).validate(),
            Err(Error::InvalidRange)
        );
        assert_eq!(
            MenuItem::counter("X", 9, 0, 5).validate(),
            Err(Error::InvalidRange)
        );
        assert_eq!(
            MenuItem::number("X", 0, 0, i32::MAX).validate(),
            Err(Error::InvalidRange)
        );
        assert!(MenuItem::number("X", 0, 0, 999_999_999).validate().is_ok());
    }

    #[test]
    fn non_ascii_labels_are_rejected() {
        assert_eq!(
            MenuItem::label("Ünï").validate(),
            Err(Error::LabelNotAscii)
        );
        assert!(Menu::new("MENÜ", &[]).is_err());
    }

    #[test]
    fn capacities_are_enforced() {
        const FILLER: MenuItem = MenuItem::label("x");
        let items = [FILLER; MAX_ITEMS + 1];
        assert_eq!(Menu::new("BIG", &items).err(), Some(Error::TooManyItems));

        let menus = (0..MAX_MENUS + 1).map(|_| Menu::new("M", &[]).unwrap());
        assert_eq!(MenuTree::new(menus).err(), Some(Error::TooManyMenus));
    }

    #[test]
    fn tree_enumerates_items_in_menu_order() {
        let tree = MenuTree::new([
            Menu::new("A", &[MenuItem::counter("a1", 1, 0, 9), MenuItem::counter("a2", 2, 0, 9)])
                .unwrap(),
            Menu::new("B", &[MenuItem::counter("b1", 3, 0, 9)]).unwrap(),
        ])
        .unwrap();
        let values: heapless::Vec<i32, 4> = tree.items().map(|it| it.value).collect();
        assert_eq!(values.as_slice(), &[1, 2, 3]);
    }

    #[test]
    fn settings_are_looked_up_by_role() {
        let tree = MenuTree::new([Menu::new(
            "OPTS",
            &[
                MenuItem::yes_no("MENU LOOP", true).setting(Setting::LoopMenu),
                MenuItem::yes_no("KEY TONE", false).setting(Setting::KeyTone),
            ],
        )
        .unwrap()])
        .unwrap();
        assert_eq!(tree.setting(Setting::LoopMenu), Some(1));
        assert_eq!(tree.setting(Setting::KeyTone), Some(0));
    }

    #[test]
    fn single_button_menu_acts_as_button() {
        let save = Menu::new("SAVE", &[MenuItem::button("", Action::Store)]).unwrap();
        assert_eq!(save.button().map(|b| b.action), Some(Action::Store));
        assert!(sample_menu().button().is_none());
    }
}
