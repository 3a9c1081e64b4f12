//! Interaction state machine.
//!
//! One call to [`Engine::tick`] is one interaction cycle:
//!
//! ```text
//!   sample button ─► locked item? ─► click advances step ─► rotation
//!        │                                                    │
//!        ▼                                                    ▼
//!   drain encoder once                          viewport or value adjust
//!                                                             │
//!   ┌─────────────────────── dispatch by step ◄───────────────┘
//!   │ Browse   draw menu titles
//!   │ Opening  enter the menu under the cursor, draw its items
//!   │ Editing  open the item under the cursor (adjust / digit editor / action)
//!   │ Closing  drop the edit state, back to Opening
//!   │ Idle     blank screen until the next click
//!   └──► re-sync runtime options, return the pacing hint
//! ```
//!
//! The engine borrows the [`MenuTree`] for its whole life and owns the
//! collaborators it draws and stores through.

use crate::config::{
    FLASH_FEEDBACK_MS, KEY_TONE_HZ, KEY_TONE_MS, TICK_IDLE_MS, TICK_SCROLL_MS, VISIBLE_ROWS,
};
use crate::hal::{CharDisplay, CursorStyle, InputDevice, PersistentStore, Renderer, Tone};
use crate::menu::{Action, MenuItem, MenuTree, Rotation, Setting, VisibleList};
use crate::persist;
use crate::ui::buttons::ButtonState;
use crate::ui::editor::{DigitEditor, EditEvent, Slot};
use crate::ui::marquee::Marquee;
use crate::ui::render;
use crate::ui::viewport::{NavigationState, Viewport};

/// Drawn over a locked item's row while the button is down.
const LOCK_GLYPH: &str = "X";

/// Shown on the graphic display while the digit editor runs on the panel.
const PANEL_BANNER: &str = "EDIT ON PANEL";

/// Interaction step. Clicks walk it forward, wrapping through `Idle`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Step {
    Browse,
    Opening,
    Editing,
    Closing,
    Idle,
}

impl Step {
    pub fn next(self) -> Self {
        match self {
            Step::Browse => Step::Opening,
            Step::Opening => Step::Editing,
            Step::Editing => Step::Closing,
            Step::Closing => Step::Idle,
            Step::Idle => Step::Browse,
        }
    }
}

/// What the open item is doing with the encoder.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EditState {
    /// Rotation steps the value (counter or two-state item).
    Adjust,
    /// Digit editor on the character panel.
    Digits(DigitEditor),
}

/// Open menu and the top-level navigation to return to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MenuStack {
    frame: Option<(usize, NavigationState)>,
}

impl MenuStack {
    pub fn push(&mut self, menu: usize, parent: NavigationState) {
        self.frame = Some((menu, parent));
    }

    pub fn pop(&mut self) -> Option<(usize, NavigationState)> {
        self.frame.take()
    }

    /// Index of the open menu, `None` at top level.
    pub fn current(&self) -> Option<usize> {
        self.frame.map(|(menu, _)| menu)
    }

    pub fn clear(&mut self) {
        self.frame = None;
    }
}

/// Interaction state carried from one cycle to the next.
#[derive(Clone, Debug)]
pub struct Context {
    pub step: Step,
    pub viewport: Viewport,
    pub stack: MenuStack,
    pub edit: Option<EditState>,
    /// Navigable items of the open menu.
    pub visible: VisibleList,
    /// Whether the item list must be redrawn this cycle.
    pub redraw: bool,
}

impl Context {
    pub fn new() -> Self {
        Self {
            step: Step::Browse,
            viewport: Viewport::new(VISIBLE_ROWS),
            stack: MenuStack::default(),
            edit: None,
            visible: VisibleList::new(),
            redraw: true,
        }
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

/// Runtime options driven by menu items tagged with a [`Setting`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Options {
    pub loop_menu: bool,
    pub key_tone: bool,
}

impl Options {
    pub fn from_tree(tree: &MenuTree) -> Self {
        let on = |s| tree.setting(s).is_some_and(|v| v != 0);
        Self {
            loop_menu: on(Setting::LoopMenu),
            key_tone: on(Setting::KeyTone),
        }
    }
}

/// Result of one interaction cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Tick {
    /// How long the drive loop should wait before the next cycle.
    pub pace_ms: u64,
}

pub struct Engine<'t, D, P, S, A> {
    tree: &'t mut MenuTree,
    ctx: Context,
    button: ButtonState,
    marquee: Marquee,
    options: Options,
    display: D,
    panel: P,
    store: S,
    audio: A,
    /// Display is inverted after a save and must be restored.
    flash_pending: bool,
}

impl<'t, D, P, S, A> Engine<'t, D, P, S, A>
where
    D: Renderer,
    P: CharDisplay,
    S: PersistentStore,
    A: Tone,
{
    pub fn new(tree: &'t mut MenuTree, display: D, panel: P, store: S, audio: A) -> Self {
        let mut engine = Self {
            tree,
            ctx: Context::new(),
            button: ButtonState::new(),
            marquee: Marquee::new(),
            options: Options::default(),
            display,
            panel,
            store,
            audio,
            flash_pending: false,
        };
        engine.panel.set_backlight(false);
        engine.sync_options();
        engine
    }

    /// Same as [`new`](Self::new) with a custom hold threshold.
    pub fn with_hold_ms(mut self, hold_ms: u64) -> Self {
        self.button = ButtonState::with_hold_ms(hold_ms);
        self
    }

    /// Run one interaction cycle at `now_ms`.
    pub fn tick<I: InputDevice>(&mut self, input: &mut I, now_ms: u64) -> Tick {
        if self.flash_pending {
            self.display.set_inverted(false);
            self.flash_pending = false;
        }

        let level = input.poll_raw_button_level();
        self.button.update(level, now_ms);
        let delta = input.poll_rotation_delta();

        let locked = self.handle_locked_item();
        let digits = matches!(self.ctx.edit, Some(EditState::Digits(_)));

        if !locked && !digits && self.button.take_click() {
            self.advance_step();
        }
        if !digits && !self.button.released() {
            if let Some(rotation) = Rotation::from_delta(delta) {
                self.rotate(rotation);
            }
        }

        match self.ctx.step {
            Step::Browse => self.browse(),
            Step::Opening => self.open_menu(),
            Step::Editing => self.open_item(delta),
            Step::Closing => self.close_item(),
            Step::Idle => self.idle(),
        }

        self.sync_options();
        Tick {
            pace_ms: self.pace(),
        }
    }

    /// Run an item action.
    pub fn execute(&mut self, action: Action) {
        match action {
            Action::LeaveMenu => self.leave_menu(),
            Action::Store => self.store_values(),
            Action::Exit => self.exit(),
            Action::None | Action::EditDigits | Action::Adjust => {}
        }
    }

    /// Write every item value to the store. Returns the bytes written.
    pub fn save(&mut self) -> usize {
        persist::save(&*self.tree, &mut self.store)
    }

    /// Read every item value back from the store. Returns the bytes read.
    pub fn load(&mut self) -> usize {
        let read = persist::load(self.tree, &mut self.store);
        self.refresh_visible();
        self.sync_options();
        read
    }

    /// Show or hide an item, refreshing the list if its menu is open.
    pub fn set_item_visible(&mut self, menu: usize, index: usize, visible: bool) {
        if let Some(item) = self.item_mut(menu, index) {
            item.set_visible(visible);
        }
        if self.ctx.stack.current() == Some(menu) {
            self.refresh_visible();
        }
    }

    pub fn step(&self) -> Step {
        self.ctx.step
    }

    pub fn navigation(&self) -> NavigationState {
        self.ctx.viewport.state()
    }

    pub fn open_menu_index(&self) -> Option<usize> {
        self.ctx.stack.current()
    }

    pub fn edit_state(&self) -> Option<&EditState> {
        self.ctx.edit.as_ref()
    }

    pub fn visible_items(&self) -> &VisibleList {
        &self.ctx.visible
    }

    pub fn options(&self) -> Options {
        self.options
    }

    pub fn tree(&self) -> &MenuTree {
        &*self.tree
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }

    pub fn panel(&self) -> &P {
        &self.panel
    }

    pub fn panel_mut(&mut self) -> &mut P {
        &mut self.panel
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn audio_mut(&mut self) -> &mut A {
        &mut self.audio
    }

    /// Item under the cursor of the open menu as `(menu, item)` indices.
    pub fn selected(&self) -> Option<(usize, usize)> {
        let menu = self.ctx.stack.current()?;
        let index = *self.ctx.visible.get(self.ctx.viewport.state().cursor)?;
        Some((menu, index))
    }

    fn item_mut(&mut self, menu: usize, index: usize) -> Option<&mut MenuItem> {
        self.tree.menu_mut(menu)?.item_mut(index)
    }

    fn selected_item_mut(&mut self) -> Option<&mut MenuItem> {
        let (menu, index) = self.selected()?;
        self.item_mut(menu, index)
    }

    fn sync_options(&mut self) {
        self.options = Options::from_tree(&*self.tree);
        self.ctx.viewport.set_looping(self.options.loop_menu);
    }

    fn pace(&self) -> u64 {
        if self.flash_pending {
            FLASH_FEEDBACK_MS
        } else if self.marquee_running() {
            TICK_SCROLL_MS
        } else {
            TICK_IDLE_MS
        }
    }

    /// The item list is on screen with a marquee label under the cursor.
    fn marquee_running(&self) -> bool {
        if self.ctx.step != Step::Opening {
            return false;
        }
        self.selected()
            .and_then(|(menu, index)| self.tree.menu(menu)?.item(index))
            .is_some_and(|item| item.is_scrollable() && Marquee::overflows(item.label))
    }

    /// Rebuild the open menu's list, keeping the cursor on the same item.
    ///
    /// An open edit follows its item; if that item is no longer listed the
    /// edit is closed first.
    fn refresh_visible(&mut self) {
        let selected = self.selected();
        let listed = selected
            .and_then(|(menu, index)| self.tree.menu(menu)?.item(index))
            .is_some_and(MenuItem::is_listed);
        if !listed && self.ctx.edit.is_some() {
            self.finish_edit();
            self.set_step(Step::Opening);
        }

        let Some(menu) = self.ctx.stack.current().and_then(|m| self.tree.menu(m)) else {
            return;
        };
        self.ctx.visible = menu.visible_items();
        let len = self.ctx.visible.len();
        let position = selected
            .and_then(|(_, index)| self.ctx.visible.iter().position(|&i| i == index));
        match position {
            Some(position) => self.ctx.viewport.select(position, len),
            None => self.ctx.viewport.fit(len),
        }
        self.ctx.redraw = true;
    }

    fn advance_step(&mut self) {
        let next = self.ctx.step.next();
        if next == Step::Browse {
            self.ctx.viewport.set_enabled(true);
        }
        self.set_step(next);
        self.ctx.redraw = true;
    }

    fn set_step(&mut self, next: Step) {
        if next != self.ctx.step {
            debug!("step {} -> {}", self.ctx.step, next);
        }
        self.ctx.step = next;
    }

    /// Locked item under the cursor: a press shows the lock glyph, a hold
    /// unlocks it and opens it. Returns `true` while clicks must be ignored.
    fn handle_locked_item(&mut self) -> bool {
        if self.ctx.step != Step::Opening {
            return false;
        }
        let row = self.ctx.viewport.state().row;
        let held = self.button.held();
        let pressed = self.button.pressed();
        let Some(item) = self.selected_item_mut() else {
            return false;
        };
        if !item.is_locked() {
            return false;
        }
        let label = item.label;

        if held {
            item.unlock();
            info!("unlocked {}", label);
            self.set_step(Step::Editing);
        } else if pressed {
            debug!("locked {}", label);
            render::draw_row_banner(&mut self.display, LOCK_GLYPH, row);
            self.ctx.redraw = false;
        }
        true
    }

    fn rotate(&mut self, rotation: Rotation) {
        match (self.ctx.step, self.ctx.edit) {
            (Step::Editing, Some(EditState::Adjust)) => {
                if let Some(item) = self.selected_item_mut() {
                    if item.adjust(rotation) {
                        trace!("{} = {}", item.label, item.value);
                    }
                }
            }
            (Step::Browse, None) => {
                let len = self.tree.len();
                self.move_cursor(rotation, len);
            }
            (Step::Opening, None) => {
                let len = self.ctx.visible.len();
                self.move_cursor(rotation, len);
            }
            _ => {}
        }
    }

    fn move_cursor(&mut self, rotation: Rotation, len: usize) {
        let moved = match rotation {
            Rotation::Up => self.ctx.viewport.retreat(len),
            Rotation::Down => self.ctx.viewport.advance(len),
        };
        if moved {
            self.key_tone();
        }
        self.ctx.redraw = true;
    }

    fn key_tone(&mut self) {
        if self.options.key_tone {
            self.audio.play_tone(KEY_TONE_HZ, KEY_TONE_MS);
        }
        self.marquee.reset();
    }

    fn browse(&mut self) {
        render::draw_menus(&mut self.display, &*self.tree, self.ctx.viewport.state());
    }

    fn open_menu(&mut self) {
        if self.ctx.stack.current().is_none() {
            let index = self.ctx.viewport.state().cursor;
            let Some(menu) = self.tree.menu(index) else {
                self.set_step(Step::Browse);
                return;
            };
            if let Some(action) = menu.button().map(|b| b.action) {
                debug!("menu {} acts as button", menu.title);
                self.set_step(Step::Browse);
                self.execute(action);
                return;
            }

            info!("enter {}", menu.title);
            self.ctx.visible = menu.visible_items();
            self.ctx.stack.push(index, self.ctx.viewport.state());
            self.ctx.viewport.reset();
            self.ctx.redraw = true;
            self.marquee.reset();
        }

        if self.ctx.redraw {
            self.draw_items();
        }
    }

    fn draw_items(&mut self) {
        let Some(menu) = self.ctx.stack.current().and_then(|m| self.tree.menu(m)) else {
            return;
        };
        render::draw_items(
            &mut self.display,
            menu,
            &self.ctx.visible,
            self.ctx.viewport.state(),
            &mut self.marquee,
        );
    }

    fn open_item(&mut self, delta: i32) {
        let Some((menu, index)) = self.selected() else {
            // Nothing listed, so nothing to open.
            self.leave_menu();
            return;
        };
        let row = self.ctx.viewport.state().row;

        if self.ctx.edit.is_none() {
            let Some(item) = self.tree.menu(menu).and_then(|m| m.item(index)) else {
                return;
            };
            if item.is_locked() {
                self.set_step(Step::Opening);
                self.ctx.redraw = true;
                return;
            }
            let (action, value, label) = (item.action, item.value, item.label);
            match action {
                Action::Adjust => {
                    info!("adjust {}", label);
                    self.ctx.edit = Some(EditState::Adjust);
                    self.ctx.viewport.set_enabled(false);
                }
                Action::EditDigits => {
                    info!("edit {} on panel", label);
                    let editor = DigitEditor::new(value);
                    render::draw_row_banner(&mut self.display, PANEL_BANNER, row);
                    self.panel.set_backlight(true);
                    editor.draw_layout(&mut self.panel);
                    editor.place_cursor(&mut self.panel);
                    self.panel.present();
                    self.ctx.edit = Some(EditState::Digits(editor));
                    self.ctx.viewport.set_enabled(false);
                    return;
                }
                other => {
                    self.execute(other);
                    if self.ctx.step == Step::Editing {
                        self.set_step(Step::Opening);
                        self.ctx.redraw = true;
                    }
                    return;
                }
            }
        }

        match self.ctx.edit {
            Some(EditState::Adjust) => {
                if let Some(item) = self.tree.menu(menu).and_then(|m| m.item(index)) {
                    render::draw_value_overlay(&mut self.display, item, row);
                }
            }
            Some(EditState::Digits(_)) => self.run_editor(delta, menu, index),
            None => {}
        }
    }

    fn run_editor(&mut self, delta: i32, menu: usize, index: usize) {
        let Some(EditState::Digits(editor)) = self.ctx.edit.as_mut() else {
            return;
        };

        if !self.button.released() {
            if let EditEvent::ValueChanged(value) = editor.rotate(delta) {
                if let Some(item) = self.tree.menu_mut(menu).and_then(|m| m.item_mut(index)) {
                    item.value = value;
                }
                if let Slot::Digit(i) = editor.slot() {
                    editor.draw_digit(&mut self.panel, i);
                }
            }
        }

        if self.button.take_click() {
            let event = editor.click();
            debug!("editor {}", event);
            if event == EditEvent::Leave {
                self.finish_edit();
                self.set_step(Step::Opening);
                return;
            }
        }

        editor.place_cursor(&mut self.panel);
        self.panel.present();
    }

    /// Drop the edit state and give the encoder back to navigation.
    fn finish_edit(&mut self) {
        if let Some(EditState::Digits(_)) = self.ctx.edit.take() {
            if let Some(item) = self.selected_item_mut() {
                item.clamp_value();
            }
            self.panel.set_cursor_style(CursorStyle::Hidden);
            self.panel.clear();
            self.panel.set_backlight(false);
            self.panel.present();
        }
        debug!("edit closed");
        self.ctx.viewport.set_enabled(true);
        self.ctx.redraw = true;
        self.marquee.reset();
    }

    fn close_item(&mut self) {
        self.finish_edit();
        self.set_step(Step::Opening);
    }

    fn leave_menu(&mut self) {
        self.ctx.edit = None;
        match self.ctx.stack.pop() {
            Some((menu, parent)) => {
                info!("leave menu {}", menu);
                self.ctx.viewport.restore(parent);
            }
            None => self.ctx.viewport.reset(),
        }
        self.ctx.viewport.fit(self.tree.len());
        self.ctx.viewport.set_enabled(true);
        self.ctx.visible.clear();
        self.set_step(Step::Browse);
        self.ctx.redraw = true;
        self.marquee.reset();
    }

    fn store_values(&mut self) {
        let written = self.save();
        info!("stored {} bytes", written);
        self.display.set_inverted(true);
        self.flash_pending = true;
    }

    fn exit(&mut self) {
        info!("exit");
        self.ctx.stack.clear();
        self.ctx.edit = None;
        self.ctx.visible.clear();
        self.ctx.viewport.reset();
        self.ctx.viewport.set_enabled(false);
        self.set_step(Step::Idle);
        self.ctx.redraw = true;
        self.marquee.reset();
    }

    fn idle(&mut self) {
        if self.ctx.redraw {
            render::draw_blank(&mut self.display);
            self.ctx.redraw = false;
        }
    }
}
