//! Screen composition for the graphic display.
//!
//! Every routine talks to the panel through [`Renderer`] only, so the same
//! code drives the SSD1306 on target and the recording mock in tests.

use crate::config::{FONT_WIDTH, MARGIN_LEFT, ROW_HEIGHT, SCREEN_WIDTH, TEXT_BASELINE, VISIBLE_ROWS};
use crate::hal::Renderer;
use crate::menu::{Attributes, Menu, MenuItem, MenuTree, VisibleList};
use crate::ui::marquee::Marquee;
use crate::ui::viewport::NavigationState;
use core::fmt::Write;
use heapless::String;

/// Top of the text cell for an on-screen row.
pub fn row_y(row: usize) -> i32 {
    ROW_HEIGHT * row as i32 + TEXT_BASELINE
}

fn text_width(text: &str) -> i32 {
    text.len() as i32 * FONT_WIDTH
}

/// Top-level list of menu titles with a `>` marker and a scrollbar.
pub fn draw_menus<R: Renderer>(r: &mut R, tree: &MenuTree, nav: NavigationState) {
    r.clear();
    r.draw_text(">", 0, row_y(nav.row), false);
    if !tree.is_empty() {
        r.draw_vertical_scrollbar(tree.len(), nav.cursor);
    }
    for (row, menu) in tree
        .menus()
        .iter()
        .skip(nav.scroll)
        .take(VISIBLE_ROWS)
        .enumerate()
    {
        r.draw_text(menu.title, MARGIN_LEFT * 2, row_y(row), false);
    }
    r.present();
}

/// Items of an open menu. The cursor row is highlighted; a scrollable
/// label under the cursor is drawn through the marquee instead of its
/// value preview.
pub fn draw_items<R: Renderer>(
    r: &mut R,
    menu: &Menu,
    visible: &VisibleList,
    nav: NavigationState,
    marquee: &mut Marquee,
) {
    r.clear();
    if !visible.is_empty() {
        r.draw_filled_row(nav.row, true);
    }
    for (row, &index) in visible
        .iter()
        .skip(nav.scroll)
        .take(VISIBLE_ROWS)
        .enumerate()
    {
        let Some(item) = menu.item(index) else {
            continue;
        };
        let selected = row == nav.row;
        let y = row_y(row);

        if selected && item.is_scrollable() && Marquee::overflows(item.label) {
            let frame = marquee.next_frame(item.label);
            r.draw_text(&frame, MARGIN_LEFT, y, true);
            continue;
        }

        r.draw_text(item.label, MARGIN_LEFT, y, selected);
        if item.shows_value() {
            let text = item.value_text();
            let x = SCREEN_WIDTH - text_width(&text) - MARGIN_LEFT;
            r.draw_text(&text, x, y, selected);
        }
    }
    r.present();
}

/// Two-state prompt with the current choice bracketed.
fn toggle_prompt(item: &MenuItem) -> &'static str {
    let on = item.value == 1;
    if item.has(Attributes::YES_NO) {
        if on {
            "<YES>    NO "
        } else {
            " YES    <NO>"
        }
    } else if on {
        "<ON>    OFF "
    } else {
        " ON    <OFF>"
    }
}

/// Value being adjusted, drawn over the item's row.
pub fn draw_value_overlay<R: Renderer>(r: &mut R, item: &MenuItem, row: usize) {
    r.draw_filled_row(row, true);
    let y = row_y(row);
    if item.is_toggle() {
        r.draw_text(toggle_prompt(item), MARGIN_LEFT * 2, y, true);
    } else {
        let mut text: String<12> = String::new();
        let _ = write!(text, "{}", item.value);
        let x = (SCREEN_WIDTH - text_width(&text)) / 2;
        r.draw_text(&text, x, y, true);
    }
    r.present();
}

/// Centred banner over one row (lock marker, "edit on panel" notice).
pub fn draw_row_banner<R: Renderer>(r: &mut R, text: &str, row: usize) {
    r.draw_filled_row(row, true);
    let x = (SCREEN_WIDTH - text_width(text)) / 2;
    r.draw_text(text, x, row_y(row), true);
    r.present();
}

/// Blank screen shown while idle.
pub fn draw_blank<R: Renderer>(r: &mut R) {
    r.clear();
    r.present();
}
