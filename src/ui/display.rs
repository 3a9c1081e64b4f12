//! SSD1306 OLED drivers behind the engine's display traits.
//!
//! - [`Oled`]: 128×64 panel on TWISPI0, implements [`Renderer`].
//! - [`Panel`]: 128×32 panel on TWISPI1 used as a 16×2 character grid,
//!   implements [`CharDisplay`]. Cells are 8×16 pixels.

use crate::config::{PANEL_COLUMNS, PANEL_ROWS, ROW_HEIGHT, SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::hal::{CharDisplay, CursorStyle, Glyph, Renderer};
use embedded_graphics::mono_font::ascii::FONT_6X10;
use embedded_graphics::mono_font::{MonoTextStyle, MonoTextStyleBuilder};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Circle, PrimitiveStyle, Rectangle, Triangle};
use embedded_graphics::text::{Baseline, Text};
use ssd1306::mode::BufferedGraphicsMode;
use ssd1306::prelude::*;
use ssd1306::I2CDisplayInterface;
use ssd1306::Ssd1306;

/// Width of the scrollbar strip on the right edge.
const SCROLLBAR_WIDTH: i32 = 3;

/// Character cell on the panel.
const CELL_WIDTH: i32 = 8;
const CELL_HEIGHT: i32 = 16;

pub type OledDriver<I2C> =
    Ssd1306<I2CInterface<I2C>, DisplaySize128x64, BufferedGraphicsMode<DisplaySize128x64>>;

pub type PanelDriver<I2C> =
    Ssd1306<I2CInterface<I2C>, DisplaySize128x32, BufferedGraphicsMode<DisplaySize128x32>>;

fn text_style(color: BinaryColor) -> MonoTextStyle<'static, BinaryColor> {
    MonoTextStyleBuilder::new()
        .font(&FONT_6X10)
        .text_color(color)
        .build()
}

/// Menu display.
pub struct Oled<I2C> {
    display: OledDriver<I2C>,
}

impl<I2C> Oled<I2C>
where
    I2C: embedded_hal::i2c::I2c,
{
    /// Initialise the SSD1306 and clear the screen.
    pub fn new(i2c: I2C) -> Self {
        let interface = I2CDisplayInterface::new(i2c);
        let mut display = Ssd1306::new(interface, DisplaySize128x64, DisplayRotation::Rotate0)
            .into_buffered_graphics_mode();
        if display.init().is_err() {
            defmt::warn!("oled: init failed");
        }
        display.clear_buffer();
        let _ = display.flush();
        Self { display }
    }
}

impl<I2C> Renderer for Oled<I2C>
where
    I2C: embedded_hal::i2c::I2c,
{
    fn clear(&mut self) {
        self.display.clear_buffer();
    }

    fn draw_filled_row(&mut self, row: usize, highlighted: bool) {
        let color = if highlighted {
            BinaryColor::On
        } else {
            BinaryColor::Off
        };
        let _ = Rectangle::new(
            Point::new(0, row as i32 * ROW_HEIGHT),
            Size::new((SCREEN_WIDTH - SCROLLBAR_WIDTH) as u32, ROW_HEIGHT as u32),
        )
        .into_styled(PrimitiveStyle::with_fill(color))
        .draw(&mut self.display);
    }

    fn draw_text(&mut self, text: &str, x: i32, y: i32, inverted: bool) {
        let color = if inverted {
            BinaryColor::Off
        } else {
            BinaryColor::On
        };
        let _ = Text::with_baseline(text, Point::new(x, y), text_style(color), Baseline::Top)
            .draw(&mut self.display);
    }

    fn draw_vertical_scrollbar(&mut self, count: usize, position: usize) {
        if count == 0 {
            return;
        }
        let x = SCREEN_WIDTH - SCROLLBAR_WIDTH;
        let thumb = (SCREEN_HEIGHT / count as i32).max(2);
        let y = (position as i32 * SCREEN_HEIGHT / count as i32).min(SCREEN_HEIGHT - thumb);

        let _ = Rectangle::new(Point::new(x + 1, 0), Size::new(1, SCREEN_HEIGHT as u32))
            .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
            .draw(&mut self.display);
        let _ = Rectangle::new(
            Point::new(x, y),
            Size::new(SCROLLBAR_WIDTH as u32, thumb as u32),
        )
        .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
        .draw(&mut self.display);
    }

    fn set_inverted(&mut self, inverted: bool) {
        let _ = self.display.set_invert(inverted);
    }

    fn present(&mut self) {
        let _ = self.display.flush();
    }
}

/// Content of one panel cell.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Cell {
    Char(u8),
    Glyph(Glyph),
}

/// Character panel emulated on a small SSD1306.
pub struct Panel<I2C> {
    display: PanelDriver<I2C>,
    cells: [[Cell; PANEL_COLUMNS as usize]; PANEL_ROWS as usize],
    cursor: (u8, u8),
    style: CursorStyle,
    /// Blink phase, flipped on every present.
    blink: bool,
}

impl<I2C> Panel<I2C>
where
    I2C: embedded_hal::i2c::I2c,
{
    pub fn new(i2c: I2C) -> Self {
        let interface = I2CDisplayInterface::new(i2c);
        let mut display = Ssd1306::new(interface, DisplaySize128x32, DisplayRotation::Rotate0)
            .into_buffered_graphics_mode();
        if display.init().is_err() {
            defmt::warn!("panel: init failed");
        }
        display.clear_buffer();
        let _ = display.flush();
        Self {
            display,
            cells: [[Cell::Char(b' '); PANEL_COLUMNS as usize]; PANEL_ROWS as usize],
            cursor: (0, 0),
            style: CursorStyle::Hidden,
            blink: false,
        }
    }

    fn put(&mut self, cell: Cell) {
        let (col, row) = self.cursor;
        if col < PANEL_COLUMNS && row < PANEL_ROWS {
            self.cells[row as usize][col as usize] = cell;
            self.cursor.0 = col + 1;
        }
    }

    fn draw_glyph(&mut self, glyph: Glyph, origin: Point) {
        let fill = PrimitiveStyle::with_fill(BinaryColor::On);
        match glyph {
            Glyph::Bell => {
                let _ = Triangle::new(
                    origin + Point::new(4, 2),
                    origin + Point::new(0, 11),
                    origin + Point::new(7, 11),
                )
                .into_styled(fill)
                .draw(&mut self.display);
                let _ = Circle::new(origin + Point::new(2, 11), 3)
                    .into_styled(fill)
                    .draw(&mut self.display);
            }
            Glyph::Arrow => {
                let _ = Triangle::new(
                    origin + Point::new(1, 3),
                    origin + Point::new(6, 7),
                    origin + Point::new(1, 11),
                )
                .into_styled(fill)
                .draw(&mut self.display);
            }
        }
    }

    fn draw_cursor(&mut self) {
        let (col, row) = self.cursor;
        let origin = Point::new(col as i32 * CELL_WIDTH, row as i32 * CELL_HEIGHT);
        let area = match self.style {
            CursorStyle::Hidden => return,
            CursorStyle::Blink if !self.blink => return,
            CursorStyle::Blink => Rectangle::new(origin, Size::new(CELL_WIDTH as u32, CELL_HEIGHT as u32)),
            CursorStyle::Underline => Rectangle::new(
                origin + Point::new(0, CELL_HEIGHT - 2),
                Size::new(CELL_WIDTH as u32 - 1, 2),
            ),
        };
        let _ = area
            .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1))
            .draw(&mut self.display);
    }
}

impl<I2C> CharDisplay for Panel<I2C>
where
    I2C: embedded_hal::i2c::I2c,
{
    fn clear(&mut self) {
        self.cells = [[Cell::Char(b' '); PANEL_COLUMNS as usize]; PANEL_ROWS as usize];
        self.cursor = (0, 0);
    }

    fn set_backlight(&mut self, on: bool) {
        let _ = self.display.set_display_on(on);
    }

    fn set_cursor(&mut self, col: u8, row: u8) {
        self.cursor = (col.min(PANEL_COLUMNS - 1), row.min(PANEL_ROWS - 1));
    }

    fn write_str(&mut self, text: &str) {
        for b in text.bytes() {
            self.put(Cell::Char(b));
        }
    }

    fn write_glyph(&mut self, glyph: Glyph) {
        self.put(Cell::Glyph(glyph));
    }

    fn set_cursor_style(&mut self, style: CursorStyle) {
        self.style = style;
    }

    fn present(&mut self) {
        self.display.clear_buffer();
        for row in 0..PANEL_ROWS as usize {
            for col in 0..PANEL_COLUMNS as usize {
                let origin = Point::new(col as i32 * CELL_WIDTH, row as i32 * CELL_HEIGHT);
                match self.cells[row][col] {
                    Cell::Char(b' ') => {}
                    Cell::Char(b) => {
                        let ch = [b];
                        let text = core::str::from_utf8(&ch).unwrap_or("?");
                        let _ = Text::with_baseline(
                            text,
                            origin + Point::new(1, 3),
                            text_style(BinaryColor::On),
                            Baseline::Top,
                        )
                        .draw(&mut self.display);
                    }
                    Cell::Glyph(g) => self.draw_glyph(g, origin),
                }
            }
        }
        self.blink = !self.blink;
        self.draw_cursor();
        let _ = self.display.flush();
    }
}
