//! Application-wide constants and compile-time configuration.
//!
//! All display geometry, timing parameters, capacities and hardware
//! assignments live here so they can be tuned in one place.

// Graphic display (SSD1306 128×64)

/// Display width in pixels.
pub const SCREEN_WIDTH: i32 = 128;

/// Display height in pixels.
pub const SCREEN_HEIGHT: i32 = 64;

/// Height of one menu row in pixels.
pub const ROW_HEIGHT: i32 = 16;

/// Glyph cell size of the menu font in pixels.
pub const FONT_WIDTH: i32 = 6;
pub const FONT_HEIGHT: i32 = 8;

/// Vertical offset that centres text inside a row.
pub const TEXT_BASELINE: i32 = (ROW_HEIGHT - FONT_HEIGHT) / 2;

/// Left text margin in pixels.
pub const MARGIN_LEFT: i32 = 5;

/// Number of menu rows that fit on the screen.
pub const VISIBLE_ROWS: usize = (SCREEN_HEIGHT / ROW_HEIGHT) as usize;

/// Visible columns of a scrolling label.
///
/// One column is lost to the left margin and one to the scrollbar.
pub const MARQUEE_WIDTH: usize = (SCREEN_WIDTH / FONT_WIDTH) as usize - 2;

// Character panel (digit editor)

/// Columns of the character panel.
pub const PANEL_COLUMNS: u8 = 16;

/// Rows of the character panel.
pub const PANEL_ROWS: u8 = 2;

/// Number of decimal digits the digit editor works with.
pub const DIGIT_COUNT: usize = 9;

// Menu capacities

/// Maximum number of top-level menus.
pub const MAX_MENUS: usize = 8;

/// Maximum number of items in one menu.
pub const MAX_ITEMS: usize = 8;

// Timing

/// Press duration (ms) at which a press becomes a hold.
pub const BUTTON_HOLD_MS: u64 = 2000;

/// Delay between interaction cycles when nothing animates (ms).
pub const TICK_IDLE_MS: u64 = 100;

/// Delay between interaction cycles while the item list is shown (ms).
pub const TICK_SCROLL_MS: u64 = 10;

/// How long the display stays inverted after a save (ms).
pub const FLASH_FEEDBACK_MS: u64 = 100;

// Audio

/// Key tone played on every cursor move when enabled.
pub const KEY_TONE_HZ: u32 = 3218;
pub const KEY_TONE_MS: u32 = 10;

/// Power-on chime: (frequency Hz, duration ms) pairs.
pub const INTRO_CHIME: [(u32, u32); 2] = [(1046, 150), (784, 150)];

/// Silence between chime notes (ms).
pub const INTRO_GAP_MS: u64 = 50;

// Encoder
//
//   Encoder A      → P0.03
//   Encoder B      → P0.04
//   Encoder button → P0.28 (active-low, internal pull-up)
//   Piezo          → P0.29 (PWM0)
//   OLED I²C       → TWISPI0 SDA P0.26 / SCL P0.27
//   Panel I²C      → TWISPI1 SDA P0.30 / SCL P0.31

/// Quadrature transitions per mechanical detent.
pub const STEPS_PER_NOTCH: i8 = 4;

/// Encoder sampling period (ms).
pub const ENCODER_SAMPLE_MS: u64 = 1;

// Persistent storage

/// Size in bytes of the persisted value image.
pub const STORE_IMAGE_SIZE: usize = 256;

/// Flash page index where the value image starts (4 KB per page on nRF52840).
pub const STORAGE_FLASH_PAGE_START: u32 = 240;

/// Number of flash pages reserved for the value image.
pub const STORAGE_FLASH_PAGE_COUNT: u32 = 4;
