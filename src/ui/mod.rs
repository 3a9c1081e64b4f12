//! User interface subsystem - rotary encoder, OLED and character panel.
//!
//! The interaction engine runs one cycle per tick, turning encoder steps
//! and button events into navigation, value edits and draw calls.
//!
//! ## Components
//!
//! - **Buttons**: push-button click/hold detection
//! - **Viewport**: cursor and scroll window over a list
//! - **Marquee**: bouncing animation for long labels
//! - **Editor**: digit-by-digit value editor on the character panel
//! - **Render**: screen composition over the [`Renderer`](crate::hal::Renderer) trait
//! - **Engine**: the Browse → Opening → Editing → Closing state machine
//! - **Encoder**: quadrature decoding, plus the GPIO sampling task on target
//! - **Display**, **Piezo** (embedded only): SSD1306 and PWM drivers behind
//!   the collaborator traits

pub mod buttons;
pub mod editor;
pub mod encoder;
pub mod engine;
pub mod marquee;
pub mod render;
pub mod viewport;

#[cfg(feature = "embedded")]
pub mod display;
#[cfg(feature = "embedded")]
pub mod piezo;

pub use engine::{Engine, Step, Tick};
