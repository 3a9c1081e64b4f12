//! Rotary-encoder menu engine.
//!
//! The pure logic (menu model, viewport, marquee, digit editor, the
//! interaction state machine and persistence) builds and tests on the host
//! with no hardware attached. The `embedded` feature adds the nRF52840
//! drivers the firmware in `main.rs` plugs into the engine.
//!
//! Usage: `cargo test` on the host, `cargo run --release --features
//! embedded --target thumbv7em-none-eabihf` on the board.

#![cfg_attr(not(test), no_std)]

#[macro_use]
mod fmt;

pub mod config;
pub mod error;
pub mod hal;
pub mod menu;
pub mod persist;
pub mod ui;

#[cfg(feature = "embedded")]
pub mod storage;

pub use error::Error;
pub use menu::{Action, Attributes, Menu, MenuItem, MenuTree, Setting};
pub use ui::Engine;
