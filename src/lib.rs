//! Library interface for rgb-macropad.
//!
//! Everything that does not need the RP2040 lives here: the controller
//! state machine, HID report types, the keypad driver (generic over
//! `embedded-hal` traits) and the default keymap. The firmware binary in
//! `main.rs` wires these to embassy-rp and embassy-usb.
//!
//! Usage: `cargo test` runs every module on the host.
//!
//! Note: the library is `no_std`; under `cfg(test)` it links `std` so tests
//! can use `Vec` and the standard harness.

#![cfg_attr(not(test), no_std)]

// Logging macros must be defined before the modules that use them.
#[macro_use]
mod fmt;

pub mod action;
pub mod blink;
pub mod color;
pub mod config;
pub mod controller;
pub mod emitter;
pub mod error;
pub mod feedback;
pub mod hid;
pub mod keymap;
pub mod keypad;
pub mod sampler;
pub mod timer;

#[cfg(test)]
mod testing;

pub use color::Rgb;
pub use controller::{Command, Macropad, Timing};
pub use error::Error;
