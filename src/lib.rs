//! Driver library for graphic LCD modules fitted with a serial backpack that speaks the `0x7C`
//! command protocol.
//!
//! The device cannot report its cursor position, so the driver keeps a shadow copy of it and
//! lays text out against that model, wrapping words across lines of 6x8 pixel character cells.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate embedded_hal as hal;
extern crate nb;

#[macro_use]
mod log;

pub mod command;
pub mod config;
pub mod display;
pub mod error;
pub mod interface;

// Re-exports for primary API.
pub use command::{consts, BoxMode, Command};
pub use config::{Config, Overflow};
pub use display::text::{Split, WriteOptions};
pub use display::{Display, Geometry, PixelCoord};
pub use error::Error;
pub use interface::serial::SerialInterface;
pub use interface::DisplayInterface;
