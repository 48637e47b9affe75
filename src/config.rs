//! Construction-time settings for a `Display`.

use crate::command::consts::DEFAULT_BAUDRATE;

/// What word wrapping does when a line holds no space to break at.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Overflow {
    /// Break the word at the end of the line. No character is dropped.
    Break,
    /// Give up with `Error::Layout` before writing the line.
    Error,
}

/// A configuration for the display. Every field has a default matching the stock backpack on a
/// 128x64 panel, and builder methods override them individually.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    pub(crate) baudrate: u32,
    pub(crate) width_px_count: u16,
    pub(crate) height_px_count: u16,
    pub(crate) overflow: Overflow,
}

impl Config {
    pub fn new() -> Self {
        Config {
            baudrate: DEFAULT_BAUDRATE,
            width_px_count: 128,
            height_px_count: 64,
            overflow: Overflow::Break,
        }
    }

    /// Extend this `Config` with the baud rate the port was opened at. Anything other than the
    /// default makes `Display::new` call `Display::set_baud_rate`.
    pub fn baudrate(self, baudrate: u32) -> Self {
        Self { baudrate, ..self }
    }

    /// Extend this `Config` with the panel size, as a pixel count on each axis. Both must be in
    /// 1-256 so every coordinate fits in a data byte.
    pub fn size(self, width_px_count: u16, height_px_count: u16) -> Self {
        Self {
            width_px_count,
            height_px_count,
            ..self
        }
    }

    /// Extend this `Config` with the policy for words longer than the rest of a line.
    pub fn overflow(self, overflow: Overflow) -> Self {
        Self { overflow, ..self }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
