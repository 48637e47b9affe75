//! Errors returned by the display driver.

use core::fmt;

/// Driver error, generic over the error type `E` of the underlying port.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// A cursor position outside the screen was requested. Nothing was sent for the rejected
    /// request, though earlier steps of a multi-step operation may already have been written.
    OutOfBounds { x: i16, y: i16 },
    /// Word wrapping found no space to break at within `max_chars` characters, and the
    /// configured `Overflow` policy forbids splitting mid-word.
    Layout { max_chars: usize },
    /// The port failed to write.
    Transport(E),
}

impl<E: fmt::Debug> fmt::Display for Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::OutOfBounds { x, y } => write!(f, "cursor position ({}, {}) is off screen", x, y),
            Error::Layout { max_chars } => {
                write!(f, "no space to wrap at within {} characters", max_chars)
            }
            Error::Transport(e) => write!(f, "transport error: {:?}", e),
        }
    }
}

#[cfg(feature = "std")]
impl<E: fmt::Debug> std::error::Error for Error<E> {}
