//! Text output with greedy word wrapping.
//!
//! Text goes to the port as raw bytes, one byte per 6x8 character cell. Control characters
//! (newline, tab, backspace) are not interpreted, and would leave the cursor model wrong.
//!
//! A line that is too long for the space left is broken at the last space that fits, the part
//! before it written, and the cursor moved to the start of the line above (the device counts rows
//! upwards). After the last segment the modeled cursor is advanced by that segment's width, the
//! same amount the device moves its own cursor by.

use itertools::repeat_n;

use crate::command::consts::CHAR_HEIGHT;
use crate::command::write_iter;
use crate::config::Overflow;
use crate::display::{text_pixel_width, Display, PixelCoord};
use crate::error::Error;
use crate::interface::DisplayInterface;

/// Where to break a line that does not fit in the space left on it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Split {
    /// Break at the space at this index. The space itself is not written.
    At(usize),
    /// There is no space within reach; the `Overflow` policy decides.
    None,
}

impl Split {
    /// Find the last space among the first `max_chars` characters of `text`.
    pub fn find(text: &str, max_chars: usize) -> Split {
        Self::find_bytes(text.as_bytes(), max_chars)
    }

    fn find_bytes(text: &[u8], max_chars: usize) -> Split {
        let window = &text[..max_chars.min(text.len())];
        match window.iter().rposition(|&b| b == b' ') {
            Some(index) => Split::At(index),
            None => Split::None,
        }
    }
}

/// Options for `Display::write_text_with`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WriteOptions {
    clear: bool,
    right_justified: bool,
}

impl WriteOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear the screen first, then put the device cursor back where the model says it is.
    pub fn clear(self, clear: bool) -> Self {
        Self { clear, ..self }
    }

    /// Pad each line on the left with spaces so it ends at the last whole character cell.
    ///
    /// Padding moves the device cursor, but the model is still advanced by the unpadded width of
    /// the last line only.
    pub fn right_justified(self, right_justified: bool) -> Self {
        Self {
            right_justified,
            ..self
        }
    }
}

impl<DI> Display<DI>
where
    DI: DisplayInterface,
{
    /// Write `text` at the cursor, wrapping onto following lines as needed.
    pub fn write_text(&mut self, text: &str) -> Result<(), Error<DI::Error>> {
        self.write_text_with(text, WriteOptions::new())
    }

    /// Write `text` at the cursor with `options`, wrapping onto following lines as needed.
    ///
    /// An error aborts the write where it happened: lines already sent stay on the display, and
    /// the cursor model holds the last position that was fully set. In particular, running off
    /// the top of the screen fails with `Error::OutOfBounds` after the line before it was written.
    pub fn write_text_with(
        &mut self,
        text: &str,
        options: WriteOptions,
    ) -> Result<(), Error<DI::Error>> {
        if options.clear {
            self.clear_screen()?;
            let PixelCoord(x, y) = self.cursor;
            self.set_cursor(x, y)?;
        }

        let mut rest = text.as_bytes();
        while self.overflows(rest.len()) {
            let max_chars = self.remaining_char_count();
            let (line, tail) = match Split::find_bytes(rest, max_chars) {
                Split::At(index) => (&rest[..index], &rest[index + 1..]),
                Split::None => match self.overflow {
                    // `rest` is longer than `max_chars` whenever it overflows.
                    Overflow::Break => rest.split_at(max_chars.min(rest.len())),
                    Overflow::Error => {
                        warn!("no space to wrap at within {=usize} characters", max_chars);
                        return Err(Error::Layout { max_chars });
                    }
                },
            };
            self.write_segment(line, options.right_justified, max_chars)?;

            let PixelCoord(_, y) = self.cursor;
            debug!("wrapping from row {=i16}", y);
            self.set_cursor(0, y - CHAR_HEIGHT)?;
            rest = tail;
        }

        let width = self.remaining_char_count();
        self.write_segment(rest, options.right_justified, width)?;
        self.cursor.0 += text_pixel_width(rest.len()) as i16;
        Ok(())
    }

    /// Write one line's worth of text straight to the port, leaving the cursor model alone.
    fn write_segment(
        &mut self,
        segment: &[u8],
        right_justified: bool,
        width: usize,
    ) -> Result<usize, Error<DI::Error>> {
        let pad = if right_justified {
            width.saturating_sub(segment.len())
        } else {
            0
        };
        write_iter(
            &mut self.iface,
            repeat_n(b' ', pad).chain(segment.iter().cloned()),
        )
        .map_err(Error::Transport)
    }
}
