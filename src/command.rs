//! The command set of the serial backpack.
//!
//! Every command goes out as `[CONTROL_BYTE, opcode, data...]`: no length prefix, no checksum, and
//! the device never answers. Data bytes are passed through exactly as given.

use crate::interface::DisplayInterface;

pub mod consts {
    /// Prefix byte of every command packet.
    pub const CONTROL_BYTE: u8 = 0x7C;

    pub const OP_CLEAR_SCREEN: u8 = 0x00;
    pub const OP_SET_BACKLIGHT: u8 = 0x02;
    pub const OP_DRAW_BOX: u8 = 0x0F;
    pub const OP_SET_CURSOR_X: u8 = 0x18;
    pub const OP_SET_CURSOR_Y: u8 = 0x19;

    /// Baud rate the backpack ships with.
    pub const DEFAULT_BAUDRATE: u32 = 115_200;

    /// Width of a character cell in pixels.
    pub const CHAR_WIDTH: i16 = 6;
    /// Height of a character cell in pixels.
    pub const CHAR_HEIGHT: i16 = 8;
    /// `goto_line` clamps to this many lines whatever the panel height.
    pub const LINE_LIMIT: i16 = 8;

    /// Size of the stack buffer bytes are staged in on their way to the port.
    pub const CHUNK_LEN: usize = 32;
}

use self::consts::*;

/// Whether `DrawBox` sets or clears the pixels of the outline.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BoxMode {
    Draw,
    Erase,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Blank the whole screen. The device also moves its own cursor, which the driver does not
    /// track.
    ClearScreen,
    /// Set the backlight brightness. The device expects 0-100; nothing checks that here.
    SetBacklight(u8),
    /// Draw or erase the outline of the box with corners `(x1, y1)` and `(x2, y2)`.
    DrawBox(u8, u8, u8, u8, BoxMode),
    /// Move the device cursor to column `x`.
    SetCursorX(u8),
    /// Move the device cursor to row `y`.
    SetCursorY(u8),
}

macro_rules! ok_command {
    ($buf:ident, $cmd:expr,[]) => {
        ($cmd, &$buf[..0])
    };
    ($buf:ident, $cmd:expr,[$arg0:expr]) => {{
        $buf[0] = $arg0;
        ($cmd, &$buf[..1])
    }};
    ($buf:ident, $cmd:expr,[$arg0:expr, $arg1:expr, $arg2:expr, $arg3:expr, $arg4:expr]) => {{
        $buf[0] = $arg0;
        $buf[1] = $arg1;
        $buf[2] = $arg2;
        $buf[3] = $arg3;
        $buf[4] = $arg4;
        ($cmd, &$buf[..5])
    }};
}

impl Command {
    /// Encode the command and write it to `iface`, returning the number of bytes written.
    pub fn send<DI>(self, iface: &mut DI) -> Result<usize, DI::Error>
    where
        DI: DisplayInterface,
    {
        let mut arg_buf = [0u8; 5];
        let (cmd, data) = match self {
            Command::ClearScreen => ok_command!(arg_buf, OP_CLEAR_SCREEN, []),
            Command::SetBacklight(brightness) => {
                ok_command!(arg_buf, OP_SET_BACKLIGHT, [brightness])
            }
            Command::DrawBox(x1, y1, x2, y2, mode) => {
                let flag = match mode {
                    BoxMode::Erase => 0,
                    BoxMode::Draw => 1,
                };
                ok_command!(arg_buf, OP_DRAW_BOX, [x1, y1, x2, y2, flag])
            }
            Command::SetCursorX(x) => ok_command!(arg_buf, OP_SET_CURSOR_X, [x]),
            Command::SetCursorY(y) => ok_command!(arg_buf, OP_SET_CURSOR_Y, [y]),
        };
        send_raw(iface, cmd, data)
    }
}

/// Frame `opcode` and `data` into a command packet and write it to `iface`. Returns the number of
/// bytes written, which is `data.len() + 2` unless the port reports otherwise.
pub fn send_raw<DI>(iface: &mut DI, opcode: u8, data: &[u8]) -> Result<usize, DI::Error>
where
    DI: DisplayInterface,
{
    trace!("command {=u8:#x} with {=usize} data bytes", opcode, data.len());
    let header = [CONTROL_BYTE, opcode];
    write_iter(iface, header.iter().chain(data.iter()).cloned())
}

/// Write every byte produced by `iter` to `iface`, using constant memory by alternately filling a
/// chunk buffer from the iterator and handing it to the port.
pub(crate) fn write_iter<DI, I>(iface: &mut DI, mut iter: I) -> Result<usize, DI::Error>
where
    DI: DisplayInterface,
    I: Iterator<Item = u8>,
{
    let mut total_written = 0;
    let mut buf = [0u8; CHUNK_LEN];

    loop {
        let mut chunk_len = 0;
        for slot in buf.iter_mut() {
            match iter.next() {
                Some(byte) => {
                    *slot = byte;
                    chunk_len += 1;
                }
                None => break,
            }
        }

        if chunk_len > 0 {
            total_written += iface.write(&buf[..chunk_len])?;
        }

        // A short chunk means the iterator ran dry.
        if chunk_len != buf.len() {
            return Ok(total_written);
        }
    }
}
