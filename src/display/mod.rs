//! The main API to the display driver: screen geometry, the shadow cursor, and the drawing
//! primitives. Text layout lives in `text`.
//!
//! The backpack cannot report where its cursor is, so `Display` keeps its own copy. The copy is
//! only changed by `set_cursor`, `goto_line`, and the text writers; everything else leaves it
//! alone, including `clear_screen`, which moves the device cursor without telling anyone.

// This has to be here in order to be usable by mods declared afterwards.
#[cfg(test)]
#[macro_use]
pub mod testing {
    macro_rules! packet {
        ($op:expr $(, $d:expr)*) => {vec![0x7Cu8, $op $(, $d)*]};
    }
    macro_rules! stream {
        ($($part:expr),*) => {{
            let mut bytes: Vec<u8> = Vec::new();
            $(bytes.extend_from_slice(&$part[..]);)*
            bytes
        }};
    }
}

pub mod text;

use crate::command::consts::*;
use crate::command::{self, BoxMode, Command};
use crate::config::{Config, Overflow};
use crate::error::Error;
use crate::interface;

/// A pixel coordinate pair of `column` and `row`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PixelCoord(pub i16, pub i16);

/// Fixed dimensions of the panel, in pixels and in 6x8 character cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Geometry {
    /// Largest valid column, one less than the pixel count.
    pub width_px: i16,
    /// Largest valid row, one less than the pixel count.
    pub height_px: i16,
    pub max_chars_per_line: usize,
    pub max_lines: usize,
}

impl Geometry {
    fn new(width_px_count: u16, height_px_count: u16) -> Self {
        Geometry {
            width_px: width_px_count as i16 - 1,
            height_px: height_px_count as i16 - 1,
            max_chars_per_line: (width_px_count / CHAR_WIDTH as u16) as usize,
            max_lines: (height_px_count / CHAR_HEIGHT as u16) as usize,
        }
    }

    /// Whether `(x, y)` lies on the panel.
    pub fn contains(&self, x: i16, y: i16) -> bool {
        x >= 0 && x <= self.width_px && y >= 0 && y <= self.height_px
    }
}

/// Pixel width of `len` characters.
pub(crate) fn text_pixel_width(len: usize) -> usize {
    len.saturating_mul(CHAR_WIDTH as usize)
}

/// A driver for a display on a serial backpack.
pub struct Display<DI>
where
    DI: interface::DisplayInterface,
{
    iface: DI,
    geometry: Geometry,
    cursor: PixelCoord,
    overflow: Overflow,
}

impl<DI> Display<DI>
where
    DI: interface::DisplayInterface,
{
    /// Construct a new display driver talking over `iface`, which must already be open at
    /// `config`'s baud rate. The cursor model starts at `(0, 0)`; nothing is sent to the device.
    ///
    /// # Panics
    ///
    /// If either side of the configured panel size is outside 1-256 pixels.
    pub fn new(iface: DI, config: Config) -> Self {
        if false
            || config.width_px_count == 0
            || config.height_px_count == 0
            || config.width_px_count > 256
            || config.height_px_count > 256
        {
            panic!("Display size not supported by the serial backpack.");
        }
        let mut display = Display {
            iface,
            geometry: Geometry::new(config.width_px_count, config.height_px_count),
            cursor: PixelCoord(0, 0),
            overflow: config.overflow,
        };
        if config.baudrate != DEFAULT_BAUDRATE {
            display.set_baud_rate(config.baudrate);
        }
        display
    }

    /// Release the port.
    pub fn release(self) -> DI {
        self.iface
    }

    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    /// The modeled cursor position. This is where the driver believes the next character will
    /// be drawn; the device is never asked.
    pub fn cursor(&self) -> PixelCoord {
        self.cursor
    }

    /// Send an arbitrary command packet, returning the number of bytes written.
    pub fn send_command(&mut self, opcode: u8, data: &[u8]) -> Result<usize, Error<DI::Error>> {
        command::send_raw(&mut self.iface, opcode, data).map_err(Error::Transport)
    }

    fn send(&mut self, cmd: Command) -> Result<usize, Error<DI::Error>> {
        cmd.send(&mut self.iface).map_err(Error::Transport)
    }

    /// Clear the screen.
    ///
    /// The device moves its own cursor to its home position, but the modeled cursor is left
    /// where it was. Follow with `set_cursor` to bring the two back in line.
    pub fn clear_screen(&mut self) -> Result<(), Error<DI::Error>> {
        self.send(Command::ClearScreen).map(|_| ())
    }

    /// Draw or erase the outline of a box between `p1` and `p2`. Coordinates are truncated to a
    /// byte and not checked against the panel.
    pub fn draw_box(
        &mut self,
        p1: PixelCoord,
        p2: PixelCoord,
        mode: BoxMode,
    ) -> Result<(), Error<DI::Error>> {
        self.send(Command::DrawBox(
            p1.0 as u8,
            p1.1 as u8,
            p2.0 as u8,
            p2.1 as u8,
            mode,
        ))
        .map(|_| ())
    }

    /// Set the backlight brightness, nominally 0-100. Larger values go out unchanged.
    pub fn set_backlight(&mut self, brightness: u8) -> Result<(), Error<DI::Error>> {
        self.send(Command::SetBacklight(brightness)).map(|_| ())
    }

    /// Change the device baud rate. The backpack's command for this is not known, so this does
    /// nothing; open the port at the rate the device is already using.
    pub fn set_baud_rate(&mut self, baudrate: u32) {
        warn!("baud rate change to {=u32} is not supported, ignoring", baudrate);
        let _ = baudrate;
    }

    /// Move the cursor to `(x, y)`. Off-screen positions are rejected with `Error::OutOfBounds`
    /// before anything is sent.
    pub fn set_cursor(&mut self, x: i16, y: i16) -> Result<(), Error<DI::Error>> {
        if !self.geometry.contains(x, y) {
            return Err(Error::OutOfBounds { x, y });
        }
        self.send(Command::SetCursorX(x as u8))?;
        self.send(Command::SetCursorY(y as u8))?;
        self.cursor = PixelCoord(x, y);
        Ok(())
    }

    /// Move the cursor to the start of text line `line`, counting from 1. The line is clamped to
    /// 1-8 regardless of the panel height, so on panels shorter than 64 pixels the high lines
    /// fail with `Error::OutOfBounds`.
    pub fn goto_line(&mut self, line: i16) -> Result<(), Error<DI::Error>> {
        let line = line.clamp(1, LINE_LIMIT);
        self.set_cursor(0, CHAR_HEIGHT * line - CHAR_HEIGHT)
    }

    /// Returns `true` when `text` does NOT fit in the rest of the current line.
    pub fn can_write(&self, text: &str) -> bool {
        self.overflows(text.len())
    }

    pub(crate) fn overflows(&self, len: usize) -> bool {
        self.cursor.0 as usize + text_pixel_width(len) > self.geometry.width_px as usize
    }

    /// Number of whole characters that fit between the cursor and the right edge.
    pub fn remaining_char_count(&self) -> usize {
        ((self.geometry.width_px - self.cursor.0) / CHAR_WIDTH) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::{PixelCoord as Px, *};
    use crate::interface::test_spy::{SpyError, TestSpyInterface};
    use proptest::prelude::*;

    fn display(di: &TestSpyInterface) -> Display<TestSpyInterface> {
        Display::new(di.split(), Config::new())
    }

    #[test]
    fn default_geometry() {
        let di = TestSpyInterface::new();
        let disp = display(&di);
        assert_eq!(
            disp.geometry(),
            Geometry {
                width_px: 127,
                height_px: 63,
                max_chars_per_line: 21,
                max_lines: 8,
            }
        );
        assert_eq!(disp.cursor(), Px(0, 0));
        assert_eq!(di.write_count(), 0);
    }

    #[test]
    fn custom_geometry() {
        let di = TestSpyInterface::new();
        let disp = Display::new(di.split(), Config::new().size(160, 128));
        let g = disp.geometry();
        assert_eq!((g.width_px, g.height_px), (159, 127));
        assert_eq!((g.max_chars_per_line, g.max_lines), (26, 16));
    }

    #[test]
    #[should_panic]
    fn zero_size_rejected() {
        Display::new(TestSpyInterface::new(), Config::new().size(0, 64));
    }

    #[test]
    #[should_panic]
    fn oversize_rejected() {
        Display::new(TestSpyInterface::new(), Config::new().size(128, 300));
    }

    #[test]
    fn nondefault_baudrate_sends_nothing() {
        let di = TestSpyInterface::new();
        let mut disp = Display::new(di.split(), Config::new().baudrate(9600));
        disp.set_baud_rate(57_600);
        assert_eq!(di.write_count(), 0);
    }

    #[test]
    fn send_command_returns_byte_count() {
        let di = TestSpyInterface::new();
        let mut disp = display(&di);
        assert_eq!(disp.send_command(0x02, &[50]), Ok(3));
        di.check(&[0x7C, 0x02, 50]);
    }

    #[test]
    fn clear_screen_keeps_cursor_model() {
        let di = TestSpyInterface::new();
        let mut disp = display(&di);
        disp.set_cursor(30, 16).unwrap();
        di.clear();
        disp.clear_screen().unwrap();
        di.check(&packet!(0x00));
        assert_eq!(disp.cursor(), Px(30, 16));
    }

    #[test]
    fn draw_and_erase_box() {
        let di = TestSpyInterface::new();
        let mut disp = display(&di);
        disp.set_cursor(12, 8).unwrap();
        di.clear();
        disp.draw_box(Px(0, 0), Px(127, 63), BoxMode::Draw).unwrap();
        disp.draw_box(Px(10, 10), Px(20, 20), BoxMode::Erase).unwrap();
        di.check(&stream!(
            packet!(0x0F, 0, 0, 127, 63, 1),
            packet!(0x0F, 10, 10, 20, 20, 0)
        ));
        assert_eq!(disp.cursor(), Px(12, 8));
    }

    #[test]
    fn set_backlight() {
        let di = TestSpyInterface::new();
        let mut disp = display(&di);
        disp.set_backlight(100).unwrap();
        di.check(&packet!(0x02, 100));
    }

    #[test]
    fn set_cursor_sends_both_axes() {
        let di = TestSpyInterface::new();
        let mut disp = display(&di);
        disp.set_cursor(127, 63).unwrap();
        di.check_multi(&[&[0x7Cu8, 0x18, 127], &[0x7C, 0x19, 63]]);
        assert_eq!(disp.cursor(), Px(127, 63));
    }

    #[test]
    fn set_cursor_out_of_bounds() {
        let di = TestSpyInterface::new();
        let mut disp = display(&di);
        disp.set_cursor(6, 8).unwrap();
        di.clear();
        assert_eq!(
            disp.set_cursor(128, 0),
            Err(Error::OutOfBounds { x: 128, y: 0 })
        );
        assert_eq!(
            disp.set_cursor(0, 64),
            Err(Error::OutOfBounds { x: 0, y: 64 })
        );
        assert_eq!(
            disp.set_cursor(-1, 0),
            Err(Error::OutOfBounds { x: -1, y: 0 })
        );
        assert_eq!(
            disp.set_cursor(0, -8),
            Err(Error::OutOfBounds { x: 0, y: -8 })
        );
        assert_eq!(di.write_count(), 0);
        assert_eq!(disp.cursor(), Px(6, 8));
    }

    #[test]
    fn set_cursor_transport_failure_keeps_model() {
        let di = TestSpyInterface::new();
        let mut disp = display(&di);
        // The x command gets through, the y command does not.
        di.fail_after(1);
        assert_eq!(
            disp.set_cursor(12, 16),
            Err(Error::Transport(SpyError))
        );
        di.check(&packet!(0x18, 12));
        assert_eq!(disp.cursor(), Px(0, 0));
    }

    #[test]
    fn goto_line() {
        let di = TestSpyInterface::new();
        let mut disp = display(&di);
        disp.goto_line(3).unwrap();
        assert_eq!(disp.cursor(), Px(0, 16));
        di.check(&stream!(packet!(0x18, 0), packet!(0x19, 16)));
        disp.goto_line(0).unwrap();
        assert_eq!(disp.cursor(), Px(0, 0));
        disp.goto_line(-5).unwrap();
        assert_eq!(disp.cursor(), Px(0, 0));
        disp.goto_line(8).unwrap();
        assert_eq!(disp.cursor(), Px(0, 56));
        disp.goto_line(20).unwrap();
        assert_eq!(disp.cursor(), Px(0, 56));
    }

    #[test]
    fn goto_line_ignores_short_panel() {
        let di = TestSpyInterface::new();
        let mut disp = Display::new(di.split(), Config::new().size(128, 32));
        assert_eq!(disp.geometry().max_lines, 4);
        disp.goto_line(4).unwrap();
        assert_eq!(disp.cursor(), Px(0, 24));
        di.clear();
        // Line 5 starts at row 32, below a 32-row panel.
        assert_eq!(
            disp.goto_line(5),
            Err(Error::OutOfBounds { x: 0, y: 32 })
        );
        assert_eq!(di.write_count(), 0);
    }

    #[test]
    fn remaining_and_can_write() {
        let di = TestSpyInterface::new();
        let mut disp = display(&di);
        assert_eq!(disp.remaining_char_count(), 21);
        assert!(!disp.can_write("hello"));
        assert!(!disp.can_write("twenty-one characters"));
        assert!(disp.can_write("twenty-two characters!"));
        disp.set_cursor(120, 0).unwrap();
        assert_eq!(disp.remaining_char_count(), 1);
        assert!(!disp.can_write("a"));
        assert!(disp.can_write("ab"));
        disp.set_cursor(127, 0).unwrap();
        assert_eq!(disp.remaining_char_count(), 0);
        assert!(!disp.can_write(""));
        assert!(disp.can_write("a"));
    }

    #[test]
    fn release_returns_port() {
        let di = TestSpyInterface::new();
        let mut disp = display(&di);
        disp.set_backlight(10).unwrap();
        let mut port = disp.release();
        interface::DisplayInterface::write(&mut port, b"x").unwrap();
        assert_eq!(di.bytes(), stream!(packet!(0x02, 10), b"x"));
    }

    proptest! {
        #[test]
        fn set_cursor_round_trip(x in 0i16..=127, y in 0i16..=63) {
            let di = TestSpyInterface::new();
            let mut disp = display(&di);
            prop_assert!(disp.set_cursor(x, y).is_ok());
            prop_assert_eq!(disp.cursor(), Px(x, y));
            di.check(&stream!(packet!(0x18, x as u8), packet!(0x19, y as u8)));
        }

        #[test]
        fn set_cursor_rejects_off_screen(x in -300i16..300, y in -300i16..300) {
            prop_assume!(!(0..=127).contains(&x) || !(0..=63).contains(&y));
            let di = TestSpyInterface::new();
            let mut disp = display(&di);
            disp.set_cursor(42, 24).unwrap();
            di.clear();
            prop_assert_eq!(disp.set_cursor(x, y), Err(Error::OutOfBounds { x, y }));
            prop_assert_eq!(disp.cursor(), Px(42, 24));
            prop_assert_eq!(di.write_count(), 0);
        }

        #[test]
        fn goto_line_clamps(line in -1000i16..1000) {
            let di = TestSpyInterface::new();
            let mut disp = display(&di);
            disp.goto_line(line).unwrap();
            let expected = 8 * line.clamp(1, 8) - 8;
            prop_assert_eq!(disp.cursor(), Px(0, expected));
        }

        #[test]
        fn remaining_char_count_formula(x in 0i16..=127, step in 0i16..=127) {
            let di = TestSpyInterface::new();
            let mut disp = display(&di);
            disp.set_cursor(x, 0).unwrap();
            let here = disp.remaining_char_count();
            prop_assert_eq!(here, ((127 - x) / 6) as usize);
            let further = (x + step).min(127);
            disp.set_cursor(further, 0).unwrap();
            prop_assert!(disp.remaining_char_count() <= here);
        }

        #[test]
        fn can_write_formula(x in 0i16..=127, text in "[a-z ]{0,40}") {
            let di = TestSpyInterface::new();
            let mut disp = display(&di);
            disp.set_cursor(x, 0).unwrap();
            prop_assert_eq!(disp.can_write(&text), x as usize + 6 * text.len() > 127);
        }
    }
}
