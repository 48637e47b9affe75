//! The port the display is attached to. The driver only ever writes; nothing is read back.

use core::fmt;

/// A byte-stream connection to the display backpack.
///
/// Opening the connection (and choosing its baud rate) is the implementor's business; by the time
/// a port reaches `Display::new` it must be ready to accept bytes.
pub trait DisplayInterface {
    /// Error type of the underlying transport.
    type Error: fmt::Debug;

    /// Write all of `buf` to the display, returning the number of bytes written.
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error>;
}

impl<T: DisplayInterface + ?Sized> DisplayInterface for &mut T {
    type Error = T::Error;

    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        T::write(self, buf)
    }
}

pub mod serial {
    //! A port over any embedded-hal serial transmitter. Each byte is pushed with `nb::block!`,
    //! so a full UART FIFO simply spins until the byte is accepted.

    use core::fmt;

    use super::DisplayInterface;

    pub struct SerialInterface<TX> {
        /// The UART transmitter wired to the backpack's RX pin.
        tx: TX,
    }

    impl<TX> SerialInterface<TX>
    where
        TX: hal::serial::Write<u8>,
    {
        /// Create a new serial interface. `tx` must already be configured for the baud rate the
        /// backpack is listening at (115200 out of the box).
        pub fn new(tx: TX) -> Self {
            Self { tx }
        }

        /// Release the transmitter.
        pub fn release(self) -> TX {
            self.tx
        }
    }

    impl<TX> DisplayInterface for SerialInterface<TX>
    where
        TX: hal::serial::Write<u8>,
        TX::Error: fmt::Debug,
    {
        type Error = TX::Error;

        fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
            for &byte in buf {
                nb::block!(self.tx.write(byte))?;
            }
            nb::block!(self.tx.flush())?;
            Ok(buf.len())
        }
    }

}

#[cfg(feature = "serialport")]
pub mod host {
    //! A port over a host serial device (USB-serial adapter and the like), for driving the
    //! display from a PC.

    use std::boxed::Box;
    use std::io::Write;
    use std::time::Duration;

    use super::DisplayInterface;

    pub struct SerialPortInterface {
        port: Box<dyn serialport::SerialPort>,
    }

    impl SerialPortInterface {
        /// Open the serial device at `path` at `baudrate`, 8N1.
        pub fn open(path: &str, baudrate: u32) -> Result<Self, serialport::Error> {
            let port = serialport::new(path, baudrate)
                .timeout(Duration::from_millis(1000))
                .open()?;
            Ok(Self::from_port(port))
        }

        /// Wrap a port that was opened elsewhere.
        pub fn from_port(port: Box<dyn serialport::SerialPort>) -> Self {
            Self { port }
        }

        /// Release the serial port.
        pub fn release(self) -> Box<dyn serialport::SerialPort> {
            self.port
        }
    }

    impl DisplayInterface for SerialPortInterface {
        type Error = serialport::Error;

        fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
            self.port.write_all(buf)?;
            self.port.flush()?;
            Ok(buf.len())
        }
    }

}
