// src/common/hal_traits.rs

use core::fmt::Debug;

/// Abstraction for the blocking waits required by SDI-12: break hold, marking
/// hold and the sensor's advertised ready delay.
///
/// Every wait in the recorder goes through this trait, so a test double or a
/// platform timer can be swapped in without touching protocol logic.
pub trait Sdi12Timer {
    /// Delay for at least the specified number of microseconds.
    fn delay_us(&mut self, us: u32);

    /// Delay for at least the specified number of milliseconds.
    fn delay_ms(&mut self, ms: u32);
}

/// Direction of the shared half-duplex data line.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LineDirection {
    /// The recorder drives the line.
    Transmit,
    /// The line is released so a sensor can answer.
    Receive,
}

/// Level the recorder drives while it owns the line.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LineLevel {
    /// Break (spacing) level.
    Asserted,
    /// Marking (idle) level.
    Idle,
}

/// Outcome of a single [`Sdi12Transport::receive`] call.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Received {
    /// Number of bytes written into the caller's buffer.
    pub len: usize,
    /// `true` when the timeout ended the receive rather than a terminator or a full buffer.
    pub truncated: bool,
}

/// Line direction and level control for the shared SDI-12 wire.
pub trait LineControl {
    type Error: Debug;

    /// Reconfigures the half-duplex line. Must not glitch the output level.
    fn set_line_direction(&mut self, direction: LineDirection) -> Result<(), Self::Error>;

    /// Drives the break/marking levels.
    ///
    /// Called before [`set_line_direction`](Self::set_line_direction) hands the
    /// line to the transmitter, while the previous exchange may still have it
    /// released. The level must reach the bus regardless, so implementations
    /// take the line (e.g. enable the driver) before driving it.
    fn set_line_level(&mut self, level: LineLevel) -> Result<(), Self::Error>;
}

/// Blocking transport consumed by [`crate::recorder::SyncRecorder`].
pub trait Sdi12Transport {
    /// Associated error type for communication errors.
    type Error: Debug;

    /// Writes all of `bytes`, giving up after `timeout_ms`.
    fn transmit(&mut self, bytes: &[u8], timeout_ms: u32) -> Result<(), Self::Error>;

    /// Receives up to `buffer.len()` bytes within `timeout_ms`.
    ///
    /// Implementations may return early once a line feed has arrived (compare
    /// with the high bit masked off, the bus sets it on some hardware).
    fn receive(&mut self, buffer: &mut [u8], timeout_ms: u32) -> Result<Received, Self::Error>;

    /// See [`LineControl::set_line_direction`].
    fn set_line_direction(&mut self, direction: LineDirection) -> Result<(), Self::Error>;

    /// See [`LineControl::set_line_level`].
    fn set_line_level(&mut self, level: LineLevel) -> Result<(), Self::Error>;
}

/// Abstraction for non-blocking, byte-at-a-time serial access.
///
/// Adapt to [`Sdi12Transport`] with [`crate::adapters::NbTransport`].
pub trait Sdi12Serial {
    /// Associated error type for communication errors.
    type Error: Debug;

    /// Attempts to read a single byte from the serial interface.
    ///
    /// Returns `Ok(byte)` if a byte was read, or `Err(nb::Error::WouldBlock)`
    /// if no byte is available yet. Other errors are returned as `Err(nb::Error::Other(Self::Error))`.
    fn read_byte(&mut self) -> nb::Result<u8, Self::Error>;

    /// Attempts to write a single byte to the serial interface.
    ///
    /// Returns `Ok(())` if the byte was accepted for transmission, or `Err(nb::Error::WouldBlock)`
    /// if the write buffer is full.
    fn write_byte(&mut self, byte: u8) -> nb::Result<(), Self::Error>;

    /// Attempts to flush the transmit buffer, ensuring all written bytes have been sent.
    fn flush(&mut self) -> nb::Result<(), Self::Error>;
}

/// Async version of [`Sdi12Transport`] (requires the `async` feature).
#[cfg(feature = "async")]
#[allow(async_fn_in_trait)]
pub trait Sdi12TransportAsync {
    type Error: Debug;

    async fn transmit(&mut self, bytes: &[u8], timeout_ms: u32) -> Result<(), Self::Error>;

    async fn receive(&mut self, buffer: &mut [u8], timeout_ms: u32) -> Result<Received, Self::Error>;

    async fn set_line_direction(&mut self, direction: LineDirection) -> Result<(), Self::Error>;

    async fn set_line_level(&mut self, level: LineLevel) -> Result<(), Self::Error>;
}
