// src/adapters/hal.rs

//! `embedded-hal` 1.0 adapters (feature `impl-generic-hal`).

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{Error as _, ErrorKind, OutputPin};

use crate::common::hal_traits::{LineControl, LineDirection, LineLevel, Sdi12Timer};

/// Line control through two GPIO outputs.
///
/// `direction` high enables the bus driver and low releases the line so the
/// sensor can answer. `level` high forces the break (spacing) level and low
/// leaves the line at marking for the UART.
///
/// Setting a level always enables the driver first, so break and marking reach
/// the bus even though the previous exchange ended with the line released.
#[derive(Debug)]
pub struct GpioLine<LVL, DIR> {
    level: LVL,
    direction: DIR,
}

impl<LVL, DIR> GpioLine<LVL, DIR>
where
    LVL: OutputPin,
    DIR: OutputPin,
{
    pub fn new(level: LVL, direction: DIR) -> Self {
        GpioLine { level, direction }
    }

    pub fn release(self) -> (LVL, DIR) {
        (self.level, self.direction)
    }
}

impl<LVL, DIR> LineControl for GpioLine<LVL, DIR>
where
    LVL: OutputPin,
    DIR: OutputPin,
{
    type Error = ErrorKind;

    fn set_line_direction(&mut self, direction: LineDirection) -> Result<(), Self::Error> {
        match direction {
            LineDirection::Transmit => self.direction.set_high(),
            LineDirection::Receive => self.direction.set_low(),
        }
        .map_err(|e| e.kind())
    }

    fn set_line_level(&mut self, level: LineLevel) -> Result<(), Self::Error> {
        self.direction.set_high().map_err(|e| e.kind())?;
        match level {
            LineLevel::Asserted => self.level.set_high(),
            LineLevel::Idle => self.level.set_low(),
        }
        .map_err(|e| e.kind())
    }
}

/// [`Sdi12Timer`] for any blocking `embedded-hal` delay.
#[derive(Debug)]
pub struct HalDelay<D>(pub D);

impl<D: DelayNs> Sdi12Timer for HalDelay<D> {
    fn delay_us(&mut self, us: u32) {
        self.0.delay_us(us);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.0.delay_ms(ms);
    }
}
