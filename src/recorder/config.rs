// src/recorder/config.rs

use core::convert::Infallible;

use crate::common::{timing, Sdi12Error};

/// Line timing and transport timeouts used by a recorder.
///
/// The defaults are the SDI-12 minimums for break and marking and one second
/// for each transport call.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RecorderConfig {
    /// Break hold, in milliseconds. At least 12.
    pub break_ms: u32,
    /// Marking hold after the break, in microseconds. At least 8330.
    pub marking_us: u32,
    /// Bound on transmitting one command.
    pub transmit_timeout_ms: u32,
    /// Bound on receiving one response.
    pub response_timeout_ms: u32,
}

impl RecorderConfig {
    pub const fn new() -> Self {
        RecorderConfig {
            break_ms: timing::BREAK_DURATION_MIN.as_millis() as u32,
            marking_us: timing::POST_BREAK_MARKING_MIN.as_micros() as u32,
            transmit_timeout_ms: timing::DEFAULT_TRANSMIT_TIMEOUT.as_millis() as u32,
            response_timeout_ms: timing::DEFAULT_RESPONSE_TIMEOUT.as_millis() as u32,
        }
    }

    pub const fn with_response_timeout_ms(mut self, ms: u32) -> Self {
        self.response_timeout_ms = ms;
        self
    }

    pub const fn with_transmit_timeout_ms(mut self, ms: u32) -> Self {
        self.transmit_timeout_ms = ms;
        self
    }

    pub const fn with_break_ms(mut self, ms: u32) -> Self {
        self.break_ms = ms;
        self
    }

    pub const fn with_marking_us(mut self, us: u32) -> Self {
        self.marking_us = us;
        self
    }

    /// Rejects timings below the protocol floor. Sensors silently ignore a
    /// short break, so this is the only place the error can be caught.
    pub fn validate(&self) -> Result<(), Sdi12Error<Infallible>> {
        if u128::from(self.break_ms) < timing::BREAK_DURATION_MIN.as_millis() {
            return Err(Sdi12Error::InvalidParameter("break must be held for at least 12 ms"));
        }
        if u128::from(self.marking_us) < timing::POST_BREAK_MARKING_MIN.as_micros() {
            return Err(Sdi12Error::InvalidParameter("marking must be held for at least 8.33 ms"));
        }
        if self.transmit_timeout_ms == 0 {
            return Err(Sdi12Error::InvalidParameter("transmit timeout must be nonzero"));
        }
        if u128::from(self.response_timeout_ms) < timing::RESPONSE_START_TIME_MAX.as_millis() {
            return Err(Sdi12Error::InvalidParameter("response timeout shorter than sensor response time"));
        }
        Ok(())
    }
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self::new()
    }
}
