// src/common/response/timing.rs

use super::error::ResponseParseError;
use super::parse::split_address;
use crate::common::address::Sdi12Addr;
use crate::common::timing::ready_delay_ms;

/// Timing and count information returned by a start-measurement command (`atttn`).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MeasurementTiming {
    /// The address of the responding sensor.
    pub address: Sdi12Addr,
    /// Time until data is ready, from `ttt` (whole seconds) converted to milliseconds.
    pub ready_delay_ms: u32,
    /// Number of measurement values that will be returned (`n`, `nn` or `nnn`).
    pub values_count: u16,
}

impl MeasurementTiming {
    /// Parses `atttn` from a response line (terminator already stripped).
    ///
    /// `ttt` is always three digits. The count is one digit for `aM!`, but two
    /// or three digit counts from other measurement families are accepted too.
    pub fn parse(line: &[u8]) -> Result<Self, ResponseParseError> {
        let (address, rest) = split_address(line)?;
        if !(4..=6).contains(&rest.len()) || !rest.iter().all(u8::is_ascii_digit) {
            return Err(ResponseParseError::InvalidTiming);
        }
        let (seconds, count) = rest.split_at(3);
        Ok(MeasurementTiming {
            address,
            ready_delay_ms: ready_delay_ms(decimal(seconds)),
            values_count: decimal(count),
        })
    }
}

// Caller guarantees all bytes are ASCII digits and there are at most three.
fn decimal(digits: &[u8]) -> u16 {
    digits.iter().fold(0u16, |acc, d| acc * 10 + u16::from(d - b'0'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_digit_count() {
        let timing = MeasurementTiming::parse(b"00141").unwrap();
        assert_eq!(timing.address.as_char(), '0');
        assert_eq!(timing.ready_delay_ms, 14_000);
        assert_eq!(timing.values_count, 1);
    }

    #[test]
    fn test_parse_three_values_zero_delay() {
        let timing = MeasurementTiming::parse(b"10003").unwrap();
        assert_eq!(timing.ready_delay_ms, 0);
        assert_eq!(timing.values_count, 3);
    }

    #[test]
    fn test_parse_wide_counts() {
        assert_eq!(MeasurementTiming::parse(b"a12012").unwrap().values_count, 12);
        let timing = MeasurementTiming::parse(b"Z999100").unwrap();
        assert_eq!(timing.ready_delay_ms, 999_000);
        assert_eq!(timing.values_count, 100);
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert_eq!(MeasurementTiming::parse(b"0014"), Err(ResponseParseError::InvalidTiming));
        assert_eq!(MeasurementTiming::parse(b"0014 3"), Err(ResponseParseError::InvalidTiming));
        assert_eq!(MeasurementTiming::parse(b"00a41"), Err(ResponseParseError::InvalidTiming));
        assert_eq!(MeasurementTiming::parse(b"00141234"), Err(ResponseParseError::InvalidTiming));
        assert_eq!(MeasurementTiming::parse(b""), Err(ResponseParseError::Empty));
        assert_eq!(MeasurementTiming::parse(b"+0141"), Err(ResponseParseError::InvalidAddressChar(b'+')));
    }
}
