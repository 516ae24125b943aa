// src/common/timing.rs

use core::time::Duration;

// Nominal values from the SDI-12 timing table (Sec 7.0). Tolerances are
// +/- 0.40 ms except for inter-character time.

// === Break Timing (Sec 7.0, 7.1) ===

/// Minimum duration for a valid break signal (recorder must send >= 12 ms).
pub const BREAK_DURATION_MIN: Duration = Duration::from_millis(12);
/// Marking time required after a break before sensor looks for an address.
pub const POST_BREAK_MARKING_MIN: Duration = Duration::from_micros(8330);

// === Command/Response Timing (Sec 7.0) ===

/// Maximum time from end of command stop bit to start bit of first response byte.
pub const RESPONSE_START_TIME_MAX: Duration = Duration::from_micros(15_000 + 400); // 15ms + 0.4ms tol

// === Transport timeouts ===

/// Default bound on writing one command.
pub const DEFAULT_TRANSMIT_TIMEOUT: Duration = Duration::from_millis(1000);
/// Default bound on receiving one response.
pub const DEFAULT_RESPONSE_TIMEOUT: Duration = Duration::from_millis(1000);

// === Byte Timing at 1200 Baud (7E1) ===
// 1 start bit + 7 data bits + 1 parity bit + 1 stop bit = 10 bits per byte

/// Nominal duration of a single byte (10 bits total) at 1200 baud (7E1 format).
pub const BYTE_DURATION: Duration = Duration::from_micros(8333);

/// Converts a `ttt` field (whole seconds) from a measurement response into milliseconds.
#[inline]
pub const fn ready_delay_ms(seconds: u16) -> u32 {
    seconds as u32 * 1000
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ready_delay_conversion() {
        assert_eq!(ready_delay_ms(0), 0);
        assert_eq!(ready_delay_ms(14), 14_000);
        assert_eq!(ready_delay_ms(999), 999_000);
    }

    #[test]
    fn test_marking_floor_is_one_character_within_tolerance() {
        // 8.33 ms is the nominal character time, +/- 0.40 ms.
        let tolerance = Duration::from_micros(400);
        assert!(POST_BREAK_MARKING_MIN + tolerance >= BYTE_DURATION);
        assert!(BYTE_DURATION + tolerance >= POST_BREAK_MARKING_MIN);
        assert!(BREAK_DURATION_MIN > POST_BREAK_MARKING_MIN);
        assert!(RESPONSE_START_TIME_MAX > POST_BREAK_MARKING_MIN);
    }
}
