// src/common/types.rs

use core::fmt;

// --- SDI-12 Standard Data Value (`<values>`) ---

/// Scale applied to every decoded value: three implied decimal places.
pub const VALUE_SCALE: i32 = 1000;

/// Most digits a `<values>` field may carry.
pub const MAX_DIGITS: usize = 7;

/// A single data value as returned in the `<values>` part of a `aDn!` response.
/// Format: `p[d.d]` where p is '+' or '-', d are digits, '.' is optional. Max 7 digits.
///
/// Stored as a fixed-point integer of value × 1000. Digits beyond the third
/// decimal place are truncated, never rounded.
///
/// The `i32` storage limits the magnitude to 2147483.647. Seven-digit integers
/// above that, such as `+9999999`, are rejected with
/// [`Sdi12ParsingError::OutOfRange`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Sdi12Value(i32);

impl Sdi12Value {
    /// Creates a value from its scaled (× 1000) representation.
    pub const fn from_milli(milli: i32) -> Self {
        Self(milli)
    }

    /// The value × 1000.
    #[inline]
    pub const fn milli(&self) -> i32 {
        self.0
    }

    /// Whole part, truncated toward zero.
    #[inline]
    pub const fn integer_part(&self) -> i32 {
        self.0 / VALUE_SCALE
    }

    /// Parses a single value field (like `"+1.23"`, `"-10"`, `"+.5"`).
    /// Does not handle multiple values in one string.
    pub fn parse_single(field: &[u8]) -> Result<Self, Sdi12ParsingError> {
        let (&sign_byte, rest) = field.split_first().ok_or(Sdi12ParsingError::InvalidFormat)?;
        let negative = match sign_byte {
            b'+' => false,
            b'-' => true,
            _ => return Err(Sdi12ParsingError::InvalidSign),
        };

        let mut whole: i64 = 0;
        let mut fraction: i64 = 0;
        let mut fraction_digits = 0u32;
        let mut digit_count = 0usize;
        let mut decimal_found = false;

        for &b in rest {
            match b {
                b'0'..=b'9' => {
                    digit_count += 1;
                    if digit_count > MAX_DIGITS {
                        return Err(Sdi12ParsingError::InvalidDigitCount);
                    }
                    let digit = i64::from(b - b'0');
                    if !decimal_found {
                        whole = whole * 10 + digit;
                    } else if fraction_digits < 3 {
                        fraction = fraction * 10 + digit;
                        fraction_digits += 1;
                    }
                    // Sub-millesimal digits are dropped (truncation).
                }
                b'.' => {
                    if decimal_found {
                        return Err(Sdi12ParsingError::MultipleDecimals);
                    }
                    decimal_found = true;
                }
                b'+' | b'-' => return Err(Sdi12ParsingError::InvalidSign),
                other => return Err(Sdi12ParsingError::InvalidCharacter(other)),
            }
        }
        if digit_count == 0 {
            return Err(Sdi12ParsingError::MissingDigits);
        }

        let scaled = whole * i64::from(VALUE_SCALE) + fraction * 10i64.pow(3 - fraction_digits);
        let signed = if negative { -scaled } else { scaled };
        i32::try_from(signed).map(Self).map_err(|_| Sdi12ParsingError::OutOfRange)
    }
}

impl fmt::Display for Sdi12Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { '-' } else { '+' };
        let magnitude = self.0.unsigned_abs();
        write!(f, "{}{}.{:03}", sign, magnitude / 1000, magnitude % 1000)
    }
}

/// Error during parsing of SDI-12 <values>.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Sdi12ParsingError {
    /// Empty field.
    InvalidFormat,
    /// Missing sign, or a sign where a digit was expected.
    InvalidSign,
    /// A sign with no digits after it.
    MissingDigits,
    MultipleDecimals,
    InvalidCharacter(u8),
    /// More than the 7 digits SDI-12 allows.
    InvalidDigitCount,
    /// Does not fit an `i32` once scaled by 1000.
    OutOfRange,
}

impl fmt::Display for Sdi12ParsingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Sdi12ParsingError::*;
        match self {
            InvalidFormat => write!(f, "Invalid SDI-12 value format"),
            InvalidSign => write!(f, "Invalid or missing sign character"),
            MissingDigits => write!(f, "Sign not followed by any digits"),
            MultipleDecimals => write!(f, "Multiple decimal points found"),
            InvalidCharacter(c) => write!(f, "Invalid character {:#04x} in numeric part", c),
            InvalidDigitCount => write!(f, "Invalid number of digits (must be 1-7)"),
            OutOfRange => write!(f, "Value out of range for fixed-point storage"),
        }
    }
}

impl core::error::Error for Sdi12ParsingError {}
