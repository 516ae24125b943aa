// src/common/response/error.rs

use crate::common::types::Sdi12ParsingError;

/// Why a captured response was rejected. Carried by
/// [`crate::Sdi12Error::UnexpectedResponse`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ResponseParseError {
    /// The response line was empty.
    #[error("empty response")]
    Empty,
    /// The leading byte is not a valid sensor address.
    #[error("invalid address byte {0:#04x}")]
    InvalidAddressChar(u8),
    /// The response came from a different sensor than the one addressed.
    #[error("response from '{received}', expected '{expected}'")]
    AddressMismatch { expected: char, received: char },
    /// The `atttn` timing block was malformed.
    #[error("malformed measurement timing")]
    InvalidTiming,
    /// A `<values>` field failed to parse.
    #[error("bad value field: {0}")]
    Value(Sdi12ParsingError),
    /// The number of values differs from what the sensor advertised.
    #[error("expected {expected} values, received {received}")]
    FieldCountMismatch { expected: u16, received: usize },
    /// A data-set response held no values while more were still expected.
    #[error("data set returned no values")]
    NoValues,
    /// More values than the decoder can hold.
    #[error("too many values in response")]
    TooManyValues,
    /// The `aI!` response fields have the wrong length or characters.
    #[error("malformed identification")]
    InvalidIdentification,
    /// The line holds bytes that are not printable 7-bit text.
    #[error("response is not ASCII text")]
    NotText,
    /// The line does not fit the response buffer.
    #[error("response longer than the receive buffer")]
    Overlong,
    /// The address query answer was not a lone address.
    #[error("unexpected trailing payload")]
    TrailingPayload,
}

impl From<Sdi12ParsingError> for ResponseParseError {
    fn from(e: Sdi12ParsingError) -> Self {
        ResponseParseError::Value(e)
    }
}
