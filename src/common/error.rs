// src/common/error.rs

use core::convert::Infallible;
use core::fmt;

use super::response::ResponseParseError;

/// The step of a command/response exchange that was running when an error occurred.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ExchangeStage {
    /// Building the wire bytes for the command.
    Framing,
    /// Break, marking and direction changes ahead of transmission.
    Signaling,
    /// Writing the command bytes.
    Transmit,
    /// Releasing the line and receiving the sensor's reply.
    AwaitingResponse,
    /// Interpreting the captured response.
    Decoding,
}

impl fmt::Display for ExchangeStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExchangeStage::Framing => "framing",
            ExchangeStage::Signaling => "signaling",
            ExchangeStage::Transmit => "transmit",
            ExchangeStage::AwaitingResponse => "awaiting response",
            ExchangeStage::Decoding => "decoding",
        };
        f.write_str(name)
    }
}

/// Coarse error classes, for callers deciding whether to retry.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ErrorKind {
    /// Bad address or verb. A caller bug; retrying will not help.
    InvalidParameter,
    /// Nothing arrived within the timeout. Sensor absent or unpowered.
    NoResponse,
    /// A partial response arrived. Usually bus noise.
    Timeout,
    /// Structurally invalid or mismatched-address payload.
    UnexpectedResponse,
    /// The transport itself failed.
    TransportFailure,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::InvalidParameter => "invalid parameter",
            ErrorKind::NoResponse => "no response",
            ErrorKind::Timeout => "timeout",
            ErrorKind::UnexpectedResponse => "unexpected response",
            ErrorKind::TransportFailure => "transport failure",
        };
        f.write_str(name)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Sdi12Error<E = Infallible>
where
    E: fmt::Debug,
{
    /// Underlying transport failure, tagged with the exchange stage it happened in.
    #[error("Transport failure during {stage}: {error:?}")]
    Transport { stage: ExchangeStage, error: E },

    /// Provided address character is not a valid SDI-12 address.
    #[error("Invalid SDI-12 address character: '{0}'")]
    InvalidAddress(char),

    /// A command or configuration parameter is out of range.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(&'static str),

    /// No bytes arrived before the response timeout.
    #[error("No response from sensor")]
    NoResponse,

    /// Some bytes arrived but the response was never terminated.
    #[error("Response timed out after {received} bytes")]
    Timeout { received: usize },

    /// The response did not have the expected shape or came from the wrong sensor.
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(ResponseParseError),
}

impl<E: fmt::Debug> Sdi12Error<E> {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Sdi12Error::Transport { .. } => ErrorKind::TransportFailure,
            Sdi12Error::InvalidAddress(_) | Sdi12Error::InvalidParameter(_) => ErrorKind::InvalidParameter,
            Sdi12Error::NoResponse => ErrorKind::NoResponse,
            Sdi12Error::Timeout { .. } => ErrorKind::Timeout,
            Sdi12Error::UnexpectedResponse(_) => ErrorKind::UnexpectedResponse,
        }
    }

    /// Whether repeating the same operation later may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::NoResponse | ErrorKind::Timeout | ErrorKind::UnexpectedResponse
        )
    }
}

impl Sdi12Error<Infallible> {
    /// Lifts a validation error into the error type of a concrete transport.
    pub fn widen<E: fmt::Debug>(self) -> Sdi12Error<E> {
        match self {
            Sdi12Error::Transport { error, .. } => match error {},
            Sdi12Error::InvalidAddress(c) => Sdi12Error::InvalidAddress(c),
            Sdi12Error::InvalidParameter(what) => Sdi12Error::InvalidParameter(what),
            Sdi12Error::NoResponse => Sdi12Error::NoResponse,
            Sdi12Error::Timeout { received } => Sdi12Error::Timeout { received },
            Sdi12Error::UnexpectedResponse(detail) => Sdi12Error::UnexpectedResponse(detail),
        }
    }
}

impl<E: fmt::Debug> From<ResponseParseError> for Sdi12Error<E> {
    fn from(e: ResponseParseError) -> Self {
        Sdi12Error::UnexpectedResponse(e)
    }
}
