// src/common/response/capture.rs

use core::fmt;
use core::str;

use crate::common::error::{ExchangeStage, Sdi12Error};
use crate::common::hal_traits::{Received, Sdi12Transport};

/// Receive buffer size. A `aDn!` reply is at most 1 + 75 + 3 (CRC) + 2 bytes.
pub const RESPONSE_CAPACITY: usize = 96;

/// Clears the high bit some bus transceivers leave set on received bytes.
pub const PARITY_MASK: u8 = 0x7F;

/// Bytes from one receive, masked to 7 bits and cut at the `<CR><LF>` terminator.
#[derive(Clone)]
pub struct RawResponse {
    bytes: [u8; RESPONSE_CAPACITY],
    len: usize,
    line_len: usize,
    terminated: bool,
}

impl RawResponse {
    pub const fn new() -> Self {
        RawResponse { bytes: [0; RESPONSE_CAPACITY], len: 0, line_len: 0, terminated: false }
    }

    /// Builds a response from bytes as they came off the wire.
    /// Input longer than [`RESPONSE_CAPACITY`] is cut off.
    pub fn from_wire(raw: &[u8]) -> Self {
        let mut response = Self::new();
        let len = raw.len().min(RESPONSE_CAPACITY);
        response.bytes[..len].copy_from_slice(&raw[..len]);
        response.ingest(len);
        response
    }

    /// Masks the first `len` bytes of the buffer and locates the terminator.
    fn ingest(&mut self, len: usize) {
        let len = len.min(RESPONSE_CAPACITY);
        for byte in &mut self.bytes[..len] {
            *byte &= PARITY_MASK;
        }
        self.len = len;
        match self.bytes[..len].windows(2).position(|w| w == b"\r\n") {
            Some(pos) => {
                self.line_len = pos;
                self.terminated = true;
            }
            None => {
                self.line_len = len;
                self.terminated = false;
            }
        }
    }

    /// Decides whether the capture is usable.
    ///
    /// A terminated line or a completely filled buffer is complete. Nothing at
    /// all means the sensor did not answer; anything else is a partial reply.
    pub fn complete<E: fmt::Debug>(self) -> Result<Self, Sdi12Error<E>> {
        if self.terminated || self.len == RESPONSE_CAPACITY {
            Ok(self)
        } else if self.len == 0 {
            Err(Sdi12Error::NoResponse)
        } else {
            Err(Sdi12Error::Timeout { received: self.len })
        }
    }

    /// Response content without the terminator.
    #[inline]
    pub fn line(&self) -> &[u8] {
        &self.bytes[..self.line_len]
    }

    #[inline]
    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    /// The line as text. Masked bytes are always 7-bit ASCII, so this only fails
    /// if that invariant is broken.
    pub fn as_str(&self) -> &str {
        str::from_utf8(self.line()).unwrap_or("")
    }
}

impl Default for RawResponse {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RawResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawResponse")
            .field("line", &self.as_str())
            .field("terminated", &self.terminated)
            .finish()
    }
}

/// Performs one receive into a fresh buffer and classifies the result.
///
/// Transport faults are reported at [`ExchangeStage::AwaitingResponse`].
pub fn capture<T: Sdi12Transport>(transport: &mut T, timeout_ms: u32) -> Result<RawResponse, Sdi12Error<T::Error>> {
    let mut response = RawResponse::new();
    let received = transport
        .receive(response.buffer_mut(), timeout_ms)
        .map_err(|error| Sdi12Error::Transport { stage: ExchangeStage::AwaitingResponse, error })?;
    response.settle(received)
}

impl RawResponse {
    /// The whole buffer, for a transport to receive into.
    pub(crate) fn buffer_mut(&mut self) -> &mut [u8] {
        &mut self.bytes
    }

    /// Classifies what a transport wrote into [`buffer_mut`](Self::buffer_mut).
    pub(crate) fn settle<E: fmt::Debug>(mut self, received: Received) -> Result<Self, Sdi12Error<E>> {
        let Received { len, truncated } = received;
        self.ingest(len);
        trace!("sdi12 rx {} bytes (truncated: {}): {}", len, truncated, self.as_str());
        self.complete()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recorder::mock::{MockError, MockTransport};

    #[test]
    fn test_high_bit_is_masked() {
        let response = RawResponse::from_wire(&[0xE1, 0xE2, 0xE3, 0x8D, 0x8A]);
        assert_eq!(response.line(), b"abc");
        assert!(response.is_terminated());
    }

    #[test]
    fn test_line_stops_at_terminator() {
        let response = RawResponse::from_wire(b"0013\r\ngarbage");
        assert_eq!(response.line(), b"0013");
        assert!(response.is_terminated());
    }

    #[test]
    fn test_empty_is_no_response() {
        let result = RawResponse::from_wire(b"").complete::<MockError>();
        assert!(matches!(result, Err(Sdi12Error::NoResponse)));
    }

    #[test]
    fn test_partial_is_timeout() {
        let result = RawResponse::from_wire(b"1+12.3").complete::<MockError>();
        assert!(matches!(result, Err(Sdi12Error::Timeout { received: 6 })));
    }

    #[test]
    fn test_full_buffer_is_complete() {
        let raw = [b'+'; RESPONSE_CAPACITY + 4];
        let response = RawResponse::from_wire(&raw).complete::<MockError>().unwrap();
        assert!(!response.is_terminated());
        assert_eq!(response.line().len(), RESPONSE_CAPACITY);
    }

    #[test]
    fn test_capture_through_transport() {
        let mut transport = MockTransport::new();
        transport.push_response(b"\xB0\xB1\xB4\xB1\r\n");
        let response = capture(&mut transport, 1000).unwrap();
        assert_eq!(response.as_str(), "0141");
    }

    #[test]
    fn test_capture_silent_bus() {
        let mut transport = MockTransport::new();
        assert!(matches!(capture(&mut transport, 1000), Err(Sdi12Error::NoResponse)));
    }

    #[test]
    fn test_capture_transport_fault() {
        let mut transport = MockTransport::new();
        transport.fail_receive();
        assert!(matches!(
            capture(&mut transport, 1000),
            Err(Sdi12Error::Transport { stage: ExchangeStage::AwaitingResponse, error: MockError })
        ));
    }
}
