// src/common/address.rs

use super::error::Sdi12Error;
use core::convert::{Infallible, TryFrom};
use core::fmt;

/// A validated SDI-12 sensor address.
///
/// Standard addresses are `'0'..='9'`; `'a'..='z'` and `'A'..='Z'` are the
/// extended range. The wildcard `'?'` cannot be built through [`Sdi12Addr::new`]
/// and is only reachable as [`Sdi12Addr::QUERY_ADDRESS`].
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Sdi12Addr(char);

impl Sdi12Addr {
    pub const DEFAULT_ADDRESS: Sdi12Addr = Sdi12Addr('0');
    /// Wildcard used by the `?!` address query. Only one sensor may be on the bus.
    pub const QUERY_ADDRESS: Sdi12Addr = Sdi12Addr('?');

    /// Creates a new `Sdi12Addr` if the given character is a valid sensor address.
    pub fn new(address_char: char) -> Result<Self, Sdi12Error<Infallible>> {
        if Self::is_valid_address_char(address_char) {
            Ok(Sdi12Addr(address_char))
        } else {
            Err(Sdi12Error::InvalidAddress(address_char))
        }
    }

    /// Builds an address from a received response byte (already masked to 7 bits).
    pub fn from_response_byte(byte: u8) -> Option<Self> {
        Self::new(byte as char).ok()
    }

    #[inline]
    pub const fn as_char(&self) -> char {
        self.0
    }

    #[inline]
    pub const fn is_query(&self) -> bool {
        self.0 == '?'
    }

    #[inline]
    pub const fn is_valid_address_char(c: char) -> bool {
        matches!(c, '0'..='9' | 'a'..='z' | 'A'..='Z')
    }
}

impl Default for Sdi12Addr {
    fn default() -> Self {
        Self::DEFAULT_ADDRESS
    }
}

impl TryFrom<char> for Sdi12Addr {
    type Error = Sdi12Error<Infallible>;

    fn try_from(value: char) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Sdi12Addr> for char {
    fn from(value: Sdi12Addr) -> Self {
        value.0
    }
}

impl fmt::Display for Sdi12Addr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
