//! SDI-12 command definitions and framing.
//!
//! Only the recorder-side subset is modelled: acknowledge/address query (`a!`, `?!`),
//! identification (`aI!`), start measurement (`aM!`, `aM1!`..`aM9!`) and send data
//! (`aD0!`..`aD9!`). See SDI-12 Specification v1.4, Section 4.4.

use arrayvec::ArrayString;
use core::convert::Infallible;
use core::fmt::{self, Write};

use super::{address::Sdi12Addr, Sdi12Error};

/// Longest framed command is `aM9!` / `aD9!`; a little slack is kept.
pub const MAX_COMMAND_LEN: usize = 8;

/// Fixed-capacity buffer holding a framed command.
pub type CommandBuffer = ArrayString<MAX_COMMAND_LEN>;

/// Which measurement set a start-measurement command selects.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MeasurementIndex {
    /// `aM!`
    Base,
    /// `aM1!`..`aM9!`
    Additional(u8),
}

impl MeasurementIndex {
    /// `0` selects [`MeasurementIndex::Base`], `1..=9` an additional set.
    pub fn new(index: u8) -> Result<Self, Sdi12Error<Infallible>> {
        match index {
            0 => Ok(MeasurementIndex::Base),
            1..=9 => Ok(MeasurementIndex::Additional(index)),
            _ => Err(Sdi12Error::InvalidParameter("measurement index must be 0-9")),
        }
    }
}

/// Data set index for `aDn!`, 0 to 9.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DataIndex(u8);

impl DataIndex {
    pub const FIRST: DataIndex = DataIndex(0);
    pub const LAST: DataIndex = DataIndex(9);

    pub fn new(index: u8) -> Result<Self, Sdi12Error<Infallible>> {
        if index <= 9 {
            Ok(DataIndex(index))
        } else {
            Err(Sdi12Error::InvalidParameter("data index must be 0-9"))
        }
    }

    #[inline]
    pub const fn get(&self) -> u8 {
        self.0
    }

    /// The following data set, or `None` after `D9`.
    pub fn next(&self) -> Option<Self> {
        if self.0 < 9 {
            Some(DataIndex(self.0 + 1))
        } else {
            None
        }
    }
}

/// The command verb, everything between the address and the `!`.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Verb {
    /// Empty verb: `a!` (acknowledge active) or `?!` with the wildcard address.
    QueryAddress,
    /// `aI!`
    GetInfo,
    /// `aM!` / `aMn!`
    Measure(MeasurementIndex),
    /// `aDn!`
    GetData(DataIndex),
}

/// An addressed SDI-12 command.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Command {
    address: Sdi12Addr,
    verb: Verb,
}

impl Command {
    /// Builds a command. The wildcard address is only accepted with [`Verb::QueryAddress`].
    pub fn new(address: Sdi12Addr, verb: Verb) -> Result<Self, Sdi12Error<Infallible>> {
        if address.is_query() && verb != Verb::QueryAddress {
            return Err(Sdi12Error::InvalidParameter("wildcard address only valid for address query"));
        }
        Ok(Command { address, verb })
    }

    /// The `?!` command.
    pub const fn address_query() -> Self {
        Command { address: Sdi12Addr::QUERY_ADDRESS, verb: Verb::QueryAddress }
    }

    /// Returns the address the command is directed to.
    #[inline]
    pub fn address(&self) -> Sdi12Addr {
        self.address
    }

    #[inline]
    pub fn verb(&self) -> Verb {
        self.verb
    }

    /// Frames the command into its wire representation.
    pub fn format_into(&self) -> Result<CommandBuffer, Sdi12Error<Infallible>> {
        let mut buffer = CommandBuffer::new();
        write!(buffer, "{}", self).map_err(|_| Sdi12Error::InvalidParameter("command exceeds frame capacity"))?;
        Ok(buffer)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.address)?;
        match self.verb {
            Verb::QueryAddress => {}
            Verb::GetInfo => f.write_char('I')?,
            Verb::Measure(MeasurementIndex::Base) => f.write_char('M')?,
            Verb::Measure(MeasurementIndex::Additional(idx)) => write!(f, "M{}", idx)?,
            Verb::GetData(idx) => write!(f, "D{}", idx.get())?,
        }
        f.write_char('!')
    }
}

/// Validates a raw address character and frames `verb` for it.
pub fn frame(address: char, verb: Verb) -> Result<CommandBuffer, Sdi12Error<Infallible>> {
    let address = Sdi12Addr::new(address)?;
    Command::new(address, verb)?.format_into()
}
