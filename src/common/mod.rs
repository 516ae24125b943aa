// src/common/mod.rs

// --- Declare all public modules within common ---
pub mod address;
pub mod command;
pub mod error;
pub mod hal_traits;
pub mod response;
pub mod timing;
pub mod types;

// --- Re-export key types/traits/functions for easier access ---

// From address.rs
pub use address::Sdi12Addr;

// From command.rs
pub use command::{frame, Command, CommandBuffer, DataIndex, MeasurementIndex, Verb};

// From error.rs
pub use error::{ErrorKind, ExchangeStage, Sdi12Error};

// From hal_traits.rs
pub use hal_traits::{LineControl, LineDirection, LineLevel, Received, Sdi12Serial, Sdi12Timer, Sdi12Transport};

#[cfg(feature = "async")]
pub use hal_traits::Sdi12TransportAsync;

// From response/mod.rs (and its sub-modules via its own `pub use`)
pub use response::{
    IdentificationInfo, MeasurementResult, MeasurementTiming, RawResponse, ResponseParseError, ResponseText,
    DataValues,
};

// From types.rs
pub use types::{Sdi12ParsingError, Sdi12Value};
