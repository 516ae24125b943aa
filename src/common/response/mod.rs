// src/common/response/mod.rs

mod capture;
mod data;
mod error;
mod identification;
mod timing;
pub mod parse; // Make parse functions public

// Re-export items for external use
pub use capture::{capture, RawResponse, PARITY_MASK, RESPONSE_CAPACITY};
pub use data::{DataValues, MeasurementResult, MAX_VALUES};
pub use error::ResponseParseError;
pub use identification::IdentificationInfo;
pub use timing::MeasurementTiming;
pub use parse::{parse_values, split_address};

/// Response line returned verbatim to the caller (address query, identification).
pub type ResponseText = heapless::String<RESPONSE_CAPACITY>;
