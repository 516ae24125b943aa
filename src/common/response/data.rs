// src/common/response/data.rs

use super::error::ResponseParseError;
use crate::common::types::Sdi12Value;

/// Upper bound on values collected for one measurement.
pub const MAX_VALUES: usize = 20;

/// Values decoded from one or more `aDn!` responses, in sensor order.
pub type DataValues = heapless::Vec<Sdi12Value, MAX_VALUES>;

/// The three values of a soil sensor's base measurement (`aM!`), each × 1000.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MeasurementResult {
    /// Volumetric water content.
    pub volumetric_water_content: i32,
    /// Bulk electrical conductivity.
    pub electrical_conductivity: i32,
    /// Temperature in degrees Celsius.
    pub temperature: i32,
}

impl MeasurementResult {
    pub const FIELD_COUNT: usize = 3;

    /// Maps exactly three values onto the result fields.
    pub fn from_values(values: &[Sdi12Value]) -> Result<Self, ResponseParseError> {
        match values {
            [vwc, ec, temp] => Ok(MeasurementResult {
                volumetric_water_content: vwc.milli(),
                electrical_conductivity: ec.milli(),
                temperature: temp.milli(),
            }),
            _ => Err(ResponseParseError::FieldCountMismatch {
                expected: Self::FIELD_COUNT as u16,
                received: values.len(),
            }),
        }
    }
}
