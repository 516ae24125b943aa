// src/recorder/protocol_helpers.rs

// Decoding steps shared by the blocking and async recorders. Each takes the
// captured response line (terminator stripped) and checks it against the
// command that produced it.

use core::str;

use crate::common::{
    address::Sdi12Addr,
    response::{
        parse::{append_values, expect_address, split_address},
        DataValues, IdentificationInfo, MeasurementTiming, ResponseParseError, ResponseText,
    },
};

/// Copies a response line into an owned string.
pub(crate) fn to_text(line: &[u8]) -> Result<ResponseText, ResponseParseError> {
    if line.is_empty() {
        return Err(ResponseParseError::Empty);
    }
    // Capture masks to 7 bits and holds at most RESPONSE_CAPACITY bytes, so
    // neither conversion fails for a captured line.
    let text = str::from_utf8(line).map_err(|_| ResponseParseError::NotText)?;
    ResponseText::try_from(text).map_err(|_| ResponseParseError::Overlong)
}

/// `a!`: the reply must lead with the queried address.
pub(crate) fn decode_acknowledge(line: &[u8], address: Sdi12Addr) -> Result<ResponseText, ResponseParseError> {
    expect_address(line, address)?;
    to_text(line)
}

/// `?!`: the reply is the lone address of the sensor on the bus.
pub(crate) fn decode_discovered(line: &[u8]) -> Result<Sdi12Addr, ResponseParseError> {
    let (address, rest) = split_address(line)?;
    if !rest.is_empty() {
        return Err(ResponseParseError::TrailingPayload);
    }
    Ok(address)
}

/// `aI!`: structured identification from the addressed sensor.
pub(crate) fn decode_identification(line: &[u8], address: Sdi12Addr) -> Result<IdentificationInfo, ResponseParseError> {
    expect_address(line, address)?;
    IdentificationInfo::parse(line)
}

/// `aM!`: `atttn` from the addressed sensor.
pub(crate) fn decode_timing(line: &[u8], address: Sdi12Addr) -> Result<MeasurementTiming, ResponseParseError> {
    expect_address(line, address)?;
    MeasurementTiming::parse(line)
}

/// `aDn!`: appends this data set's values, refusing empty sets and overshoot.
pub(crate) fn accumulate_values(
    line: &[u8],
    address: Sdi12Addr,
    values: &mut DataValues,
    expected: u16,
) -> Result<(), ResponseParseError> {
    let payload = expect_address(line, address)?;
    if append_values(payload, values)? == 0 {
        return Err(ResponseParseError::NoValues);
    }
    check_overshoot(values, expected)
}

fn check_overshoot(values: &DataValues, expected: u16) -> Result<(), ResponseParseError> {
    if values.len() > usize::from(expected) {
        return Err(ResponseParseError::FieldCountMismatch { expected, received: values.len() });
    }
    Ok(())
}

/// After the last data set: exactly the advertised number of values.
pub(crate) fn check_value_count(values: &DataValues, expected: u16) -> Result<(), ResponseParseError> {
    if values.len() != usize::from(expected) {
        return Err(ResponseParseError::FieldCountMismatch { expected, received: values.len() });
    }
    Ok(())
}
