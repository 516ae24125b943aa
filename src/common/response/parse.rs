// src/common/response/parse.rs

use super::data::{DataValues, MAX_VALUES};
use super::error::ResponseParseError;
use crate::common::address::Sdi12Addr;
use crate::common::types::{Sdi12ParsingError, Sdi12Value};

#[inline]
fn is_sign(b: u8) -> bool {
    b == b'+' || b == b'-'
}

/// Splits a response line into its leading sensor address and the remaining payload.
pub fn split_address(line: &[u8]) -> Result<(Sdi12Addr, &[u8]), ResponseParseError> {
    let (&first, rest) = line.split_first().ok_or(ResponseParseError::Empty)?;
    let address = Sdi12Addr::from_response_byte(first).ok_or(ResponseParseError::InvalidAddressChar(first))?;
    Ok((address, rest))
}

/// Like [`split_address`], but the address must be `expected`.
pub fn expect_address(line: &[u8], expected: Sdi12Addr) -> Result<&[u8], ResponseParseError> {
    let (received, rest) = split_address(line)?;
    if received != expected {
        return Err(ResponseParseError::AddressMismatch {
            expected: expected.as_char(),
            received: received.as_char(),
        });
    }
    Ok(rest)
}

/// Parses the `<values>` part of a data response (everything after the address).
///
/// Each value starts with its sign; the next sign ends it. An empty payload
/// yields no values.
pub fn parse_values(payload: &[u8]) -> Result<DataValues, ResponseParseError> {
    let mut values = DataValues::new();
    append_values(payload, &mut values)?;
    Ok(values)
}

/// Appends the values in `payload` to `values`, as used when several `aDn!`
/// replies make up one measurement.
pub fn append_values(payload: &[u8], values: &mut DataValues) -> Result<usize, ResponseParseError> {
    if payload.is_empty() {
        return Ok(0);
    }
    if !is_sign(payload[0]) {
        return Err(Sdi12ParsingError::InvalidSign.into());
    }

    let mut added = 0;
    let mut start = 0;
    for i in 1..=payload.len() {
        if i == payload.len() || is_sign(payload[i]) {
            let value = Sdi12Value::parse_single(&payload[start..i])?;
            values.push(value).map_err(|_| ResponseParseError::TooManyValues)?;
            added += 1;
            start = i;
        }
    }
    debug_assert!(values.len() <= MAX_VALUES);
    Ok(added)
}
