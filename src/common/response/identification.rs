// src/common/response/identification.rs

use core::str;

use super::error::ResponseParseError;
use super::parse::split_address;
use crate::common::address::Sdi12Addr;

/// Identification returned by `aI!`: `allccccccccmmmmmmvvvxxx...`. (Sec 4.4.2)
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct IdentificationInfo {
    /// The address of the responding sensor.
    pub address: Sdi12Addr,
    /// SDI-12 version times ten (`13` for v1.3).
    pub sdi_version: u8,
    /// 8-character vendor identification.
    pub vendor: heapless::String<8>,
    /// 6-character sensor model.
    pub model: heapless::String<6>,
    /// 3-character sensor version.
    pub version: heapless::String<3>,
    /// Optional field, up to 13 characters (usually a serial number).
    pub optional: heapless::String<13>,
}

const VERSION_LEN: usize = 2;
const VENDOR_LEN: usize = 8;
const MODEL_LEN: usize = 6;
const SENSOR_VERSION_LEN: usize = 3;
const MIN_LEN: usize = VERSION_LEN + VENDOR_LEN + MODEL_LEN + SENSOR_VERSION_LEN;

impl IdentificationInfo {
    pub fn parse(line: &[u8]) -> Result<Self, ResponseParseError> {
        let (address, rest) = split_address(line)?;
        if rest.len() < MIN_LEN || !rest[..VERSION_LEN].iter().all(u8::is_ascii_digit) {
            return Err(ResponseParseError::InvalidIdentification);
        }
        if rest.iter().any(|b| !(0x20..0x7F).contains(b)) {
            return Err(ResponseParseError::InvalidIdentification);
        }

        let sdi_version = (rest[0] - b'0') * 10 + (rest[1] - b'0');
        let (vendor, rest) = rest[VERSION_LEN..].split_at(VENDOR_LEN);
        let (model, rest) = rest.split_at(MODEL_LEN);
        let (version, optional) = rest.split_at(SENSOR_VERSION_LEN);

        Ok(IdentificationInfo {
            address,
            sdi_version,
            vendor: text(vendor)?,
            model: text(model)?,
            version: text(version)?,
            optional: text(optional)?,
        })
    }
}

fn text<const N: usize>(bytes: &[u8]) -> Result<heapless::String<N>, ResponseParseError> {
    let s = str::from_utf8(bytes).map_err(|_| ResponseParseError::InvalidIdentification)?;
    heapless::String::try_from(s).map_err(|_| ResponseParseError::InvalidIdentification)
}
