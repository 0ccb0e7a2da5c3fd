//! # Device Hardware Address
//!
//! Every cache in this crate is keyed by the normalized form of the advertiser's
//! 6-byte hardware address: uppercase hex without separators (`EA109060BC01`).

use crate::error::OtodataError;
use crate::util::hex::{decode_hex, encode_hex_upper};
use std::fmt;
use std::str::FromStr;

/// 6-byte BLE hardware address, most significant byte first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeviceAddress([u8; 6]);

impl DeviceAddress {
    pub const fn new(bytes: [u8; 6]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 6] {
        &self.0
    }

    /// Cache key form: uppercase hex, no separators
    pub fn normalized(&self) -> String {
        encode_hex_upper(&self.0)
    }
}

impl From<[u8; 6]> for DeviceAddress {
    fn from(bytes: [u8; 6]) -> Self {
        Self(bytes)
    }
}

impl FromStr for DeviceAddress {
    type Err = OtodataError;

    /// Accepts `EA:10:90:60:BC:01`, `ea-10-90-60-bc-01` or `EA109060BC01`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let cleaned: String = s.chars().filter(|c| *c != ':' && *c != '-').collect();
        let bytes =
            decode_hex(&cleaned).map_err(|e| OtodataError::InvalidAddress(format!("{s}: {e}")))?;
        let bytes: [u8; 6] = bytes
            .try_into()
            .map_err(|_| OtodataError::InvalidAddress(format!("{s}: expected 6 bytes")))?;
        Ok(Self(bytes))
    }
}

impl fmt::Display for DeviceAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a:02X}:{b:02X}:{c:02X}:{d:02X}:{e:02X}:{g:02X}")
    }
}
