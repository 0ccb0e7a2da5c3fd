//! `OTOSTAT` status packets
//!
//! The field layout is not understood. Two adjacent little-endian words are
//! extracted for diagnostics only; they never become sensor readings.

use super::FieldDecoder;
use crate::ble::frame::AdvertisementFrame;
use crate::ble::packet::PacketKind;
use crate::constants::{STAT_VALUE_A_OFFSET, STAT_VALUE_B_OFFSET};
use crate::error::OtodataError;

/// Raw words observed in a status packet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatusValues {
    pub value_a: Option<u16>,
    pub value_b: Option<u16>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StatusDecoder;

impl FieldDecoder for StatusDecoder {
    type Output = StatusValues;

    const KIND: PacketKind = PacketKind::Status;
    const REQUIRED_LEN: usize = 0;

    fn decode_fields(&self, frame: &AdvertisementFrame<'_>) -> Result<StatusValues, OtodataError> {
        let values = StatusValues {
            value_a: frame.le_u16_at(STAT_VALUE_A_OFFSET),
            value_b: frame.le_u16_at(STAT_VALUE_B_OFFSET),
        };
        log::debug!(
            "OTOSTAT values - bytes[12-13]={:?}, bytes[14-15]={:?}",
            values.value_a,
            values.value_b
        );
        Ok(values)
    }
}
