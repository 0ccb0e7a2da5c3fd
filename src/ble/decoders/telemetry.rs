//! `OTOTELE` telemetry packets
//!
//! The device reports how empty the tank is and how depleted the battery is;
//! both readings are `100 - byte`.

use super::{malformed, FieldDecoder};
use crate::ble::frame::AdvertisementFrame;
use crate::ble::packet::PacketKind;
use crate::constants::{TELE_DEPLETED_BATTERY_OFFSET, TELE_EMPTY_TANK_OFFSET};
use crate::error::OtodataError;
use serde::{Deserialize, Serialize};

/// Tank and battery levels in percent.
///
/// Values are raw `100 - byte` arithmetic and are not clamped; a source byte
/// above 100 yields a negative level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetryReading {
    pub tank_level: i16,
    pub battery: i16,
}

impl TelemetryReading {
    pub fn from_raw(empty_tank: u8, depleted_battery: u8) -> Self {
        Self {
            tank_level: 100 - i16::from(empty_tank),
            battery: 100 - i16::from(depleted_battery),
        }
    }

    /// Both levels fall within 0..=100
    pub fn is_in_range(&self) -> bool {
        (0..=100).contains(&self.tank_level) && (0..=100).contains(&self.battery)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TelemetryDecoder;

impl FieldDecoder for TelemetryDecoder {
    type Output = TelemetryReading;

    const KIND: PacketKind = PacketKind::Telemetry;
    const REQUIRED_LEN: usize = TELE_EMPTY_TANK_OFFSET + 1;

    fn decode_fields(
        &self,
        frame: &AdvertisementFrame<'_>,
    ) -> Result<TelemetryReading, OtodataError> {
        let depleted = frame
            .byte_at(TELE_DEPLETED_BATTERY_OFFSET)
            .ok_or_else(|| malformed(Self::KIND, frame, Self::REQUIRED_LEN))?;
        let empty = frame
            .byte_at(TELE_EMPTY_TANK_OFFSET)
            .ok_or_else(|| malformed(Self::KIND, frame, Self::REQUIRED_LEN))?;

        let reading = TelemetryReading::from_raw(empty, depleted);
        log::debug!(
            "OTOTELE: tank_level={}% (empty={}%), battery={}% (depleted={}%)",
            reading.tank_level,
            empty,
            reading.battery,
            depleted
        );
        Ok(reading)
    }
}
