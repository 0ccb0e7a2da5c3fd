//! Kind-specific field decoders for Otodata packets.
//!
//! [`decode_packet`] runs the full pure pipeline for one frame: length
//! validation, tag classification and the matching [`FieldDecoder`]. It has no
//! side effects; cache updates happen in [`crate::parser::OtodataParser`].

pub mod info;
pub mod status;
pub mod telemetry;

pub use info::{DeviceAttributes, InfoDecoder};
pub use status::{StatusDecoder, StatusValues};
pub use telemetry::{TelemetryDecoder, TelemetryReading};

use crate::ble::frame::AdvertisementFrame;
use crate::ble::packet::PacketKind;
use crate::error::OtodataError;

/// Decoder for the fields of one packet kind
pub trait FieldDecoder {
    type Output;

    /// Packet kind handled by this decoder
    const KIND: PacketKind;

    /// Minimum frame length that reaches every required field
    const REQUIRED_LEN: usize;

    /// Check the length requirement, then extract the fields.
    fn decode(&self, frame: &AdvertisementFrame<'_>) -> Result<Self::Output, OtodataError> {
        if frame.len() < Self::REQUIRED_LEN {
            return Err(malformed(Self::KIND, frame, Self::REQUIRED_LEN));
        }
        self.decode_fields(frame)
    }

    fn decode_fields(&self, frame: &AdvertisementFrame<'_>) -> Result<Self::Output, OtodataError>;
}

pub(crate) fn malformed(
    kind: PacketKind,
    frame: &AdvertisementFrame<'_>,
    needed: usize,
) -> OtodataError {
    OtodataError::MalformedField {
        kind,
        len: frame.len(),
        needed,
    }
}

/// Fields extracted from one frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodedPacket {
    Telemetry(TelemetryReading),
    Info(DeviceAttributes),
    Status(StatusValues),
}

/// Validate, classify and decode a single frame.
pub fn decode_packet(frame: &AdvertisementFrame<'_>) -> Result<DecodedPacket, OtodataError> {
    frame.validate()?;

    let classification = PacketKind::classify(frame);
    log::debug!(
        "Otodata packet type: '{}', length: {} bytes",
        classification.tag,
        frame.len()
    );

    match classification.kind {
        PacketKind::Telemetry => TelemetryDecoder.decode(frame).map(DecodedPacket::Telemetry),
        PacketKind::Info => InfoDecoder.decode(frame).map(DecodedPacket::Info),
        PacketKind::Status => StatusDecoder.decode(frame).map(DecodedPacket::Status),
        PacketKind::Unrecognized => Err(OtodataError::Unrecognized(classification.tag)),
    }
}
