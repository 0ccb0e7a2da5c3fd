//! # Otodata BLE Advertisements
//!
//! Frame validation, tag classification and per-kind field decoding for the
//! manufacturer-specific data broadcast by Otodata tank monitors.

pub mod address;
pub mod decoders;
pub mod frame;
pub mod packet;

pub use address::DeviceAddress;
pub use decoders::{decode_packet, DecodedPacket, DeviceAttributes, StatusValues, TelemetryReading};
pub use frame::{build_ad_structure, AdvertisementFrame, FrameHeader};
pub use packet::{Classification, PacketKind};
