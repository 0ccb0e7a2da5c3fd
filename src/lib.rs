//! # otodata-rs - Otodata Propane Tank Monitor Advertisement Decoder
//!
//! Otodata tank monitors broadcast their readings in BLE manufacturer-specific
//! data. This crate classifies each advertisement by its embedded ASCII type
//! tag and decodes it into normalized readings.
//!
//! ## Features
//!
//! - Validate and classify advertisements (`OTOTELE`, `OTOSTAT`, `OTO3xxx`)
//! - Decode tank level and battery percentages from telemetry packets
//! - Cache product/model from device info packets and attach them to later telemetry
//! - Read serial number and revisions once per device over GATT, in the background
//! - Persist the GATT identity fields in a JSON store shared with the `otodata-cli` utility
//! - Per-device decode statistics and `log`-based diagnostics
//!
//! ## Usage
//!
//! ```toml
//! [dependencies]
//! otodata-rs = "0.1.0"
//! ```
//!
//! ```rust
//! use otodata_rs::{DecoderConfig, DeviceAddress, OtodataParser};
//!
//! let parser = OtodataParser::in_memory(DecoderConfig::default());
//! let mac: DeviceAddress = "EA:10:90:60:BC:01".parse().unwrap();
//!
//! // Device info packet: caches MT4AD-TM5040, yields no record
//! let info = [
//!     0x1a, 0xff, 0xb1, 0x03, b'O', b'T', b'O', b'3', b'2', b'8', b'1', 0x90, 0x60, 0xbc,
//!     0x01, 0x10, 0x18, 0x21, 0x03, 0x84, 0x06, 0x03, 0x04, 0xb0, 0x13, 0x02, 0x05,
//! ];
//! assert!(parser.parse(&info, &mac).is_none());
//!
//! // Telemetry packet
//! let mut tele = vec![0x1b, 0xff, 0xb1, 0x03];
//! tele.extend_from_slice(b"OTOTELE");
//! tele.extend_from_slice(&[0x01, 0x0a, 0x1d]);
//! tele.resize(28, 0);
//!
//! let record = parser.parse(&tele, &mac).unwrap();
//! assert_eq!(record.tank_level, 71);
//! assert_eq!(record.product.as_deref(), Some("MT4AD-TM5040"));
//! ```

pub mod ble;
pub mod cache;
pub mod config;
pub mod constants;
pub mod enrichment;
pub mod error;
pub mod instrumentation;
pub mod logging;
pub mod parser;
pub mod record;
pub mod util;

pub use crate::error::OtodataError;
pub use crate::logging::{init_logger, log_info};

pub use ble::{
    decode_packet, AdvertisementFrame, DecodedPacket, DeviceAddress, DeviceAttributes, PacketKind,
    TelemetryReading,
};
pub use cache::{DeviceAttributeCache, EnrichmentRecord, EnrichmentStore};
pub use config::DecoderConfig;
pub use enrichment::{EnrichmentFetcher, EnrichmentState, GattClient, GattSession};
pub use parser::OtodataParser;
pub use record::{OtodataRecord, ResultAssembler};

/// Decode one advertisement with a throwaway parser.
///
/// Convenience for one-off decoding; caches are not retained between calls, so
/// telemetry records never carry product or enrichment fields.
pub fn parse_otodata(data: &[u8], mac: &DeviceAddress) -> Option<OtodataRecord> {
    OtodataParser::in_memory(DecoderConfig::default()).parse(data, mac)
}
