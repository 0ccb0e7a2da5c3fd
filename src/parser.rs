//! # Otodata Advertisement Parser
//!
//! [`OtodataParser`] is the decode entry point. It owns references to the
//! shared caches, runs the pure decode pipeline for each frame and applies the
//! side effects:
//!
//! - **Telemetry**: assemble and return a record
//! - **Info**: cache product/model, schedule enrichment, return nothing
//! - **Status / unrecognized / too short / malformed**: return nothing
//!
//! No error escapes [`OtodataParser::parse`]; a bad frame is dropped and logged.
//!
//! ## Usage
//!
//! ```rust
//! use otodata_rs::{DecoderConfig, DeviceAddress, OtodataParser};
//!
//! let parser = OtodataParser::in_memory(DecoderConfig::default());
//! let addr = DeviceAddress::new([0xEA, 0x10, 0x90, 0x60, 0xBC, 0x01]);
//!
//! let mut frame = vec![0x1b, 0xff, 0xb1, 0x03];
//! frame.extend_from_slice(b"OTOTELE");
//! frame.extend_from_slice(&[0x01, 10, 28]);
//! frame.resize(28, 0);
//!
//! let record = parser.parse(&frame, &addr).unwrap();
//! assert_eq!(record.tank_level, 72);
//! assert_eq!(record.battery, 90);
//! ```

use crate::ble::decoders::{decode_packet, DecodedPacket, DeviceAttributes};
use crate::ble::{AdvertisementFrame, DeviceAddress};
use crate::cache::{DeviceAttributeCache, EnrichmentStore};
use crate::config::DecoderConfig;
use crate::enrichment::{EnrichmentFetcher, GattClient};
use crate::error::OtodataError;
use crate::instrumentation::{DecodeOutcome, DecodeStats};
use crate::record::{OtodataRecord, ResultAssembler};
use crate::util::hex::encode_hex;
use crate::util::logging::ReportOnce;
use log::{debug, info, warn};
use std::sync::Arc;

#[derive(Debug)]
pub struct OtodataParser {
    config: DecoderConfig,
    attributes: Arc<DeviceAttributeCache>,
    store: Arc<EnrichmentStore>,
    fetcher: Option<Arc<EnrichmentFetcher>>,
    unknown_reports: ReportOnce,
    stats: DecodeStats,
}

impl OtodataParser {
    /// Create a parser over explicitly constructed caches, without enrichment.
    pub fn new(
        config: DecoderConfig,
        attributes: Arc<DeviceAttributeCache>,
        store: Arc<EnrichmentStore>,
    ) -> Self {
        Self {
            config,
            attributes,
            store,
            fetcher: None,
            unknown_reports: ReportOnce::new(),
            stats: DecodeStats::new(),
        }
    }

    /// Parser with fresh caches and no backing file
    pub fn in_memory(config: DecoderConfig) -> Self {
        Self::new(
            config,
            Arc::new(DeviceAttributeCache::new()),
            Arc::new(EnrichmentStore::in_memory()),
        )
    }

    /// Open the store at `config.store_path` and, when a client is given and
    /// `auto_enrich` is set, enable background enrichment.
    ///
    /// Call from within a tokio runtime so the fetcher can spawn reads.
    pub fn from_config(config: DecoderConfig, client: Option<Arc<dyn GattClient>>) -> Self {
        let store = Arc::new(EnrichmentStore::open(&config.store_path));
        let timeout = config.enrichment_timeout();
        let fetcher = client
            .filter(|_| config.auto_enrich)
            .map(|client| Arc::new(EnrichmentFetcher::new(client, Arc::clone(&store), timeout)));

        let mut parser = Self::new(config, Arc::new(DeviceAttributeCache::new()), store);
        parser.fetcher = fetcher;
        parser
    }

    pub fn with_fetcher(mut self, fetcher: Arc<EnrichmentFetcher>) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    pub fn attributes(&self) -> &Arc<DeviceAttributeCache> {
        &self.attributes
    }

    pub fn store(&self) -> &Arc<EnrichmentStore> {
        &self.store
    }

    pub fn fetcher(&self) -> Option<&Arc<EnrichmentFetcher>> {
        self.fetcher.as_ref()
    }

    pub fn stats(&self) -> &DecodeStats {
        &self.stats
    }

    /// Decode one advertisement. Returns a record only for telemetry packets.
    pub fn parse(&self, data: &[u8], mac: &DeviceAddress) -> Option<OtodataRecord> {
        let frame = AdvertisementFrame::new(data, *mac);

        match decode_packet(&frame) {
            Ok(DecodedPacket::Telemetry(reading)) => {
                self.stats.record(mac, DecodeOutcome::Telemetry);
                if !reading.is_in_range() {
                    warn!(
                        "Otodata {mac}: out-of-range telemetry tank_level={} battery={}",
                        reading.tank_level, reading.battery
                    );
                }
                Some(ResultAssembler::new(&self.attributes, &self.store).assemble(reading, mac))
            }
            Ok(DecodedPacket::Info(attributes)) => {
                self.stats.record(mac, DecodeOutcome::Info);
                self.handle_info(mac, attributes);
                None
            }
            Ok(DecodedPacket::Status(_)) => {
                self.stats.record(mac, DecodeOutcome::Status);
                None
            }
            Err(e) => {
                self.absorb(&frame, e);
                None
            }
        }
    }

    fn handle_info(&self, mac: &DeviceAddress, attributes: DeviceAttributes) {
        debug!("Otodata {mac}: product={} model={}", attributes.product, attributes.model);
        self.attributes.insert(mac, attributes);

        if let Some(fetcher) = &self.fetcher {
            if fetcher.schedule(*mac).is_some() {
                self.stats.record_enrichment_scheduled();
            }
        }
    }

    fn absorb(&self, frame: &AdvertisementFrame<'_>, error: OtodataError) {
        let mac = frame.address();
        match error {
            OtodataError::TooShort { .. } => {
                self.stats.record(mac, DecodeOutcome::TooShort);
                if self.config.report_unknown && self.unknown_reports.first(&mac.normalized()) {
                    info!(
                        "BLE ADV from UNKNOWN Otodata DEVICE: MAC: {mac}, ADV: {}",
                        encode_hex(frame.data())
                    );
                }
            }
            OtodataError::Unrecognized(tag) => {
                self.stats.record(mac, DecodeOutcome::Unrecognized);
                debug!("Unknown Otodata packet type '{tag}' from {mac}");
            }
            e @ OtodataError::MalformedField { .. } => {
                self.stats.record(mac, DecodeOutcome::Malformed);
                debug!("Failed to parse Otodata data from {mac}: {e}");
            }
            other => warn!("Otodata {mac}: {other}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADDR: DeviceAddress = DeviceAddress::new([0xEA, 0x10, 0x90, 0x60, 0xBC, 0x01]);

    fn frame(tag: &[u8], fields: &[(usize, u8)]) -> Vec<u8> {
        let mut data = vec![0x1b, 0xff, 0xb1, 0x03];
        data.extend_from_slice(tag);
        data.resize(28, 0x00);
        for &(offset, value) in fields {
            data[offset] = value;
        }
        data
    }

    #[test]
    fn test_outcomes_are_counted() {
        let parser = OtodataParser::in_memory(DecoderConfig::default());

        parser.parse(&[0u8; 5], &ADDR);
        parser.parse(&frame(b"NOTOTOX", &[]), &ADDR);
        parser.parse(&frame(b"OTOSTAT", &[]), &ADDR);
        parser.parse(&frame(b"OTO3281", &[(23, 0xb0), (24, 0x13)]), &ADDR);
        parser.parse(&frame(b"OTOTELE", &[(12, 10), (13, 28)]), &ADDR);

        let stats = parser.stats();
        assert_eq!(stats.count(DecodeOutcome::TooShort), 1);
        assert_eq!(stats.count(DecodeOutcome::Unrecognized), 1);
        assert_eq!(stats.count(DecodeOutcome::Status), 1);
        assert_eq!(stats.count(DecodeOutcome::Info), 1);
        assert_eq!(stats.count(DecodeOutcome::Telemetry), 1);
        assert_eq!(stats.enrichment_scheduled(), 0);
    }

    #[test]
    fn test_info_populates_attribute_cache() {
        let parser = OtodataParser::in_memory(DecoderConfig::default());
        assert!(parser
            .parse(&frame(b"OTO3281", &[(23, 0xb0), (24, 0x13)]), &ADDR)
            .is_none());
        assert_eq!(parser.attributes().get(&ADDR).unwrap().product, "MT4AD-TM5040");
    }

    #[test]
    fn test_unknown_device_reported_once() {
        let config = DecoderConfig {
            report_unknown: true,
            ..DecoderConfig::default()
        };
        let parser = OtodataParser::in_memory(config);

        assert!(parser.parse(&[0x1a, 0xff], &ADDR).is_none());
        assert!(parser.parse(&[0x1a, 0xff], &ADDR).is_none());
        assert_eq!(parser.unknown_reports.len(), 1);
        assert_eq!(parser.stats().count(DecodeOutcome::TooShort), 2);
    }

    #[test]
    fn test_unknown_reporting_disabled_by_default() {
        let parser = OtodataParser::in_memory(DecoderConfig::default());
        parser.parse(&[0x1a, 0xff], &ADDR);
        assert!(parser.unknown_reports.is_empty());
    }
}
