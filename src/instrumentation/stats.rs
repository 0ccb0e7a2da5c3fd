//! # Per-Device Decode Statistics
//!
//! Counts decode outcomes in total and per device. Frames that the parser
//! drops silently still show up here, which helps with diagnosing a device
//! that never produces readings.
//!
//! ## Usage
//!
//! ```rust
//! use otodata_rs::ble::DeviceAddress;
//! use otodata_rs::instrumentation::{DecodeOutcome, DecodeStats};
//!
//! let stats = DecodeStats::new();
//! let addr = DeviceAddress::new([0xEA, 0x10, 0x90, 0x60, 0xBC, 0x01]);
//! stats.record(&addr, DecodeOutcome::Telemetry);
//! assert_eq!(stats.count(DecodeOutcome::Telemetry), 1);
//! ```

use crate::ble::DeviceAddress;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::SystemTime;

/// What happened to one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DecodeOutcome {
    /// Telemetry record produced
    Telemetry,
    /// Info packet cached
    Info,
    /// Status packet classified and dropped
    Status,
    /// Below minimum frame length
    TooShort,
    /// Unknown type tag
    Unrecognized,
    /// Known kind, missing fields
    Malformed,
}

#[derive(Debug, Clone)]
struct DeviceStats {
    frames: u64,
    outcomes: HashMap<DecodeOutcome, u64>,
    first_seen: SystemTime,
    last_seen: SystemTime,
}

impl DeviceStats {
    fn new() -> Self {
        let now = SystemTime::now();
        Self {
            frames: 0,
            outcomes: HashMap::new(),
            first_seen: now,
            last_seen: now,
        }
    }
}

#[derive(Debug, Default)]
struct StatsInner {
    totals: HashMap<DecodeOutcome, u64>,
    devices: HashMap<String, DeviceStats>,
    enrichment_scheduled: u64,
}

/// Thread-safe decode counters owned by one parser
#[derive(Debug, Default)]
pub struct DecodeStats {
    inner: Mutex<StatsInner>,
}

impl DecodeStats {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, StatsInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn record(&self, address: &DeviceAddress, outcome: DecodeOutcome) {
        let mut inner = self.lock();
        *inner.totals.entry(outcome).or_insert(0) += 1;

        let device = inner
            .devices
            .entry(address.normalized())
            .or_insert_with(DeviceStats::new);
        device.frames += 1;
        *device.outcomes.entry(outcome).or_insert(0) += 1;
        device.last_seen = SystemTime::now();
    }

    pub fn record_enrichment_scheduled(&self) {
        self.lock().enrichment_scheduled += 1;
    }

    pub fn count(&self, outcome: DecodeOutcome) -> u64 {
        self.lock().totals.get(&outcome).copied().unwrap_or(0)
    }

    pub fn enrichment_scheduled(&self) -> u64 {
        self.lock().enrichment_scheduled
    }

    /// Export statistics as a JSON-serializable struct
    pub fn export(&self) -> DecodeStatsExport {
        let inner = self.lock();
        let mut devices: Vec<DeviceStatsExport> = inner
            .devices
            .iter()
            .map(|(mac, d)| DeviceStatsExport {
                mac: mac.clone(),
                frames: d.frames,
                outcomes: d.outcomes.iter().map(|(k, v)| (*k, *v)).collect(),
                first_seen: d.first_seen,
                last_seen: d.last_seen,
            })
            .collect();
        devices.sort_by(|a, b| a.mac.cmp(&b.mac));

        DecodeStatsExport {
            frames: inner.totals.values().sum(),
            outcomes: inner.totals.iter().map(|(k, v)| (*k, *v)).collect(),
            enrichment_scheduled: inner.enrichment_scheduled,
            devices,
        }
    }
}

/// Exportable decode statistics (for serialization)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecodeStatsExport {
    pub frames: u64,
    pub outcomes: BTreeMap<DecodeOutcome, u64>,
    pub enrichment_scheduled: u64,
    pub devices: Vec<DeviceStatsExport>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceStatsExport {
    pub mac: String,
    pub frames: u64,
    pub outcomes: BTreeMap<DecodeOutcome, u64>,
    pub first_seen: SystemTime,
    pub last_seen: SystemTime,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_by_outcome_and_device() {
        let stats = DecodeStats::new();
        let a = DeviceAddress::new([0, 0, 0, 0, 0, 1]);
        let b = DeviceAddress::new([0, 0, 0, 0, 0, 2]);

        stats.record(&a, DecodeOutcome::Info);
        stats.record(&a, DecodeOutcome::Telemetry);
        stats.record(&a, DecodeOutcome::Telemetry);
        stats.record(&b, DecodeOutcome::TooShort);
        stats.record_enrichment_scheduled();

        assert_eq!(stats.count(DecodeOutcome::Telemetry), 2);
        assert_eq!(stats.count(DecodeOutcome::Status), 0);
        assert_eq!(stats.enrichment_scheduled(), 1);

        let export = stats.export();
        assert_eq!(export.frames, 4);
        assert_eq!(export.devices.len(), 2);
        assert_eq!(export.devices[0].mac, "000000000001");
        assert_eq!(export.devices[0].frames, 3);
        assert_eq!(export.devices[0].outcomes[&DecodeOutcome::Telemetry], 2);
    }

    #[test]
    fn test_export_serializes() {
        let stats = DecodeStats::new();
        stats.record(&DeviceAddress::new([0; 6]), DecodeOutcome::Status);

        let json = serde_json::to_string(&stats.export()).unwrap();
        assert!(json.contains("\"Status\":1"));
    }
}
