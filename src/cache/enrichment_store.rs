//! # Persisted Enrichment Store
//!
//! Durable map from normalized device address to the identity fields read
//! from the device's GATT Device Information service. The store is loaded once
//! at startup and rewritten as a whole after every successful merge.
//!
//! File format (pretty-printed JSON, one object per device):
//!
//! ```json
//! {
//!   "EA109060BC01": {
//!     "mac": "EA109060BC01",
//!     "manufacturer": "Otodata",
//!     "serial_number": "2104123456",
//!     "firmware_revision": "1.2.0"
//!   }
//! }
//! ```
//!
//! Merges are additive: a field that was not read never clears a stored value,
//! and entries are never evicted. The same file is written by the manual
//! `otodata-cli read` utility, so each merge re-reads the file under the store
//! lock before writing it back.

use crate::ble::DeviceAddress;
use crate::enrichment::characteristic::DeviceInfoCharacteristic;
use crate::error::OtodataError;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Extended identity fields for one device; each is independently optional
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichmentRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mac: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hardware_revision: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub firmware_revision: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub software_revision: Option<String>,
}

impl EnrichmentRecord {
    fn field_mut(&mut self, characteristic: DeviceInfoCharacteristic) -> &mut Option<String> {
        match characteristic {
            DeviceInfoCharacteristic::Manufacturer => &mut self.manufacturer,
            DeviceInfoCharacteristic::ModelNumber => &mut self.model,
            DeviceInfoCharacteristic::SerialNumber => &mut self.serial_number,
            DeviceInfoCharacteristic::HardwareRevision => &mut self.hardware_revision,
            DeviceInfoCharacteristic::FirmwareRevision => &mut self.firmware_revision,
            DeviceInfoCharacteristic::SoftwareRevision => &mut self.software_revision,
        }
    }

    pub fn get(&self, characteristic: DeviceInfoCharacteristic) -> Option<&str> {
        match characteristic {
            DeviceInfoCharacteristic::Manufacturer => self.manufacturer.as_deref(),
            DeviceInfoCharacteristic::ModelNumber => self.model.as_deref(),
            DeviceInfoCharacteristic::SerialNumber => self.serial_number.as_deref(),
            DeviceInfoCharacteristic::HardwareRevision => self.hardware_revision.as_deref(),
            DeviceInfoCharacteristic::FirmwareRevision => self.firmware_revision.as_deref(),
            DeviceInfoCharacteristic::SoftwareRevision => self.software_revision.as_deref(),
        }
    }

    pub fn set(&mut self, characteristic: DeviceInfoCharacteristic, value: String) {
        *self.field_mut(characteristic) = Some(value);
    }

    /// No identity field is present (`mac` does not count)
    pub fn is_empty(&self) -> bool {
        DeviceInfoCharacteristic::ALL
            .iter()
            .all(|&c| self.get(c).is_none())
    }

    /// Copy every present field of `other` into `self`; absent fields are kept.
    pub fn merge_from(&mut self, other: &EnrichmentRecord) {
        if other.mac.is_some() {
            self.mac.clone_from(&other.mac);
        }
        for characteristic in DeviceInfoCharacteristic::ALL {
            if let Some(value) = other.get(characteristic) {
                self.set(characteristic, value.to_string());
            }
        }
    }
}

type StoreMap = BTreeMap<String, EnrichmentRecord>;

/// File-backed enrichment store, shared behind an `Arc`
#[derive(Debug, Default)]
pub struct EnrichmentStore {
    path: Option<PathBuf>,
    devices: Mutex<StoreMap>,
}

impl EnrichmentStore {
    /// Store without a backing file (tests, offline decoding)
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Open the store at `path`.
    ///
    /// A missing file yields an empty store. An unreadable or corrupt file is
    /// logged and also yields an empty store; it is replaced on the next merge.
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let devices = read_store_file(&path).unwrap_or_else(|e| {
            warn!("Ignoring unreadable enrichment store {}: {e}", path.display());
            StoreMap::new()
        });
        debug!(
            "Loaded {} enriched device(s) from {}",
            devices.len(),
            path.display()
        );

        Self {
            path: Some(path),
            devices: Mutex::new(devices),
        }
    }

    /// Open the store at `path`, failing on a corrupt file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, OtodataError> {
        let path = path.as_ref().to_path_buf();
        let devices = read_store_file(&path)?;
        Ok(Self {
            path: Some(path),
            devices: Mutex::new(devices),
        })
    }

    fn lock(&self) -> MutexGuard<'_, StoreMap> {
        self.devices.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn get(&self, address: &DeviceAddress) -> Option<EnrichmentRecord> {
        self.get_by_key(&address.normalized())
    }

    pub fn get_by_key(&self, key: &str) -> Option<EnrichmentRecord> {
        self.lock().get(key).cloned()
    }

    pub fn contains(&self, address: &DeviceAddress) -> bool {
        self.contains_key(&address.normalized())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.lock().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy of every stored entry
    pub fn snapshot(&self) -> BTreeMap<String, EnrichmentRecord> {
        self.lock().clone()
    }

    /// Merge `record` into the entry for `address` and persist the whole store.
    ///
    /// Returns `Ok(false)` without touching the file when `record` carries no
    /// identity field. The in-memory map only changes once the file write has
    /// succeeded; on error the store is left as it was.
    pub fn merge(
        &self,
        address: &DeviceAddress,
        record: &EnrichmentRecord,
    ) -> Result<bool, OtodataError> {
        if record.is_empty() {
            return Ok(false);
        }

        let key = address.normalized();
        let mut devices = self.lock();
        let mut merged = devices.clone();

        if let Some(path) = &self.path {
            match read_store_file(path) {
                Ok(on_disk) => {
                    for (k, v) in on_disk {
                        merged.entry(k).or_default().merge_from(&v);
                    }
                }
                Err(e) => warn!("Overwriting unreadable enrichment store {}: {e}", path.display()),
            }
        }

        let entry = merged.entry(key.clone()).or_default();
        entry.merge_from(record);
        entry.mac = Some(key);

        if let Some(path) = &self.path {
            write_store_file(path, &merged)?;
            debug!("Enrichment store written to {}", path.display());
        }

        *devices = merged;
        Ok(true)
    }
}

fn read_store_file(path: &Path) -> Result<StoreMap, OtodataError> {
    match fs::read_to_string(path) {
        Ok(json) if json.trim().is_empty() => Ok(StoreMap::new()),
        Ok(json) => Ok(serde_json::from_str(&json)?),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(StoreMap::new()),
        Err(e) => Err(e.into()),
    }
}

/// Write via a sibling temp file and rename so readers never see a partial file.
fn write_store_file(path: &Path, devices: &StoreMap) -> Result<(), OtodataError> {
    let json = serde_json::to_string_pretty(devices)?;
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    fs::write(&tmp, json)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const ADDR: DeviceAddress = DeviceAddress::new([0xEA, 0x10, 0x90, 0x60, 0xBC, 0x01]);

    fn record(serial: Option<&str>, firmware: Option<&str>) -> EnrichmentRecord {
        EnrichmentRecord {
            serial_number: serial.map(String::from),
            firmware_revision: firmware.map(String::from),
            ..Default::default()
        }
    }

    #[test]
    fn test_merge_is_additive() {
        let store = EnrichmentStore::in_memory();
        assert!(store.merge(&ADDR, &record(Some("SN1"), None)).unwrap());
        assert!(store.merge(&ADDR, &record(None, Some("1.2.0"))).unwrap());

        let stored = store.get(&ADDR).unwrap();
        assert_eq!(stored.serial_number.as_deref(), Some("SN1"));
        assert_eq!(stored.firmware_revision.as_deref(), Some("1.2.0"));
        assert_eq!(stored.mac.as_deref(), Some("EA109060BC01"));
    }

    #[test]
    fn test_empty_record_not_stored() {
        let store = EnrichmentStore::in_memory();
        assert!(!store.merge(&ADDR, &EnrichmentRecord::default()).unwrap());
        assert!(!store.contains(&ADDR));
    }

    #[test]
    fn test_missing_file_is_empty_store() {
        let dir = TempDir::new().unwrap();
        let store = EnrichmentStore::open(dir.path().join("absent.json"));
        assert!(store.is_empty());
    }

    #[test]
    fn test_corrupt_file_is_replaced_on_merge() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cache.json");
        fs::write(&path, "{ not json").unwrap();

        assert!(EnrichmentStore::load_from_file(&path).is_err());

        let store = EnrichmentStore::open(&path);
        assert!(store.is_empty());
        store.merge(&ADDR, &record(Some("SN1"), None)).unwrap();

        let reloaded = EnrichmentStore::load_from_file(&path).unwrap();
        assert_eq!(reloaded.len(), 1);
    }

    #[test]
    fn test_merge_picks_up_external_writes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cache.json");
        let store = EnrichmentStore::open(&path);

        // Another process adds a device after this store was loaded
        let other = EnrichmentStore::open(&path);
        let other_addr = DeviceAddress::new([1, 2, 3, 4, 5, 6]);
        other.merge(&other_addr, &record(Some("SN2"), None)).unwrap();

        store.merge(&ADDR, &record(Some("SN1"), None)).unwrap();

        let reloaded = EnrichmentStore::load_from_file(&path).unwrap();
        assert_eq!(reloaded.len(), 2);
        assert_eq!(reloaded.get(&other_addr).unwrap().serial_number.as_deref(), Some("SN2"));
        assert!(store.contains(&other_addr));
    }

    #[test]
    fn test_failed_write_leaves_store_unchanged() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing_dir").join("cache.json");
        let store = EnrichmentStore::open(&path);

        assert!(store.merge(&ADDR, &record(Some("SN1"), None)).is_err());
        assert!(!store.contains(&ADDR));
        assert!(store.is_empty());
        assert!(!path.exists());
    }

    #[test]
    fn test_failed_write_keeps_previous_entry() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cache.json");
        let store = EnrichmentStore::open(&path);
        store.merge(&ADDR, &record(Some("SN1"), None)).unwrap();

        // Replace the file with a directory so the rename fails
        fs::remove_file(&path).unwrap();
        fs::create_dir(&path).unwrap();

        assert!(store.merge(&ADDR, &record(None, Some("1.2.0"))).is_err());
        let stored = store.get(&ADDR).unwrap();
        assert_eq!(stored.serial_number.as_deref(), Some("SN1"));
        assert!(stored.firmware_revision.is_none());
    }

    #[test]
    fn test_reads_file_written_by_manual_utility() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cache.json");
        fs::write(
            &path,
            r#"{"EA109060BC01": {
                "mac": "EA109060BC01",
                "serial_number": "2104123456",
                "hardware_revision": "B"
            }}"#,
        )
        .unwrap();

        let store = EnrichmentStore::open(&path);
        let stored = store.get(&ADDR).unwrap();
        assert_eq!(stored.serial_number.as_deref(), Some("2104123456"));
        assert_eq!(stored.hardware_revision.as_deref(), Some("B"));
        assert!(stored.software_revision.is_none());
    }
}
