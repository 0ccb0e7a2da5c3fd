//! Final telemetry record and the assembler that builds it from a reading plus
//! whatever the caches know about the device.

use crate::ble::{DeviceAddress, TelemetryReading};
use crate::cache::{DeviceAttributeCache, EnrichmentStore};
use crate::constants::{DEVICE_TYPE_LABEL, FIRMWARE_LABEL, PACKET_MARKER};
use serde::{Deserialize, Serialize};

/// One decoded telemetry record.
///
/// Identity fields are present only when the corresponding cache knew the
/// device at decode time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtodataRecord {
    pub firmware: String,
    pub tank_level: i16,
    pub battery: i16,
    pub mac: String,
    #[serde(rename = "type")]
    pub device_type: String,
    pub packet: String,
    pub data: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hardware_revision: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub firmware_revision: Option<String>,
}

/// Merges a reading with cached attributes and enrichment
#[derive(Debug, Clone, Copy)]
pub struct ResultAssembler<'a> {
    attributes: &'a DeviceAttributeCache,
    store: &'a EnrichmentStore,
}

impl<'a> ResultAssembler<'a> {
    pub fn new(attributes: &'a DeviceAttributeCache, store: &'a EnrichmentStore) -> Self {
        Self { attributes, store }
    }

    pub fn assemble(&self, reading: TelemetryReading, address: &DeviceAddress) -> OtodataRecord {
        let mut record = OtodataRecord {
            firmware: FIRMWARE_LABEL.to_string(),
            tank_level: reading.tank_level,
            battery: reading.battery,
            mac: address.normalized(),
            device_type: DEVICE_TYPE_LABEL.to_string(),
            packet: PACKET_MARKER.to_string(),
            data: true,
            product: None,
            model: None,
            serial_number: None,
            hardware_revision: None,
            firmware_revision: None,
        };

        if let Some(attrs) = self.attributes.get(address) {
            record.product = Some(attrs.product);
            record.model = Some(attrs.model);
        }

        if let Some(extra) = self.store.get(address) {
            record.serial_number = extra.serial_number;
            record.hardware_revision = extra.hardware_revision;
            record.firmware_revision = extra.firmware_revision;
        }

        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ble::DeviceAttributes;
    use crate::cache::EnrichmentRecord;

    const ADDR: DeviceAddress = DeviceAddress::new([0xEA, 0x10, 0x90, 0x60, 0xBC, 0x01]);

    #[test]
    fn test_bare_record() {
        let attributes = DeviceAttributeCache::new();
        let store = EnrichmentStore::in_memory();
        let record = ResultAssembler::new(&attributes, &store)
            .assemble(TelemetryReading::from_raw(28, 10), &ADDR);

        assert_eq!(record.firmware, "Otodata");
        assert_eq!(record.tank_level, 72);
        assert_eq!(record.battery, 90);
        assert_eq!(record.mac, "EA109060BC01");
        assert_eq!(record.device_type, "Propane Tank Monitor");
        assert_eq!(record.packet, "no packet id");
        assert!(record.data);
        assert!(record.product.is_none());
        assert!(record.serial_number.is_none());
    }

    #[test]
    fn test_caches_merged_independently() {
        let attributes = DeviceAttributeCache::new();
        let store = EnrichmentStore::in_memory();
        store
            .merge(
                &ADDR,
                &EnrichmentRecord {
                    serial_number: Some("2104123456".to_string()),
                    manufacturer: Some("Otodata".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();

        let assembler = ResultAssembler::new(&attributes, &store);
        let record = assembler.assemble(TelemetryReading::from_raw(50, 0), &ADDR);
        assert!(record.model.is_none());
        assert_eq!(record.serial_number.as_deref(), Some("2104123456"));
        assert!(record.firmware_revision.is_none());

        attributes.insert(&ADDR, DeviceAttributes::from_model_code(5040));
        let record = assembler.assemble(TelemetryReading::from_raw(50, 0), &ADDR);
        assert_eq!(record.product.as_deref(), Some("MT4AD-TM5040"));
        assert_eq!(record.model.as_deref(), Some("5040"));
    }

    #[test]
    fn test_serialized_keys() {
        let attributes = DeviceAttributeCache::new();
        let store = EnrichmentStore::in_memory();
        let record = ResultAssembler::new(&attributes, &store)
            .assemble(TelemetryReading::from_raw(29, 0), &ADDR);

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["type"], "Propane Tank Monitor");
        assert_eq!(json["tank_level"], 71);
        assert!(json.get("product").is_none());
    }
}
