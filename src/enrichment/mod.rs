//! # GATT Identity Enrichment
//!
//! Advertisements carry no serial number or firmware revision. These are
//! read once per device over a GATT connection from the Device Information
//! service and persisted in the [`crate::cache::EnrichmentStore`].

pub mod characteristic;
pub mod client;
pub mod fetcher;

#[cfg(feature = "ble")]
pub mod bluest_client;

pub use characteristic::{DeviceInfoCharacteristic, DEVICE_INFORMATION_SERVICE};
pub use client::{read_device_information, read_with_session, GattClient, GattSession, ReadReport};
pub use fetcher::{EnrichmentFetcher, EnrichmentState};

#[cfg(feature = "ble")]
pub use bluest_client::BluestClient;
