//! Per-device caches: attributes learned from Info packets (process lifetime)
//! and identity fields from GATT enrichment (persisted).
//!
//! The two caches are independent; a device may appear in either, both or neither.

pub mod attributes;
pub mod enrichment_store;

pub use attributes::{CacheStats, DeviceAttributeCache};
pub use enrichment_store::{EnrichmentRecord, EnrichmentStore};
