//! # Device Attribute Cache
//!
//! Process-lifetime map from normalized device address to the product/model
//! learned from that device's Info packets. Telemetry packets carry no identity
//! of their own, so the result assembler looks the device up here.
//!
//! Entries are never evicted; an Info packet for a known device overwrites its
//! entry. The cache is thread-safe and is shared behind an `Arc`.
//!
//! ## Usage
//!
//! ```rust
//! use otodata_rs::ble::{DeviceAddress, DeviceAttributes};
//! use otodata_rs::cache::DeviceAttributeCache;
//!
//! let cache = DeviceAttributeCache::new();
//! let addr = DeviceAddress::new([0xEA, 0x10, 0x90, 0x60, 0xBC, 0x01]);
//!
//! cache.insert(&addr, DeviceAttributes::from_model_code(5040));
//! assert_eq!(cache.get(&addr).unwrap().product, "MT4AD-TM5040");
//! ```

use crate::ble::{DeviceAddress, DeviceAttributes};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Thread-safe attribute cache keyed by normalized address
#[derive(Debug, Default)]
pub struct DeviceAttributeCache {
    inner: Mutex<CacheInner>,
}

#[derive(Debug, Default)]
struct CacheInner {
    devices: HashMap<String, DeviceAttributes>,
    stats: CacheStats,
}

/// Statistics for cache monitoring
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    /// Total insertions
    pub insertions: u64,
    /// Total lookups
    pub lookups: u64,
    /// Cache hits
    pub hits: u64,
    /// Cache misses
    pub misses: u64,
}

impl DeviceAttributeCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, CacheInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Insert or overwrite the attributes for a device
    ///
    /// Returns the previous entry, if any.
    pub fn insert(
        &self,
        address: &DeviceAddress,
        attributes: DeviceAttributes,
    ) -> Option<DeviceAttributes> {
        let mut inner = self.lock();
        inner.stats.insertions += 1;
        inner.devices.insert(address.normalized(), attributes)
    }

    /// Retrieve the attributes for a device
    pub fn get(&self, address: &DeviceAddress) -> Option<DeviceAttributes> {
        let mut inner = self.lock();
        inner.stats.lookups += 1;

        let found = inner.devices.get(&address.normalized()).cloned();
        if found.is_some() {
            inner.stats.hits += 1;
        } else {
            inner.stats.misses += 1;
        }
        found
    }

    /// Get current cache size
    pub fn len(&self) -> usize {
        self.lock().devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        self.lock().stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    const ADDR: DeviceAddress = DeviceAddress::new([0xEA, 0x10, 0x90, 0x60, 0xBC, 0x01]);

    #[test]
    fn test_cache_basic_operations() {
        let cache = DeviceAttributeCache::new();
        assert!(cache.is_empty());

        assert!(cache.insert(&ADDR, DeviceAttributes::from_model_code(5040)).is_none());
        assert_eq!(cache.len(), 1);

        let attrs = cache.get(&ADDR).unwrap();
        assert_eq!(attrs.model, "5040");
        assert!(cache.get(&DeviceAddress::new([0; 6])).is_none());

        let stats = cache.stats();
        assert_eq!(stats.insertions, 1);
        assert_eq!(stats.lookups, 2);
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
    }

    #[test]
    fn test_info_overwrites_previous_entry() {
        let cache = DeviceAttributeCache::new();
        cache.insert(&ADDR, DeviceAttributes::from_model_code(5040));

        let previous = cache.insert(&ADDR, DeviceAttributes::from_model_code(5041));
        assert_eq!(previous.unwrap().model, "5040");
        assert_eq!(cache.get(&ADDR).unwrap().product, "MT4AD-TM5041");
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_concurrent_inserts() {
        let cache = Arc::new(DeviceAttributeCache::new());

        let handles: Vec<_> = (0..8u8)
            .map(|i| {
                let cache = Arc::clone(&cache);
                thread::spawn(move || {
                    let addr = DeviceAddress::new([0, 0, 0, 0, 0, i]);
                    cache.insert(&addr, DeviceAttributes::from_model_code(5000 + u16::from(i)));
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(cache.len(), 8);
        assert_eq!(cache.stats().insertions, 8);
    }
}
