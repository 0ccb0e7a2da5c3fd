//! # Diagnostic Logging Utilities
//!
//! Keyed report de-duplication and bounded hex dumps for advertisement
//! diagnostics.
//!
//! ## Usage
//!
//! ```rust
//! use otodata_rs::util::logging::{ReportOnce, log_frame_hex};
//!
//! let reports = ReportOnce::new();
//! if reports.first("EA109060BC01") {
//!     log::info!("first frame from this device");
//! }
//! assert!(!reports.first("EA109060BC01"));
//!
//! log_frame_hex("Received frame", &[0x1a, 0xff, 0xb1, 0x03]);
//! ```

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

/// Admits one report per key for the lifetime of the instance.
///
/// Scanners deliver the same advertisement many times per minute, so
/// per-device diagnostics would otherwise flood the log.
#[derive(Debug, Default)]
pub struct ReportOnce {
    seen: Mutex<HashSet<String>>,
}

impl ReportOnce {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` the first time `key` is seen, `false` afterwards.
    pub fn first(&self, key: &str) -> bool {
        let mut seen = self.seen.lock().unwrap_or_else(PoisonError::into_inner);
        seen.insert(key.to_string())
    }

    /// Number of distinct keys reported so far
    pub fn len(&self) -> usize {
        self.seen.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Log frame data in hex format for debugging
///
/// Output is limited to the first 64 bytes.
pub fn log_frame_hex(prefix: &str, data: &[u8]) {
    const MAX_LOG_BYTES: usize = 64;

    if !log::log_enabled!(log::Level::Debug) {
        return;
    }

    let display_data = &data[..data.len().min(MAX_LOG_BYTES)];
    let hex_str = crate::util::hex::format_hex_compact(display_data);
    let suffix = if data.len() > MAX_LOG_BYTES {
        format!(" ... ({} bytes total)", data.len())
    } else {
        String::new()
    };

    log::debug!("{prefix}: {hex_str}{suffix}");
}
