//! Decoder configuration.
//!
//! Every field has a default, so a JSON config file only needs the keys it
//! changes:
//!
//! ```json
//! { "report_unknown": true, "enrichment_timeout_secs": 15 }
//! ```

use crate::constants::{DEFAULT_ENRICHMENT_TIMEOUT_SECS, DEFAULT_STORE_FILE};
use crate::error::OtodataError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecoderConfig {
    /// Log undersized frames, once per device
    pub report_unknown: bool,
    /// Location of the persisted enrichment store
    pub store_path: PathBuf,
    /// Bound for one background GATT read
    pub enrichment_timeout_secs: u64,
    /// Schedule GATT reads when Info packets arrive
    pub auto_enrich: bool,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            report_unknown: false,
            store_path: PathBuf::from(DEFAULT_STORE_FILE),
            enrichment_timeout_secs: DEFAULT_ENRICHMENT_TIMEOUT_SECS,
            auto_enrich: true,
        }
    }
}

impl DecoderConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, OtodataError> {
        let json = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    pub fn enrichment_timeout(&self) -> Duration {
        Duration::from_secs(self.enrichment_timeout_secs)
    }
}
