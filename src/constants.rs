//! Otodata Advertisement Constants
//!
//! Byte offsets and labels for the Otodata manufacturer-specific data layout.
//! The offsets follow the most recently captured frames (tag at bytes 4..11,
//! sensor data from byte 11 on).

/// Bluetooth company identifier for Otodata (little-endian on the wire as `B1 03`)
pub const OTODATA_COMPANY_ID: u16 = 0x03B1;

/// AD type for manufacturer-specific data
pub const AD_TYPE_MANUFACTURER_SPECIFIC: u8 = 0xFF;

/// Minimum length of any Otodata frame
pub const MIN_FRAME_LEN: usize = 18;

/// Offset of the company identifier
pub const COMPANY_ID_OFFSET: usize = 2;

/// Offset and width of the ASCII packet type tag
pub const TAG_OFFSET: usize = 4;
pub const TAG_LEN: usize = 7;

/// Tag literals
pub const TAG_TELEMETRY: &str = "OTOTELE";
pub const TAG_STATUS: &str = "OTOSTAT";
pub const TAG_INFO_PREFIX: &str = "OTO3";

// Telemetry packet
pub const TELE_DEPLETED_BATTERY_OFFSET: usize = 12;
pub const TELE_EMPTY_TANK_OFFSET: usize = 13;

// Status packet (layout unknown, observational only)
pub const STAT_VALUE_A_OFFSET: usize = 12;
pub const STAT_VALUE_B_OFFSET: usize = 14;

// Info packet
pub const INFO_MODEL_CODE_OFFSET: usize = 23;

/// Product prefix; the model code is appended
pub const PRODUCT_PREFIX: &str = "MT4AD-TM";

/// Fixed record labels
pub const FIRMWARE_LABEL: &str = "Otodata";
pub const DEVICE_TYPE_LABEL: &str = "Propane Tank Monitor";
pub const PACKET_MARKER: &str = "no packet id";

/// Default location of the persisted enrichment store
pub const DEFAULT_STORE_FILE: &str = "otodata_device_cache.json";

/// Default bound for one enrichment connection, in seconds
pub const DEFAULT_ENRICHMENT_TIMEOUT_SECS: u64 = 10;
