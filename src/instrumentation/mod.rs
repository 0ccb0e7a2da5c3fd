//! # Decoder Instrumentation
//!
//! Decode-outcome counters for monitoring a running parser.

pub mod stats;

pub use stats::{DecodeOutcome, DecodeStats, DecodeStatsExport, DeviceStatsExport};
