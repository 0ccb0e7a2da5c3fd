//! # Otodata Error Handling
//!
//! This module defines the OtodataError enum, which represents the different error
//! types that can occur while decoding advertisements or enriching device data.
//!
//! None of these errors escape [`crate::parser::OtodataParser::parse`]; the parser
//! absorbs them and at most drops a single frame or enrichment attempt.

use crate::ble::packet::PacketKind;
use thiserror::Error;

/// Represents the different error types that can occur in the Otodata crate.
#[derive(Debug, Error)]
pub enum OtodataError {
    /// The frame is shorter than the minimum advertisement length.
    #[error("Frame too short: {len} bytes (minimum {min})")]
    TooShort { len: usize, min: usize },

    /// The type tag does not match any known packet kind.
    #[error("Unrecognized packet type: '{0}'")]
    Unrecognized(String),

    /// A recognized packet is too short to reach its required fields.
    #[error("Malformed {kind:?} packet: {len} bytes, need {needed}")]
    MalformedField {
        kind: PacketKind,
        len: usize,
        needed: usize,
    },

    /// The connection-based identity read failed or timed out.
    #[error("Enrichment unavailable: {0}")]
    EnrichmentUnavailable(String),

    /// A device address string could not be parsed.
    #[error("Invalid device address: {0}")]
    InvalidAddress(String),

    /// Indicates an I/O error on the persisted store.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Indicates a (de)serialization error on the persisted store or config.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
