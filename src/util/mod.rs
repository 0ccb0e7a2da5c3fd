//! # Utility Modules
//!
//! Hex encoding/decoding and diagnostic logging helpers shared across the crate.

pub mod hex;
pub mod logging;

pub use self::hex::{
    decode_hex, encode_hex, encode_hex_upper, format_hex_compact, parse_hex_lenient, HexError,
};
pub use self::logging::{log_frame_hex, ReportOnce};
