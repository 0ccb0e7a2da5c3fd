//! # Hex Encoding/Decoding Utilities
//!
//! Hex helpers used for address normalization, diagnostic frame dumps and
//! parsing captured frames given on the command line.
//!
//! ## Usage
//!
//! ```rust
//! use otodata_rs::util::hex::{encode_hex, decode_hex, format_hex_compact};
//!
//! let data = [0x1a, 0xff, 0xb1, 0x03];
//! assert_eq!(encode_hex(&data), "1affb103");
//! assert_eq!(decode_hex("1a ff b1 03").unwrap(), data);
//! assert_eq!(format_hex_compact(&data), "1a ff b1 03");
//! ```

use thiserror::Error;

/// Errors that can occur during hex operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HexError {
    #[error("Odd number of hex characters: {0}")]
    OddLength(usize),

    #[error("Empty hex string")]
    EmptyString,

    #[error("Hex decoding error: {0}")]
    DecodeError(String),
}

/// Encode bytes to lowercase hex string
pub fn encode_hex(data: &[u8]) -> String {
    hex::encode(data)
}

/// Encode bytes to uppercase hex string
pub fn encode_hex_upper(data: &[u8]) -> String {
    hex::encode_upper(data)
}

/// Decode hex string to bytes
///
/// Accepts both uppercase and lowercase hex characters.
/// Whitespace is automatically stripped.
pub fn decode_hex(hex_str: &str) -> Result<Vec<u8>, HexError> {
    let cleaned: String = hex_str.chars().filter(|c| !c.is_whitespace()).collect();

    if cleaned.is_empty() {
        return Err(HexError::EmptyString);
    }

    if cleaned.len() % 2 != 0 {
        return Err(HexError::OddLength(cleaned.len()));
    }

    hex::decode(&cleaned).map_err(|e| HexError::DecodeError(e.to_string()))
}

/// Format hex data for compact display (useful for logs)
///
/// Formats data as "1a ff b1 03" with spaces between bytes.
pub fn format_hex_compact(data: &[u8]) -> String {
    data.iter()
        .map(|b| format!("{b:02x}"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Parse hex string that may contain separators or a `0x` prefix
///
/// More lenient than decode_hex, strips all non-hex characters.
pub fn parse_hex_lenient(input: &str) -> Result<Vec<u8>, HexError> {
    let input = input.trim();
    let input = input
        .strip_prefix("0x")
        .or_else(|| input.strip_prefix("0X"))
        .unwrap_or(input);
    let hex_chars: String = input.chars().filter(|c| c.is_ascii_hexdigit()).collect();

    decode_hex(&hex_chars)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_case() {
        let data = vec![0xAB, 0xCD, 0xEF];
        assert_eq!(encode_hex(&data), "abcdef");
        assert_eq!(encode_hex_upper(&data), "ABCDEF");
    }

    #[test]
    fn test_decode_with_whitespace() {
        assert_eq!(decode_hex("1a ff b1 03").unwrap(), vec![0x1a, 0xff, 0xb1, 0x03]);
    }

    #[test]
    fn test_parse_lenient() {
        let expected = vec![0x1a, 0xff, 0xb1, 0x03];
        assert_eq!(parse_hex_lenient("1a:ff-b1 03").unwrap(), expected);
        assert_eq!(parse_hex_lenient("0x1affb103").unwrap(), expected);
    }

    #[test]
    fn test_errors() {
        assert_eq!(decode_hex(""), Err(HexError::EmptyString));
        assert_eq!(decode_hex("1"), Err(HexError::OddLength(1)));
        assert!(matches!(decode_hex("GG"), Err(HexError::DecodeError(_))));
        assert_eq!(parse_hex_lenient("::"), Err(HexError::EmptyString));
    }
}
