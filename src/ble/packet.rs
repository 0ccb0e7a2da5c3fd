//! Packet classification by the embedded 7-character type tag.

use crate::ble::frame::AdvertisementFrame;
use crate::constants::{TAG_INFO_PREFIX, TAG_LEN, TAG_OFFSET, TAG_STATUS, TAG_TELEMETRY};
use serde::{Deserialize, Serialize};

/// Closed set of Otodata packet kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PacketKind {
    /// `OTOTELE`: tank level and battery
    Telemetry,
    /// `OTOSTAT`: layout unknown, never decoded into readings
    Status,
    /// `OTO3xxx`: device identity (model code)
    Info,
    /// Anything else, including empty or undecodable tags
    Unrecognized,
}

/// Result of classifying a frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub kind: PacketKind,
    pub tag: String,
}

impl PacketKind {
    /// Map a decoded tag to its packet kind.
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            TAG_TELEMETRY => Self::Telemetry,
            TAG_STATUS => Self::Status,
            t if t.starts_with(TAG_INFO_PREFIX) => Self::Info,
            _ => Self::Unrecognized,
        }
    }

    /// Classify a frame. Never fails; anything unexpected is `Unrecognized`.
    pub fn classify(frame: &AdvertisementFrame<'_>) -> Classification {
        let tag = frame
            .data()
            .get(TAG_OFFSET..TAG_OFFSET + TAG_LEN)
            .map(decode_tag)
            .unwrap_or_default();

        Classification {
            kind: Self::from_tag(&tag),
            tag,
        }
    }
}

/// Decode tag bytes as ASCII, skipping non-ASCII bytes, trailing whitespace trimmed.
pub fn decode_tag(raw: &[u8]) -> String {
    let tag: String = raw
        .iter()
        .filter(|b| b.is_ascii())
        .map(|&b| char::from(b))
        .collect();
    tag.trim_end().to_string()
}
