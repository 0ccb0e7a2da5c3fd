//! # Advertisement Frame
//!
//! An [`AdvertisementFrame`] borrows one manufacturer-specific AD structure as
//! delivered by the scanner, together with the advertiser's address:
//!
//! ```text
//! [0]      AD length
//! [1]      AD type (0xFF)
//! [2..4]   company id, little-endian (B1 03)
//! [4..11]  packet type tag, 7 ASCII chars (OTOTELE, OTOSTAT, OTO3xxx)
//! [11..]   packet data, layout depends on the tag
//! ```

use crate::ble::address::DeviceAddress;
use crate::constants::{AD_TYPE_MANUFACTURER_SPECIFIC, MIN_FRAME_LEN, TAG_LEN};
use crate::error::OtodataError;
use nom::{
    bytes::complete::take,
    number::complete::{le_u16, u8 as parse_u8},
    IResult,
};

/// Fixed leading fields of an Otodata frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader<'a> {
    pub ad_length: u8,
    pub ad_type: u8,
    pub company_id: u16,
    pub tag: &'a [u8],
}

/// Parse the AD header and raw tag bytes.
pub fn parse_header(input: &[u8]) -> IResult<&[u8], FrameHeader<'_>> {
    let (input, ad_length) = parse_u8(input)?;
    let (input, ad_type) = parse_u8(input)?;
    let (input, company_id) = le_u16(input)?;
    let (input, tag) = take(TAG_LEN)(input)?;

    Ok((
        input,
        FrameHeader {
            ad_length,
            ad_type,
            company_id,
            tag,
        },
    ))
}

/// One received frame. Borrowed for the duration of a single decode.
#[derive(Debug, Clone, Copy)]
pub struct AdvertisementFrame<'a> {
    data: &'a [u8],
    address: DeviceAddress,
}

impl<'a> AdvertisementFrame<'a> {
    pub fn new(data: &'a [u8], address: DeviceAddress) -> Self {
        Self { data, address }
    }

    /// Reject frames below the minimum length before any field access.
    pub fn validate(&self) -> Result<(), OtodataError> {
        if self.data.len() < MIN_FRAME_LEN {
            return Err(OtodataError::TooShort {
                len: self.data.len(),
                min: MIN_FRAME_LEN,
            });
        }
        Ok(())
    }

    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn address(&self) -> &DeviceAddress {
        &self.address
    }

    pub fn header(&self) -> Option<FrameHeader<'a>> {
        parse_header(self.data).ok().map(|(_, header)| header)
    }

    pub fn byte_at(&self, offset: usize) -> Option<u8> {
        self.data.get(offset).copied()
    }

    pub fn le_u16_at(&self, offset: usize) -> Option<u16> {
        let bytes = self.data.get(offset..offset + 2)?;
        Some(u16::from_le_bytes([bytes[0], bytes[1]]))
    }
}

/// Rebuild the full AD structure from a `(company_id, payload)` pair.
///
/// Scanners such as BlueZ strip the length, type and company id and hand out
/// the remaining manufacturer payload; the decoder offsets assume they are present.
pub fn build_ad_structure(company_id: u16, payload: &[u8]) -> Vec<u8> {
    let ad_length = u8::try_from(payload.len() + 3).unwrap_or(u8::MAX);
    let mut frame = Vec::with_capacity(payload.len() + 4);
    frame.push(ad_length);
    frame.push(AD_TYPE_MANUFACTURER_SPECIFIC);
    frame.extend_from_slice(&company_id.to_le_bytes());
    frame.extend_from_slice(payload);
    frame
}
