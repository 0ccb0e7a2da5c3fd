//! `OTO3xxx` device identity packets

use super::{malformed, FieldDecoder};
use crate::ble::frame::AdvertisementFrame;
use crate::ble::packet::PacketKind;
use crate::constants::{INFO_MODEL_CODE_OFFSET, PRODUCT_PREFIX};
use crate::error::OtodataError;
use crate::util::logging::log_frame_hex;
use serde::{Deserialize, Serialize};

/// Product and model learned from an Info packet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceAttributes {
    pub product: String,
    pub model: String,
}

impl DeviceAttributes {
    pub fn from_model_code(code: u16) -> Self {
        let model = code.to_string();
        Self {
            product: format!("{PRODUCT_PREFIX}{model}"),
            model,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct InfoDecoder;

impl FieldDecoder for InfoDecoder {
    type Output = DeviceAttributes;

    const KIND: PacketKind = PacketKind::Info;
    const REQUIRED_LEN: usize = INFO_MODEL_CODE_OFFSET + 2;

    fn decode_fields(
        &self,
        frame: &AdvertisementFrame<'_>,
    ) -> Result<DeviceAttributes, OtodataError> {
        log_frame_hex("OTO3xxx (device info) packet", frame.data());

        let code = frame
            .le_u16_at(INFO_MODEL_CODE_OFFSET)
            .ok_or_else(|| malformed(Self::KIND, frame, Self::REQUIRED_LEN))?;
        Ok(DeviceAttributes::from_model_code(code))
    }
}
