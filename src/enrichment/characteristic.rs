//! GATT Device Information service (0x180A) characteristics read during enrichment.

use uuid::Uuid;

/// Bluetooth Base UUID `00000000-0000-1000-8000-00805F9B34FB`
const BLUETOOTH_BASE_UUID: u128 = 0x0000_0000_0000_1000_8000_0080_5f9b_34fb;

/// Expand a 16-bit assigned number onto the Bluetooth Base UUID.
pub const fn bluetooth_uuid(assigned_number: u16) -> Uuid {
    Uuid::from_u128(BLUETOOTH_BASE_UUID | ((assigned_number as u128) << 96))
}

/// Device Information service
pub const DEVICE_INFORMATION_SERVICE: Uuid = bluetooth_uuid(0x180A);

/// Characteristics read from the Device Information service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceInfoCharacteristic {
    Manufacturer,
    ModelNumber,
    SerialNumber,
    HardwareRevision,
    FirmwareRevision,
    SoftwareRevision,
}

impl DeviceInfoCharacteristic {
    /// Every characteristic, in read order
    pub const ALL: [DeviceInfoCharacteristic; 6] = [
        Self::Manufacturer,
        Self::ModelNumber,
        Self::SerialNumber,
        Self::HardwareRevision,
        Self::FirmwareRevision,
        Self::SoftwareRevision,
    ];

    pub const fn assigned_number(self) -> u16 {
        match self {
            Self::Manufacturer => 0x2A29,
            Self::ModelNumber => 0x2A24,
            Self::SerialNumber => 0x2A25,
            Self::HardwareRevision => 0x2A27,
            Self::FirmwareRevision => 0x2A26,
            Self::SoftwareRevision => 0x2A28,
        }
    }

    pub const fn uuid(self) -> Uuid {
        bluetooth_uuid(self.assigned_number())
    }

    /// Field name in the persisted store
    pub const fn name(self) -> &'static str {
        match self {
            Self::Manufacturer => "manufacturer",
            Self::ModelNumber => "model",
            Self::SerialNumber => "serial_number",
            Self::HardwareRevision => "hardware_revision",
            Self::FirmwareRevision => "firmware_revision",
            Self::SoftwareRevision => "software_revision",
        }
    }
}

/// Decode a characteristic value: UTF-8 (lossy), trimmed. Empty means not read.
pub fn decode_string_value(raw: &[u8]) -> Option<String> {
    let value = String::from_utf8_lossy(raw);
    let value = value.trim_matches(|c: char| c.is_whitespace() || c == '\0');
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
