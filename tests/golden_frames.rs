use otodata_rs::ble::{decode_packet, AdvertisementFrame, DecodedPacket, PacketKind};
use otodata_rs::util::hex::decode_hex;
use otodata_rs::{DecoderConfig, DeviceAddress, OtodataParser};

const ADDRESS: &str = "EA:10:90:60:BC:01";

// Captured from an MT4AD-TM5040 (device info, 27 bytes)
const INFO_HEX: &str = "1affb1034f544f333238319060bc011018210384060304b0130205";

// Captured status prefix, padded to a full advertisement
const STATUS_HEX: &str = "1bffb1034f544f53544154017c057c05000000000000000000000000";

// Telemetry: 10% depleted battery, 28% empty tank
const TELEMETRY_HEX: &str = "1bffb1034f544f54454c45010a1c0000000000000000000000000000";

fn address() -> DeviceAddress {
    ADDRESS.parse().unwrap()
}

#[test]
fn test_captured_info_frame() {
    let data = decode_hex(INFO_HEX).unwrap();
    assert_eq!(data.len(), 27);

    let frame = AdvertisementFrame::new(&data, address());
    let header = frame.header().unwrap();
    assert_eq!(header.ad_type, 0xff);
    assert_eq!(header.company_id, 0x03b1);
    assert_eq!(header.tag, b"OTO3281");

    match decode_packet(&frame) {
        Ok(DecodedPacket::Info(attrs)) => {
            assert_eq!(attrs.product, "MT4AD-TM5040");
            assert_eq!(attrs.model, "5040");
        }
        other => panic!("Unexpected decode result: {:?}", other),
    }
}

#[test]
fn test_captured_status_frame() {
    let data = decode_hex(STATUS_HEX).unwrap();
    let frame = AdvertisementFrame::new(&data, address());
    assert_eq!(PacketKind::classify(&frame).kind, PacketKind::Status);

    match decode_packet(&frame) {
        Ok(DecodedPacket::Status(values)) => {
            assert_eq!(values.value_a, Some(1404));
            assert_eq!(values.value_b, Some(1404));
        }
        other => panic!("Unexpected decode result: {:?}", other),
    }
}

#[test]
fn test_telemetry_frame() {
    let data = decode_hex(TELEMETRY_HEX).unwrap();
    let frame = AdvertisementFrame::new(&data, address());

    match decode_packet(&frame) {
        Ok(DecodedPacket::Telemetry(reading)) => {
            assert_eq!(reading.tank_level, 72);
            assert_eq!(reading.battery, 90);
        }
        other => panic!("Unexpected decode result: {:?}", other),
    }
}

#[test]
fn test_capture_sequence_json() {
    let parser = OtodataParser::in_memory(DecoderConfig::default());
    let mac = address();

    for hex in [STATUS_HEX, INFO_HEX] {
        assert!(parser.parse(&decode_hex(hex).unwrap(), &mac).is_none());
    }
    let record = parser.parse(&decode_hex(TELEMETRY_HEX).unwrap(), &mac).unwrap();

    let json = serde_json::to_value(&record).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "firmware": "Otodata",
            "tank_level": 72,
            "battery": 90,
            "mac": "EA109060BC01",
            "type": "Propane Tank Monitor",
            "packet": "no packet id",
            "data": true,
            "product": "MT4AD-TM5040",
            "model": "5040"
        })
    );
}

#[test]
fn test_truncated_info_frame_is_malformed() {
    let data = decode_hex(INFO_HEX).unwrap();
    let frame = AdvertisementFrame::new(&data[..24], address());
    assert!(decode_packet(&frame).is_err());
    assert!(OtodataParser::in_memory(DecoderConfig::default())
        .parse(&data[..24], &address())
        .is_none());
}
