//! Property checks over arbitrary frame contents

use otodata_rs::{DecoderConfig, DeviceAddress, OtodataParser};
use proptest::prelude::*;

const ADDR: DeviceAddress = DeviceAddress::new([0xEA, 0x10, 0x90, 0x60, 0xBC, 0x01]);

fn with_tag(tag: &[u8], mut body: Vec<u8>) -> Vec<u8> {
    let mut data = vec![0x1b, 0xff, 0xb1, 0x03];
    data.extend_from_slice(tag);
    data.append(&mut body);
    data
}

proptest! {
    #[test]
    fn prop_short_frames_yield_nothing(data in proptest::collection::vec(any::<u8>(), 0..18)) {
        let parser = OtodataParser::in_memory(DecoderConfig::default());
        prop_assert!(parser.parse(&data, &ADDR).is_none());
    }

    #[test]
    fn prop_status_frames_yield_nothing(body in proptest::collection::vec(any::<u8>(), 7..40)) {
        let parser = OtodataParser::in_memory(DecoderConfig::default());
        prop_assert!(parser.parse(&with_tag(b"OTOSTAT", body), &ADDR).is_none());
    }

    #[test]
    fn prop_telemetry_is_complement(
        depleted in any::<u8>(),
        empty in any::<u8>(),
        tail in proptest::collection::vec(any::<u8>(), 4..20),
    ) {
        let mut body = vec![0x01, depleted, empty];
        body.extend(tail);
        let record = OtodataParser::in_memory(DecoderConfig::default())
            .parse(&with_tag(b"OTOTELE", body), &ADDR)
            .unwrap();
        prop_assert_eq!(record.tank_level, 100 - i16::from(empty));
        prop_assert_eq!(record.battery, 100 - i16::from(depleted));
    }

    #[test]
    fn prop_info_product_from_model_code(code in any::<u16>(), suffix in b'0'..=b'9') {
        let mut body = vec![0u8; 16];
        body[12..14].copy_from_slice(&code.to_le_bytes());
        let tag = [b'O', b'T', b'O', b'3', b'2', b'8', suffix];

        let parser = OtodataParser::in_memory(DecoderConfig::default());
        prop_assert!(parser.parse(&with_tag(&tag, body), &ADDR).is_none());
        let attrs = parser.attributes().get(&ADDR).unwrap();
        prop_assert_eq!(attrs.product, format!("MT4AD-TM{code}"));
        prop_assert_eq!(attrs.model, code.to_string());
    }

    #[test]
    fn prop_arbitrary_input_never_panics(data in proptest::collection::vec(any::<u8>(), 0..64)) {
        let parser = OtodataParser::in_memory(DecoderConfig::default());
        let _ = parser.parse(&data, &ADDR);
    }
}
