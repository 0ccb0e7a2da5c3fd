#![no_main]

use libfuzzer_sys::fuzz_target;
use otodata_rs::ble::{build_ad_structure, decode_packet, AdvertisementFrame};
use otodata_rs::constants::OTODATA_COMPANY_ID;
use otodata_rs::{DecoderConfig, DeviceAddress, OtodataParser};

const ADDR: DeviceAddress = DeviceAddress::new([0xEA, 0x10, 0x90, 0x60, 0xBC, 0x01]);

fuzz_target!(|data: &[u8]| {
    let _ = decode_packet(&AdvertisementFrame::new(data, ADDR));

    // Force each known tag onto the input so field decoders see it too
    for tag in [b"OTOTELE", b"OTOSTAT", b"OTO3281"] {
        let mut payload = tag.to_vec();
        payload.extend_from_slice(data);
        let frame = build_ad_structure(OTODATA_COMPANY_ID, &payload);
        let _ = decode_packet(&AdvertisementFrame::new(&frame, ADDR));
    }

    let parser = OtodataParser::in_memory(DecoderConfig::default());
    let _ = parser.parse(data, &ADDR);
});
