//! Property tests for the primary header accessors and the frame encoder.

use bytes::BytesMut;
use proptest::prelude::*;

use cmdlink_tctf::{
    decode_frame, encode_frame, get_bypass_flag, get_ctl_cmd_flag, get_length, get_seq_num,
    get_spacecraft_id, get_vc_id, get_version, ChannelService, FrameHeader, SequenceFlags,
    ServiceKind, TransferFrame, MAX_FRAME_LENGTH, PRIHDR_SIZE,
};

fn max_frame(header: [u8; 5]) -> Vec<u8> {
    let mut bytes = vec![0u8; MAX_FRAME_LENGTH];
    bytes[..5].copy_from_slice(&header);
    bytes
}

proptest! {
    #[test]
    fn octet0_fields(octet0 in any::<u8>()) {
        // length field forced to 1023 so any header octets parse
        let bytes = max_frame([octet0, 0, 0x03, 0xFF, 0]);
        let tf = TransferFrame::new(&bytes).unwrap();

        prop_assert_eq!(get_version(Some(&tf)), octet0 >> 6);
        prop_assert_eq!(get_bypass_flag(Some(&tf)), octet0 & 0x20 != 0);
        prop_assert_eq!(get_ctl_cmd_flag(Some(&tf)), octet0 & 0x10 != 0);
        prop_assert_eq!(get_spacecraft_id(Some(&tf)) >> 8, u16::from(octet0 & 0x03));
    }

    #[test]
    fn octet1_is_spacecraft_id_low(octet1 in any::<u8>()) {
        let bytes = max_frame([0, octet1, 0x03, 0xFF, 0]);
        let tf = TransferFrame::new(&bytes).unwrap();
        prop_assert_eq!(get_spacecraft_id(Some(&tf)), u16::from(octet1));
    }

    #[test]
    fn octet2_is_vc_id(octet2 in any::<u8>()) {
        let bytes = max_frame([0, 0, octet2 | 0x03, 0xFF, 0]);
        let tf = TransferFrame::new(&bytes).unwrap();
        prop_assert_eq!(get_vc_id(Some(&tf)), octet2 >> 2);
    }

    #[test]
    fn length_is_field_plus_one(field in 0u16..1024) {
        let header = [0, 0, (field >> 8) as u8, (field & 0xFF) as u8, 0];
        let bytes = max_frame(header);
        let tf = TransferFrame::new(&bytes).unwrap();
        prop_assert_eq!(get_length(Some(&tf)), field + 1);
        prop_assert_eq!(tf.as_bytes().len(), usize::from(field) + 1);
    }

    #[test]
    fn octet4_is_sequence_number(seq in any::<u8>()) {
        let bytes = max_frame([0, 0, 0x03, 0xFF, seq]);
        let tf = TransferFrame::new(&bytes).unwrap();
        prop_assert_eq!(get_seq_num(Some(&tf)), seq);
    }

    #[test]
    fn encoded_header_reads_back(
        scid in 0u16..1024,
        vcid in 0u8..64,
        seq in any::<u8>(),
        map_id in 0u8..64,
        flags in 0u8..4,
        payload in proptest::collection::vec(any::<u8>(), 0..(MAX_FRAME_LENGTH - PRIHDR_SIZE)),
    ) {
        let header = FrameHeader::ad(scid, vcid, seq)
            .with_segment(SequenceFlags::from_bits(flags), map_id);
        let mut buf = BytesMut::new();
        encode_frame(&header, &payload, &mut buf).unwrap();
        let wire = decode_frame(&mut buf).unwrap().unwrap();

        let tf = TransferFrame::new(&wire).unwrap();
        prop_assert_eq!(FrameHeader::from_frame(&tf, true), header);

        let service = ChannelService::new(ServiceKind::MapPacket, scid, vcid).with_map_id(map_id);
        prop_assert!(tf.is_valid(&service));
        prop_assert_eq!(tf.payload(&service), payload.as_slice());
    }
}

#[test]
fn length_bounds() {
    let min = [0u8, 0, 0, 0, 0];
    let tf = TransferFrame::new(&min).unwrap();
    assert_eq!(tf.length(), 5);

    let max = max_frame([0, 0, 0x03, 0xFF, 0]);
    let tf = TransferFrame::new(&max).unwrap();
    assert_eq!(tf.length(), 1024);
}
