use bytes::{BufMut, Bytes, BytesMut};

use crate::error::{Result, TctfError};
use crate::frame::{declared_length, SequenceFlags, TransferFrame, MAX_FRAME_LENGTH, PRIHDR_SIZE};

const MAX_SPACECRAFT_ID: u16 = 0x3FF;
const MAX_VC_ID: u8 = 0x3F;
const MAX_MAP_ID: u8 = 0x3F;
const MAX_VERSION: u8 = 0x03;

/// Segment header fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentHeader {
    /// Sequence flags.
    pub flags: SequenceFlags,
    /// MAP id (0..=63).
    pub map_id: u8,
}

/// Header fields of a frame to be encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameHeader {
    /// Transfer frame version number (0..=3).
    pub version: u8,
    /// Bypass flag.
    pub bypass: bool,
    /// Control command flag.
    pub control_command: bool,
    /// Spacecraft id (0..=1023).
    pub spacecraft_id: u16,
    /// Virtual channel id (0..=63).
    pub vc_id: u8,
    /// Frame sequence number N(S).
    pub seq_num: u8,
    /// Segment header, written right after the primary header.
    pub segment: Option<SegmentHeader>,
}

impl FrameHeader {
    /// Sequence-controlled data frame header.
    pub fn ad(spacecraft_id: u16, vc_id: u8, seq_num: u8) -> Self {
        Self {
            spacecraft_id,
            vc_id,
            seq_num,
            ..Self::default()
        }
    }

    /// Bypass data frame header.
    pub fn bd(spacecraft_id: u16, vc_id: u8) -> Self {
        Self {
            bypass: true,
            spacecraft_id,
            vc_id,
            ..Self::default()
        }
    }

    /// Bypass control command frame header.
    pub fn bc(spacecraft_id: u16, vc_id: u8) -> Self {
        Self {
            bypass: true,
            control_command: true,
            spacecraft_id,
            vc_id,
            ..Self::default()
        }
    }

    /// Attach a segment header.
    pub fn with_segment(mut self, flags: SequenceFlags, map_id: u8) -> Self {
        self.segment = Some(SegmentHeader { flags, map_id });
        self
    }

    /// Read the header fields back out of a received frame.
    ///
    /// `segmented` says whether the channel carries a segment header.
    pub fn from_frame(tf: &TransferFrame<'_>, segmented: bool) -> Self {
        let segment = if segmented {
            tf.seg_hdr_map_id()
                .zip(tf.sequence_flags())
                .map(|(map_id, flags)| SegmentHeader { flags, map_id })
        } else {
            None
        };
        Self {
            version: tf.version(),
            bypass: tf.bypass_flag(),
            control_command: tf.ctl_cmd_flag(),
            spacecraft_id: tf.spacecraft_id(),
            vc_id: tf.vc_id(),
            seq_num: tf.seq_num(),
            segment,
        }
    }

    /// Encoded size of the headers.
    pub fn header_size(&self) -> usize {
        PRIHDR_SIZE + usize::from(self.segment.is_some())
    }

    fn validate(&self) -> Result<()> {
        check_range("version", u32::from(self.version), u32::from(MAX_VERSION))?;
        check_range(
            "spacecraft id",
            u32::from(self.spacecraft_id),
            u32::from(MAX_SPACECRAFT_ID),
        )?;
        check_range("virtual channel id", u32::from(self.vc_id), u32::from(MAX_VC_ID))?;
        if let Some(segment) = self.segment {
            check_range("MAP id", u32::from(segment.map_id), u32::from(MAX_MAP_ID))?;
        }
        Ok(())
    }
}

fn check_range(field: &'static str, value: u32, max: u32) -> Result<()> {
    if value > max {
        return Err(TctfError::FieldOutOfRange { field, value, max });
    }
    Ok(())
}

/// Encode a frame into the wire format.
///
/// The length field is derived from the header and payload sizes. Frame error
/// control is not computed: channels that carry it pass the two octets at the
/// end of `payload`.
pub fn encode_frame(header: &FrameHeader, payload: &[u8], dst: &mut BytesMut) -> Result<()> {
    header.validate()?;

    let total = header.header_size() + payload.len();
    if total > MAX_FRAME_LENGTH {
        return Err(TctfError::FrameTooLong {
            size: total,
            max: MAX_FRAME_LENGTH,
        });
    }
    let length_field = total - 1;

    let mut octet0 = (header.version << 6) | ((header.spacecraft_id >> 8) as u8 & 0x03);
    if header.bypass {
        octet0 |= 0x20;
    }
    if header.control_command {
        octet0 |= 0x10;
    }

    dst.reserve(total);
    dst.put_u8(octet0);
    dst.put_u8((header.spacecraft_id & 0xFF) as u8);
    dst.put_u8((header.vc_id << 2) | ((length_field >> 8) as u8 & 0x03));
    dst.put_u8((length_field & 0xFF) as u8);
    dst.put_u8(header.seq_num);
    if let Some(segment) = header.segment {
        dst.put_u8((segment.flags.bits() << 6) | segment.map_id);
    }
    dst.put_slice(payload);
    Ok(())
}

/// Decode a frame from a buffer.
///
/// TC frames delimit themselves through the length field. Returns `Ok(None)`
/// if the buffer doesn't contain a complete frame yet. On success, consumes
/// the frame bytes from the buffer.
pub fn decode_frame(src: &mut BytesMut) -> Result<Option<Bytes>> {
    if src.len() < PRIHDR_SIZE {
        return Ok(None);
    }

    let total = declared_length(src);
    if src.len() < total {
        return Ok(None);
    }

    Ok(Some(src.split_to(total).freeze()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_decode_roundtrip() {
        let header = FrameHeader::ad(0x2AB, 7, 42).with_segment(SequenceFlags::Unsegmented, 3);
        let mut buf = BytesMut::new();
        encode_frame(&header, b"hello, cmdlink!", &mut buf).unwrap();

        assert_eq!(buf.len(), 6 + 15);

        let wire = decode_frame(&mut buf).unwrap().unwrap();
        assert!(buf.is_empty());

        let tf = TransferFrame::new(&wire).unwrap();
        assert_eq!(tf.spacecraft_id(), 0x2AB);
        assert_eq!(tf.vc_id(), 7);
        assert_eq!(tf.seq_num(), 42);
        assert_eq!(usize::from(tf.length()), wire.len());
        assert_eq!(FrameHeader::from_frame(&tf, true), header);
        assert_eq!(&wire[6..], b"hello, cmdlink!");
    }

    #[test]
    fn test_encode_control_frame_flags() {
        let mut buf = BytesMut::new();
        encode_frame(&FrameHeader::bc(1, 2), &[0x82, 0x00, 0x10], &mut buf).unwrap();
        assert_eq!(buf.as_ref(), &[0x30, 0x01, 0x08, 0x07, 0x00, 0x82, 0x00, 0x10]);
    }

    #[test]
    fn test_encode_header_only_frame() {
        let mut buf = BytesMut::new();
        encode_frame(&FrameHeader::bd(0, 0), &[], &mut buf).unwrap();
        assert_eq!(buf.as_ref(), &[0x20, 0x00, 0x00, 0x04, 0x00]);
    }

    #[test]
    fn test_encode_max_frame() {
        let mut buf = BytesMut::new();
        let payload = vec![0u8; MAX_FRAME_LENGTH - PRIHDR_SIZE];
        encode_frame(&FrameHeader::ad(0, 0, 0), &payload, &mut buf).unwrap();
        assert_eq!(buf[2] & 0x03, 0x03);
        assert_eq!(buf[3], 0xFF);
    }

    #[test]
    fn test_encode_frame_too_long() {
        let mut buf = BytesMut::new();
        let payload = vec![0u8; MAX_FRAME_LENGTH - PRIHDR_SIZE + 1];
        let err = encode_frame(&FrameHeader::ad(0, 0, 0), &payload, &mut buf).unwrap_err();
        assert!(matches!(err, TctfError::FrameTooLong { size: 1025, .. }));
        assert!(buf.is_empty());
    }

    #[test]
    fn test_encode_field_out_of_range() {
        let mut buf = BytesMut::new();
        let err = encode_frame(&FrameHeader::ad(1024, 0, 0), &[], &mut buf).unwrap_err();
        assert!(matches!(
            err,
            TctfError::FieldOutOfRange {
                field: "spacecraft id",
                value: 1024,
                max: 1023
            }
        ));

        let err = encode_frame(&FrameHeader::ad(0, 64, 0), &[], &mut buf).unwrap_err();
        assert!(matches!(err, TctfError::FieldOutOfRange { .. }));

        let header = FrameHeader::ad(0, 0, 0).with_segment(SequenceFlags::First, 64);
        let err = encode_frame(&header, &[], &mut buf).unwrap_err();
        assert!(matches!(err, TctfError::FieldOutOfRange { field: "MAP id", .. }));
    }

    #[test]
    fn test_decode_incomplete_header() {
        let mut buf = BytesMut::from(&[0x00, 0x01, 0x00][..]);
        assert!(decode_frame(&mut buf).unwrap().is_none());
        assert_eq!(buf.len(), 3);
    }

    #[test]
    fn test_decode_incomplete_frame() {
        let mut buf = BytesMut::new();
        encode_frame(&FrameHeader::ad(1, 1, 0), b"hello", &mut buf).unwrap();
        buf.truncate(PRIHDR_SIZE + 2);
        assert!(decode_frame(&mut buf).unwrap().is_none());
    }

    #[test]
    fn test_multiple_frames() {
        let mut buf = BytesMut::new();
        encode_frame(&FrameHeader::ad(1, 1, 0), b"first", &mut buf).unwrap();
        encode_frame(&FrameHeader::ad(1, 1, 1), b"second", &mut buf).unwrap();

        let f1 = decode_frame(&mut buf).unwrap().unwrap();
        assert_eq!(&f1[PRIHDR_SIZE..], b"first");
        let f2 = decode_frame(&mut buf).unwrap().unwrap();
        assert_eq!(&f2[PRIHDR_SIZE..], b"second");
        assert_eq!(f2[4], 1);
        assert!(buf.is_empty());
    }
}
