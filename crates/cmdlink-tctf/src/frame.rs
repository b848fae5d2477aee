//! Borrowed view over a received TC transfer frame.
//!
//! Primary header layout (5 octets):
//! ```text
//! octet 0        octet 1    octet 2        octet 3     octet 4
//! VV B C RR SS   SSSSSSSS   VVVVVV LL      LLLLLLLL    NNNNNNNN
//! │  │ │    └──── spacecraft id (10 bits)   │            └─ sequence number
//! │  │ └─ control command flag     vc id ───┘ frame length - 1 (10 bits)
//! │  └─ bypass flag
//! └─ version
//! ```
//!
//! An optional 1-octet segment header follows on data frames of channels
//! configured for it: sequence flags (2 bits) and MAP id (6 bits).
//!
//! The free functions at the bottom of this module take the frame as an
//! `Option` and return documented sentinels when it is absent. They are the
//! entry points the FARM-1 engine and the C bindings use.

use crate::error::{Result, TctfError};
use crate::service::ChannelService;

/// Primary header size in octets.
pub const PRIHDR_SIZE: usize = 5;

/// Segment header size in octets.
pub const SEGHDR_SIZE: usize = 1;

/// Frame error control field size in octets.
pub const FRAME_ERROR_CONTROL_SIZE: usize = 2;

/// Largest frame the 10-bit length field can describe.
pub const MAX_FRAME_LENGTH: usize = 1024;

/// Returned by the segment header accessors when there is no segment header.
pub const NO_SEGHDR: u8 = 255;

/// Segment header sequence flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SequenceFlags {
    /// Continuing segment.
    Continuing = 0,
    /// First segment.
    First = 1,
    /// Last segment.
    Last = 2,
    /// No segmentation.
    Unsegmented = 3,
}

impl SequenceFlags {
    /// Decode from the two-bit field value. Higher bits are ignored.
    pub fn from_bits(bits: u8) -> Self {
        match bits & 0x03 {
            0 => Self::Continuing,
            1 => Self::First,
            2 => Self::Last,
            _ => Self::Unsegmented,
        }
    }

    /// Two-bit field value.
    pub fn bits(self) -> u8 {
        self as u8
    }
}

/// Frame type derived from the bypass and control command flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameType {
    /// Sequence-controlled data frame.
    Ad,
    /// Bypass data frame.
    Bd,
    /// Bypass control command frame.
    Bc,
    /// Control command flag without bypass. Never valid.
    Reserved,
}

impl FrameType {
    /// Conventional CCSDS name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Ad => "AD",
            Self::Bd => "BD",
            Self::Bc => "BC",
            Self::Reserved => "reserved",
        }
    }
}

/// Read the declared total length from a primary header.
pub(crate) fn declared_length(header: &[u8]) -> usize {
    ((usize::from(header[2] & 0x03) << 8) | usize::from(header[3])) + 1
}

/// A transfer frame borrowed from caller-owned bytes.
///
/// The view always covers exactly the declared frame length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferFrame<'a> {
    bytes: &'a [u8],
}

impl<'a> TransferFrame<'a> {
    /// Wrap a received frame.
    ///
    /// Bytes past the declared length are ignored.
    pub fn new(bytes: &'a [u8]) -> Result<Self> {
        if bytes.len() < PRIHDR_SIZE {
            return Err(TctfError::TooShort { len: bytes.len() });
        }
        let declared = declared_length(bytes);
        if bytes.len() < declared {
            return Err(TctfError::Truncated {
                declared,
                actual: bytes.len(),
            });
        }
        Ok(Self {
            bytes: &bytes[..declared],
        })
    }

    /// The whole frame, primary header included.
    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }

    /// Transfer frame version number (0..=3).
    pub fn version(&self) -> u8 {
        self.bytes[0] >> 6
    }

    /// Bypass flag.
    pub fn bypass_flag(&self) -> bool {
        self.bytes[0] & 0x20 != 0
    }

    /// Control command flag.
    pub fn ctl_cmd_flag(&self) -> bool {
        self.bytes[0] & 0x10 != 0
    }

    /// Spacecraft id (0..=1023).
    pub fn spacecraft_id(&self) -> u16 {
        (u16::from(self.bytes[0] & 0x03) << 8) | u16::from(self.bytes[1])
    }

    /// Virtual channel id (0..=63).
    pub fn vc_id(&self) -> u8 {
        self.bytes[2] >> 2
    }

    /// Total frame length in octets (5..=1024).
    pub fn length(&self) -> u16 {
        // declared_length is at most 1024
        declared_length(self.bytes) as u16
    }

    /// Frame sequence number N(S).
    pub fn seq_num(&self) -> u8 {
        self.bytes[4]
    }

    /// Frame type from the bypass and control command flags.
    pub fn frame_type(&self) -> FrameType {
        match (self.bypass_flag(), self.ctl_cmd_flag()) {
            (false, false) => FrameType::Ad,
            (true, false) => FrameType::Bd,
            (true, true) => FrameType::Bc,
            (false, true) => FrameType::Reserved,
        }
    }

    fn segment_header(&self) -> Option<u8> {
        if self.ctl_cmd_flag() {
            return None;
        }
        self.bytes.get(PRIHDR_SIZE).copied()
    }

    /// Segment header sequence flags field, if the frame can carry one.
    pub fn seg_hdr_seq_flags(&self) -> Option<u8> {
        self.segment_header().map(|octet| octet >> 6)
    }

    /// Typed segment header sequence flags.
    pub fn sequence_flags(&self) -> Option<SequenceFlags> {
        self.seg_hdr_seq_flags().map(SequenceFlags::from_bits)
    }

    /// Segment header MAP id, if the frame can carry one.
    pub fn seg_hdr_map_id(&self) -> Option<u8> {
        self.segment_header().map(|octet| octet & 0x3F)
    }

    /// Everything after the primary header. Control commands live here.
    pub fn data_field(&self) -> &'a [u8] {
        &self.bytes[PRIHDR_SIZE..]
    }

    /// Payload length for the given channel, saturating at 0.
    pub fn payload_length(&self, service: &ChannelService) -> u16 {
        let mut overhead = PRIHDR_SIZE;
        if service.has_segment_header {
            overhead += SEGHDR_SIZE;
        }
        if service.has_frame_error_control {
            overhead += FRAME_ERROR_CONTROL_SIZE;
        }
        // at most 1024
        self.bytes.len().saturating_sub(overhead) as u16
    }

    /// Payload octets for the given channel.
    pub fn payload(&self, service: &ChannelService) -> &'a [u8] {
        let start = service.payload_offset();
        let end = start + usize::from(self.payload_length(service));
        self.bytes.get(start..end).unwrap_or(&[])
    }

    /// Copy the payload into `dest` and zero the rest of `dest` up to the frame length.
    ///
    /// Returns the number of payload octets copied. Nothing is written when the
    /// payload is empty or `dest` cannot hold it.
    pub fn copy_data(&self, dest: &mut [u8], service: &ChannelService) -> u16 {
        let payload = self.payload(service);
        if payload.is_empty() || dest.len() < payload.len() {
            return 0;
        }
        dest[..payload.len()].copy_from_slice(payload);
        let fill_end = self.bytes.len().min(dest.len());
        if fill_end > payload.len() {
            dest[payload.len()..fill_end].fill(0);
        }
        payload.len() as u16
    }

    /// Check the frame against a channel's static configuration.
    pub fn is_valid(&self, service: &ChannelService) -> bool {
        if self.spacecraft_id() != service.spacecraft_id
            || self.version() != service.packet_version_number
        {
            return false;
        }
        if self.frame_type() == FrameType::Reserved {
            return false;
        }
        if service.service.checks_vc_id() && self.vc_id() != service.virtual_channel_id {
            return false;
        }
        if service.service.checks_map_id() && !self.ctl_cmd_flag() {
            return self.seg_hdr_map_id() == Some(service.map_id);
        }
        true
    }
}

impl<'a> TryFrom<&'a [u8]> for TransferFrame<'a> {
    type Error = TctfError;

    fn try_from(bytes: &'a [u8]) -> Result<Self> {
        Self::new(bytes)
    }
}

/// Version number, or 0 when absent.
pub fn get_version(tf: Option<&TransferFrame<'_>>) -> u8 {
    tf.map_or(0, TransferFrame::version)
}

/// Bypass flag, or false when absent.
pub fn get_bypass_flag(tf: Option<&TransferFrame<'_>>) -> bool {
    tf.is_some_and(TransferFrame::bypass_flag)
}

/// Control command flag, or false when absent.
pub fn get_ctl_cmd_flag(tf: Option<&TransferFrame<'_>>) -> bool {
    tf.is_some_and(TransferFrame::ctl_cmd_flag)
}

/// Spacecraft id, or 0 when absent.
pub fn get_spacecraft_id(tf: Option<&TransferFrame<'_>>) -> u16 {
    tf.map_or(0, TransferFrame::spacecraft_id)
}

/// Virtual channel id, or 0 when absent.
pub fn get_vc_id(tf: Option<&TransferFrame<'_>>) -> u8 {
    tf.map_or(0, TransferFrame::vc_id)
}

/// Total frame length, or 0 when absent.
pub fn get_length(tf: Option<&TransferFrame<'_>>) -> u16 {
    tf.map_or(0, TransferFrame::length)
}

/// Sequence number, or 0 when absent.
pub fn get_seq_num(tf: Option<&TransferFrame<'_>>) -> u8 {
    tf.map_or(0, TransferFrame::seq_num)
}

/// Segment header sequence flags, or [`NO_SEGHDR`].
pub fn get_seg_hdr_seq_flags(tf: Option<&TransferFrame<'_>>) -> u8 {
    tf.and_then(TransferFrame::seg_hdr_seq_flags)
        .unwrap_or(NO_SEGHDR)
}

/// Segment header MAP id, or [`NO_SEGHDR`].
pub fn get_seg_hdr_map_id(tf: Option<&TransferFrame<'_>>) -> u8 {
    tf.and_then(TransferFrame::seg_hdr_map_id)
        .unwrap_or(NO_SEGHDR)
}

/// Payload length, or 0 when either argument is absent.
pub fn get_payload_length(
    tf: Option<&TransferFrame<'_>>,
    service: Option<&ChannelService>,
) -> u16 {
    match (tf, service) {
        (Some(tf), Some(service)) => tf.payload_length(service),
        _ => 0,
    }
}

/// Copy the payload into `dest`. Returns 0 without writing when any argument is absent.
pub fn copy_data(
    dest: Option<&mut [u8]>,
    tf: Option<&TransferFrame<'_>>,
    service: Option<&ChannelService>,
) -> u16 {
    match (dest, tf, service) {
        (Some(dest), Some(tf), Some(service)) => tf.copy_data(dest, service),
        _ => 0,
    }
}

/// Validate a frame against channel configuration. False when either argument is absent.
pub fn is_valid_tf(tf: Option<&TransferFrame<'_>>, service: Option<&ChannelService>) -> bool {
    match (tf, service) {
        (Some(tf), Some(service)) => tf.is_valid(service),
        _ => false,
    }
}
