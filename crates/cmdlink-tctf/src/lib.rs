//! CCSDS telecommand transfer frame (TC SDLP) decoding.
//!
//! Frames are read through a borrowed [`TransferFrame`] view over the
//! received bytes and validated against a channel's static
//! [`ChannelService`] configuration:
//! - 5-octet primary header (version, bypass/control flags, spacecraft id,
//!   virtual channel id, length, sequence number)
//! - optional 1-octet segment header (sequence flags, MAP id)
//! - data field, optionally followed by 2 octets of frame error control
//!
//! Nothing here allocates on the decode path. The encoder and the stream
//! adapters exist for ground-side tooling and tests.

pub mod codec;
pub mod error;
pub mod frame;
pub mod reader;
pub mod service;
pub mod writer;

pub use codec::{decode_frame, encode_frame, FrameHeader, SegmentHeader};
pub use error::{Result, TctfError};
pub use frame::{
    copy_data, get_bypass_flag, get_ctl_cmd_flag, get_length, get_payload_length,
    get_seg_hdr_map_id, get_seg_hdr_seq_flags, get_seq_num, get_spacecraft_id, get_vc_id,
    get_version, is_valid_tf, FrameType, SequenceFlags, TransferFrame, FRAME_ERROR_CONTROL_SIZE,
    MAX_FRAME_LENGTH, NO_SEGHDR, PRIHDR_SIZE, SEGHDR_SIZE,
};
pub use reader::FrameReader;
pub use service::{ChannelService, ServiceKind};
pub use writer::FrameWriter;
