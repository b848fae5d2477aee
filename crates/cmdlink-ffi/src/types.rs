use cmdlink_cop1::Clcw;
use cmdlink_tctf::{ChannelService, ServiceKind};

#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmdlinkResult {
    Ok = 0,
    BadInput = -1,
    InvalidTransferFrame = -2,
    Farm1Error = -3,
    Internal = -99,
}

#[allow(dead_code)]
pub const CMDLINK_OK: CmdlinkResult = CmdlinkResult::Ok;
#[allow(dead_code)]
pub const CMDLINK_ERR_BAD_INPUT: CmdlinkResult = CmdlinkResult::BadInput;
#[allow(dead_code)]
pub const CMDLINK_ERR_INVALID_TF: CmdlinkResult = CmdlinkResult::InvalidTransferFrame;
#[allow(dead_code)]
pub const CMDLINK_ERR_FARM1: CmdlinkResult = CmdlinkResult::Farm1Error;
#[allow(dead_code)]
pub const CMDLINK_ERR_INTERNAL: CmdlinkResult = CmdlinkResult::Internal;

#[allow(dead_code)]
pub const CMDLINK_NO_SEGHDR: u8 = cmdlink_tctf::NO_SEGHDR;
#[allow(dead_code)]
pub const CMDLINK_MAX_FRAME_LENGTH: usize = cmdlink_tctf::MAX_FRAME_LENGTH;

/// Channel service table entry as laid out by the C host.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct CmdlinkChannelService {
    /// Service code: 0 MAP packet, 1 VC packet, 2 MAP access, 3 VC access,
    /// 4 VC frame, 5 master channel frame.
    pub service: u16,
    pub packet_version_number: u8,
    pub spacecraft_id: u16,
    pub virtual_channel_id: u8,
    pub map_id: u8,
    pub has_segment_header: bool,
    pub has_frame_error_control: bool,
}

impl CmdlinkChannelService {
    /// `None` when the service code is unknown.
    pub(crate) fn to_service(self) -> Option<ChannelService> {
        Some(ChannelService {
            service: ServiceKind::from_code(self.service)?,
            packet_version_number: self.packet_version_number,
            spacecraft_id: self.spacecraft_id,
            virtual_channel_id: self.virtual_channel_id,
            map_id: self.map_id,
            has_segment_header: self.has_segment_header,
            has_frame_error_control: self.has_frame_error_control,
        })
    }
}

/// CLCW octets in wire order.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CmdlinkClcw {
    pub status: u8,
    pub channel: u8,
    pub flags: u8,
    pub report: u8,
}

impl From<CmdlinkClcw> for Clcw {
    fn from(raw: CmdlinkClcw) -> Self {
        Clcw::from_bytes([raw.status, raw.channel, raw.flags, raw.report])
    }
}

impl From<Clcw> for CmdlinkClcw {
    fn from(clcw: Clcw) -> Self {
        let [status, channel, flags, report] = clcw.to_bytes();
        Self {
            status,
            channel,
            flags,
            report,
        }
    }
}
