//! Channel service configuration.
//!
//! A channel service names the TC SDLP service a receiver expects on a
//! channel (CCSDS 232.0-B) together with the identifiers every incoming
//! transfer frame is checked against. It is static configuration: set up once
//! per channel and never mutated by the decoder or FARM-1.

use std::fmt;
use std::str::FromStr;

use crate::frame::{PRIHDR_SIZE, SEGHDR_SIZE};

/// TC SDLP service types. Discriminants follow the on-board table encoding.
#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceKind {
    /// MAP Packet.
    MapPacket = 0,
    /// Virtual Channel Packet.
    VirtualChannelPacket = 1,
    /// MAP Access.
    MapAccess = 2,
    /// Virtual Channel Access.
    VirtualChannelAccess = 3,
    /// Virtual Channel Frame.
    VirtualChannelFrame = 4,
    /// Master Channel Frame.
    MasterChannelFrame = 5,
}

impl ServiceKind {
    /// Look up a service kind by its table code.
    pub fn from_code(code: u16) -> Option<Self> {
        match code {
            0 => Some(Self::MapPacket),
            1 => Some(Self::VirtualChannelPacket),
            2 => Some(Self::MapAccess),
            3 => Some(Self::VirtualChannelAccess),
            4 => Some(Self::VirtualChannelFrame),
            5 => Some(Self::MasterChannelFrame),
            _ => None,
        }
    }

    /// Table code for this service kind.
    pub fn code(self) -> u16 {
        self as u16
    }

    /// Short mnemonic used in logs and on the command line.
    pub fn name(self) -> &'static str {
        match self {
            Self::MapPacket => "mapp",
            Self::VirtualChannelPacket => "vcp",
            Self::MapAccess => "mapa",
            Self::VirtualChannelAccess => "vca",
            Self::VirtualChannelFrame => "vcf",
            Self::MasterChannelFrame => "mcf",
        }
    }

    /// Returns true if frames for this service must carry the configured virtual channel id.
    pub fn checks_vc_id(self) -> bool {
        !matches!(self, Self::MasterChannelFrame)
    }

    /// Returns true if frames for this service must carry the configured MAP id.
    pub fn checks_map_id(self) -> bool {
        matches!(self, Self::MapPacket | Self::MapAccess)
    }
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ServiceKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mapp" | "map-packet" => Ok(Self::MapPacket),
            "vcp" | "vc-packet" => Ok(Self::VirtualChannelPacket),
            "mapa" | "map-access" => Ok(Self::MapAccess),
            "vca" | "vc-access" => Ok(Self::VirtualChannelAccess),
            "vcf" | "vc-frame" => Ok(Self::VirtualChannelFrame),
            "mcf" | "master-channel-frame" => Ok(Self::MasterChannelFrame),
            other => Err(format!(
                "unknown service '{other}' (expected mapp, vcp, mapa, vca, vcf or mcf)"
            )),
        }
    }
}

/// Identifiers and service type expected on one channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelService {
    /// Service type.
    pub service: ServiceKind,
    /// Transfer frame version number. Always 0 for the current CCSDS version.
    pub packet_version_number: u8,
    /// Spacecraft id carried in the primary header.
    pub spacecraft_id: u16,
    /// Virtual channel id carried in the primary header.
    pub virtual_channel_id: u8,
    /// MAP id carried in the segment header.
    pub map_id: u8,
    /// Whether data frames on this channel carry a segment header.
    pub has_segment_header: bool,
    /// Whether frames carry the 2-octet frame error control field.
    pub has_frame_error_control: bool,
}

impl ChannelService {
    /// Create a channel service without segment header or frame error control.
    pub fn new(service: ServiceKind, spacecraft_id: u16, virtual_channel_id: u8) -> Self {
        Self {
            service,
            spacecraft_id,
            virtual_channel_id,
            ..Self::default()
        }
    }

    /// Set the expected MAP id and enable the segment header.
    pub fn with_map_id(mut self, map_id: u8) -> Self {
        self.map_id = map_id;
        self.has_segment_header = true;
        self
    }

    /// Enable or disable the segment header.
    pub fn with_segment_header(mut self, enabled: bool) -> Self {
        self.has_segment_header = enabled;
        self
    }

    /// Enable or disable the frame error control field.
    pub fn with_frame_error_control(mut self, enabled: bool) -> Self {
        self.has_frame_error_control = enabled;
        self
    }

    /// Octet offset of the data unit inside a frame for this channel.
    pub fn payload_offset(&self) -> usize {
        if self.has_segment_header {
            PRIHDR_SIZE + SEGHDR_SIZE
        } else {
            PRIHDR_SIZE
        }
    }
}

impl Default for ChannelService {
    fn default() -> Self {
        Self {
            service: ServiceKind::VirtualChannelPacket,
            packet_version_number: 0,
            spacecraft_id: 0,
            virtual_channel_id: 0,
            map_id: 0,
            has_segment_header: false,
            has_frame_error_control: false,
        }
    }
}
