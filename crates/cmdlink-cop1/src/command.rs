//! COP-1 control commands carried in Type-BC frames.

use crate::error::Rejection;

/// First octet of an Unlock directive.
pub const UNLOCK: u8 = 0x00;

/// First octet of a Set V(R) directive.
pub const SET_VR: u8 = 0x82;

/// Second octet of a Set V(R) directive.
pub const SET_VR_SECOND: u8 = 0x00;

/// A decoded control command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlCommand {
    /// Leave lockout and clear wait and retransmit.
    Unlock,
    /// Set V(R) to the given value.
    SetVr(u8),
}

impl ControlCommand {
    /// Decode a control command from a frame data field.
    ///
    /// Trailing octets after a complete command are ignored.
    pub fn parse(data: &[u8]) -> Result<Self, Rejection> {
        match data {
            [UNLOCK, ..] => Ok(Self::Unlock),
            [SET_VR, SET_VR_SECOND, vr, ..] => Ok(Self::SetVr(*vr)),
            [SET_VR, ..] => Err(Rejection::MalformedCommand),
            [other, ..] => Err(Rejection::UnknownCommand(*other)),
            [] => Err(Rejection::MalformedCommand),
        }
    }

    /// Encoded data field for this command.
    pub fn to_bytes(self) -> Vec<u8> {
        match self {
            Self::Unlock => vec![UNLOCK],
            Self::SetVr(vr) => vec![SET_VR, SET_VR_SECOND, vr],
        }
    }

    /// Lowercase name for logs.
    pub fn name(self) -> &'static str {
        match self {
            Self::Unlock => "unlock",
            Self::SetVr(_) => "set_vr",
        }
    }
}
