/// Reasons FARM-1 rejects a frame.
///
/// These are normal protocol outcomes. Ground reads the CLCW flags to decide
/// what to do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    /// Sequence-controlled frame received while locked out.
    #[error("locked out, sequence-controlled frame discarded")]
    Lockout,

    /// Frame ahead of V(R) inside the positive window. Retransmit requested.
    #[error("frame {seq} ahead of V(R) {expected}, retransmit requested")]
    PositiveWindow { seq: u8, expected: u8 },

    /// Frame behind V(R) inside the negative window. Duplicate discarded.
    #[error("frame {seq} behind V(R) {expected}, duplicate discarded")]
    NegativeWindow { seq: u8, expected: u8 },

    /// Frame outside both windows. Lockout entered.
    #[error("frame {seq} outside window of V(R) {expected}, lockout entered")]
    LockoutEntered { seq: u8, expected: u8 },

    /// Set V(R) directive received while locked out.
    #[error("set V(R) rejected while locked out")]
    SetVrWhileLocked,

    /// Control command with an unrecognised first octet.
    #[error("unknown control command 0x{0:02X}")]
    UnknownCommand(u8),

    /// Control command with a recognised first octet but a bad body.
    #[error("malformed control command")]
    MalformedCommand,
}

/// Errors that can occur while processing a frame.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Cop1Error {
    /// A required argument was absent.
    #[error("bad input: {0}")]
    BadInput(&'static str),

    /// The frame does not match the channel configuration.
    #[error("transfer frame does not match channel configuration")]
    InvalidTransferFrame,

    /// FARM-1 rejected the frame.
    #[error("FARM-1 rejected frame: {0}")]
    Farm1(#[from] Rejection),

    /// FARM-1 configuration is out of range.
    #[error("invalid FARM-1 configuration: {0}")]
    InvalidConfig(String),
}

impl Cop1Error {
    /// Returns true for protocol rejections, which are expected during normal operation.
    pub fn is_farm1(&self) -> bool {
        matches!(self, Self::Farm1(_))
    }

    /// The rejection reason, if this is a FARM-1 rejection.
    pub fn rejection(&self) -> Option<Rejection> {
        match self {
            Self::Farm1(rejection) => Some(*rejection),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Cop1Error>;
