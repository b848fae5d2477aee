/// Errors that can occur while viewing, encoding or streaming transfer frames.
#[derive(Debug, thiserror::Error)]
pub enum TctfError {
    /// Fewer octets than a primary header were supplied.
    #[error("transfer frame too short ({len} bytes, primary header is 5)")]
    TooShort { len: usize },

    /// The buffer ends before the length declared in the primary header.
    #[error("transfer frame truncated (header declares {declared} bytes, got {actual})")]
    Truncated { declared: usize, actual: usize },

    /// The encoded frame would exceed the 1024-octet maximum.
    #[error("transfer frame too long ({size} bytes, max {max})")]
    FrameTooLong { size: usize, max: usize },

    /// A header field does not fit its bit width.
    #[error("{field} value {value} out of range (max {max})")]
    FieldOutOfRange {
        field: &'static str,
        value: u32,
        max: u32,
    },

    /// An I/O error occurred while reading or writing frames.
    #[error("frame I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The stream ended before a complete frame was received.
    #[error("stream closed (incomplete frame)")]
    ConnectionClosed,
}

pub type Result<T> = std::result::Result<T, TctfError>;
