use std::fmt;
use std::io;

use cmdlink_cop1::Cop1Error;
use cmdlink_tctf::TctfError;

pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied => FAILURE,
        io::ErrorKind::InvalidData | io::ErrorKind::UnexpectedEof => DATA_INVALID,
        _ => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn tctf_error(context: &str, err: TctfError) -> CliError {
    match err {
        TctfError::Io(source) => io_error(context, source),
        TctfError::FieldOutOfRange { .. } | TctfError::FrameTooLong { .. } => {
            CliError::new(USAGE, format!("{context}: {err}"))
        }
        other => CliError::new(DATA_INVALID, format!("{context}: {other}")),
    }
}

pub fn cop1_error(context: &str, err: Cop1Error) -> CliError {
    match err {
        Cop1Error::InvalidConfig(_) => CliError::new(USAGE, format!("{context}: {err}")),
        Cop1Error::BadInput(_) => CliError::new(INTERNAL, format!("{context}: {err}")),
        other => CliError::new(FAILURE, format!("{context}: {other}")),
    }
}

pub fn hex_error(context: &str, err: hex::FromHexError) -> CliError {
    CliError::new(USAGE, format!("{context}: {err}"))
}
