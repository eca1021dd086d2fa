use std::fmt;
use std::io;

use scanpack_codec::{ScanError, CHANNEL_COUNT};

pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const PERMISSION_DENIED: i32 = 50;
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
        io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
        io::ErrorKind::NotFound => FAILURE,
        io::ErrorKind::InvalidData | io::ErrorKind::UnexpectedEof => DATA_INVALID,
        _ => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn json_error(context: &str, err: serde_json::Error) -> CliError {
    if err.is_io() {
        return io_error(context, err.into());
    }
    CliError::new(DATA_INVALID, format!("{context}: {err}"))
}

pub fn scan_error(context: &str, err: ScanError) -> CliError {
    match err {
        // Unknown channel ids are a usage problem; known but unpopulated ones are bad data.
        ScanError::IndexOutOfRange { index, .. } if index >= CHANNEL_COUNT => {
            CliError::new(USAGE, format!("{context}: {err}"))
        }
        ScanError::ChannelDataAbsent { .. }
        | ScanError::LengthMismatch { .. }
        | ScanError::IndexOutOfRange { .. }
        | ScanError::Truncated { .. }
        | ScanError::Malformed(_)
        | ScanError::InvalidProperties(_) => {
            CliError::new(DATA_INVALID, format!("{context}: {err}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_errors_map_to_exit_codes() {
        let err = scan_error("select", ScanError::IndexOutOfRange { index: 1, available: 1 });
        assert_eq!(err.code, DATA_INVALID);

        let err = scan_error("select", ScanError::IndexOutOfRange { index: 9, available: 2 });
        assert_eq!(err.code, USAGE);

        let err = scan_error("encode", ScanError::ChannelDataAbsent { found: 1 });
        assert_eq!(err.code, DATA_INVALID);
        assert!(err.message.starts_with("encode: channel data absent"));
    }

    #[test]
    fn io_errors_map_by_kind() {
        let err = io_error("read", io::Error::from(io::ErrorKind::PermissionDenied));
        assert_eq!(err.code, PERMISSION_DENIED);
        let err = io_error("read", io::Error::from(io::ErrorKind::NotFound));
        assert_eq!(err.code, FAILURE);
    }
}
