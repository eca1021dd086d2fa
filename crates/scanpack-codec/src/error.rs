/// Errors that can occur while compressing, decompressing or viewing scans.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    /// Compression needs both the preprocessed and the self-filtered channel.
    #[error("channel data absent (need 2 range channels, found {found})")]
    ChannelDataAbsent { found: usize },

    /// Two per-beam sequences that must line up have different lengths.
    #[error("{what} length mismatch (expected {expected}, got {actual})")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    /// The requested channel is not populated in the scan.
    #[error("channel index {index} out of range ({available} channels populated)")]
    IndexOutOfRange { index: usize, available: usize },

    /// The wire record ends before its fixed-size part.
    #[error("compact scan truncated ({available} bytes, need at least {needed})")]
    Truncated { needed: usize, available: usize },

    /// The wire record does not match the beam count implied by the scan geometry.
    #[error("malformed compact scan: {0}")]
    Malformed(String),

    /// The out-of-band scan properties cannot describe a scan.
    #[error("invalid scan properties: {0}")]
    InvalidProperties(String),
}

pub type Result<T> = std::result::Result<T, ScanError>;
