//! Error types for the navX stream decoder.

use thiserror::Error;

/// Errors surfaced by the decoder, the frame buffer and the poller.
///
/// Framing problems (incomplete frames, spurious markers) are never errors;
/// they are reported through [`SyncResult`](crate::sync::SyncResult) and the
/// [`FrameCounters`](crate::buffer::FrameCounters).
#[derive(Error, Debug)]
pub enum NavxError {
    /// Transport read failure.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Frame slice is shorter than the fixed payload layout.
    #[error("Frame too short: {len} bytes, need at least {required}")]
    FrameTooShort {
        /// Bytes handed to the decoder
        len: usize,
        /// Minimum bytes the payload layout occupies
        required: usize,
    },

    /// Configuration value out of range.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Configuration file could not be parsed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Serial port could not be opened.
    #[cfg(feature = "serial")]
    #[error("Serial port error: {0}")]
    Serial(#[from] serialport::Error),
}

/// Result type for navX operations.
pub type Result<T> = std::result::Result<T, NavxError>;
