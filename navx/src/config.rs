//! Runtime configuration for the frame buffer, poller and serial adapter.
//!
//! All sections are optional in the JSON file; missing values fall back to
//! the protocol defaults.
//!
//! ```json
//! {
//!   "buffer": { "min_read_bytes": 256, "tail_margin_bytes": 256 },
//!   "poller": { "poll_interval_ms": 100 },
//!   "serial": { "path": "/dev/ttyACM0", "baud_rate": 9600 }
//! }
//! ```

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{NavxError, Result};

/// Bytes that must be waiting before the buffer pulls from the transport
pub const DEFAULT_MIN_READ_BYTES: usize = 256;

/// Distance from the buffer tail inside which a frame triggers a refill
pub const DEFAULT_TAIL_MARGIN_BYTES: usize = 256;

/// Wait between polls when no frame is ready
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 100;

/// Baud rate of the navX USB virtual COM port
pub const DEFAULT_BAUD_RATE: u32 = 9600;

/// Serial read timeout; a read that times out yields no bytes
pub const DEFAULT_READ_TIMEOUT_MS: u64 = 10;

/// Frame buffer refill thresholds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BufferConfig {
    /// Minimum bytes available on the transport before a read is issued
    pub min_read_bytes: usize,
    /// Refill once the next frame ends within this many bytes of the tail
    pub tail_margin_bytes: usize,
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self {
            min_read_bytes: DEFAULT_MIN_READ_BYTES,
            tail_margin_bytes: DEFAULT_TAIL_MARGIN_BYTES,
        }
    }
}

/// Background poll loop settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PollerConfig {
    pub poll_interval_ms: u64,
}

impl PollerConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

/// Serial port settings; the path must name the device explicitly
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SerialConfig {
    pub path: String,
    #[serde(default = "default_baud_rate")]
    pub baud_rate: u32,
    #[serde(default = "default_read_timeout_ms")]
    pub read_timeout_ms: u64,
}

fn default_baud_rate() -> u32 {
    DEFAULT_BAUD_RATE
}

fn default_read_timeout_ms() -> u64 {
    DEFAULT_READ_TIMEOUT_MS
}

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NavxConfig {
    pub buffer: BufferConfig,
    pub poller: PollerConfig,
    pub serial: Option<SerialConfig>,
}

impl NavxConfig {
    /// Parse a configuration from a JSON string and validate it.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a JSON file and validate it.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Check value ranges that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.poller.poll_interval_ms == 0 {
            return Err(NavxError::Config(
                "poll_interval_ms must be greater than zero".to_string(),
            ));
        }
        if self.buffer.min_read_bytes == 0 {
            return Err(NavxError::Config(
                "min_read_bytes must be greater than zero".to_string(),
            ));
        }
        if let Some(serial) = &self.serial {
            if serial.path.is_empty() {
                return Err(NavxError::Config("serial.path is empty".to_string()));
            }
        }
        Ok(())
    }
}
