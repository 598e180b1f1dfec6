//! navX AHRS serial telemetry decoding.
//!
//! This crate turns the byte stream of a navX-style inertial sensor into
//! [`NavigationSample`]s, even when reads split frames at arbitrary points.
//!
//! - [`sync`] - locate the next structurally valid frame in a byte slice
//! - [`buffer`] - sliding-window reassembly over a [`Transport`]
//! - [`decoder`] / [`messages`] - fixed little-endian payload layout
//! - [`poller`] - background thread publishing the latest sample
//!
//! The protocol carries no checksum that is verified here: a frame is
//! accepted when its marker, length byte and terminator line up, and its
//! payload is trusted as-is.
//!
//! # Features
//! - `serial` - [`SerialTransport`](transport::SerialTransport) over the `serialport` crate

pub mod buffer;
pub mod config;
pub mod decoder;
pub mod error;
pub mod messages;
pub mod poller;
pub mod sample;
pub mod status;
pub mod sync;
pub mod transport;

pub use buffer::{Cursor, FrameBuffer, FrameCounters, FrameStats};
pub use config::{BufferConfig, NavxConfig, PollerConfig, SerialConfig};
pub use decoder::decode;
pub use error::{NavxError, Result};
pub use messages::{encode_frame, RawNavFrame};
pub use poller::{NavigationPoller, PollerState};
pub use sample::NavigationSample;
pub use status::{
    CalibrationStatus, ImuCalibration, OperationalStatus, SelfTestStatus, SensorStatus,
};
pub use sync::{find_frame_start, scan_frame_start, SyncResult, SyncScan};
pub use transport::{MockReader, MockTransport, Transport};

#[cfg(feature = "serial")]
pub use transport::SerialTransport;
