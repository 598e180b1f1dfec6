//! Stream reassembly for navX frames.
//!
//! Transport reads land at arbitrary byte boundaries. [`FrameBuffer`] keeps
//! the bytes that may still belong to a frame, slides consumed bytes off the
//! front on every ingest, and hands out one decoded frame per call.
//!
//! # Refill policy
//!
//! The transport is only read when at least `min_read_bytes` are waiting.
//! A validated frame whose end lies within `tail_margin_bytes` of the buffer
//! tail also triggers a refill before it is consumed. If the transport
//! cannot supply enough bytes at that point, [`FrameBuffer::next_frame`]
//! returns `None` and the frame is delivered on a later call.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use bytes::{Buf, BytesMut};
use tracing::{debug, trace, warn};

use crate::config::BufferConfig;
use crate::decoder::decode;
use crate::error::{NavxError, Result};
use crate::messages::LENGTH_OFFSET;
use crate::sample::NavigationSample;
use crate::sync::{scan_frame_start, SyncResult};
use crate::transport::Transport;

/// Position of the next candidate frame in the buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cursor {
    /// Validated frame starts here
    Frame(usize),
    /// Marker here, frame not complete yet; bytes from here are retained
    Pending(usize),
    /// No marker after the last consumed frame; all bytes may be dropped
    Exhausted,
}

impl From<SyncResult> for Cursor {
    fn from(result: SyncResult) -> Self {
        match result {
            SyncResult::Found(offset) => Cursor::Frame(offset),
            SyncResult::Incomplete(offset) => Cursor::Pending(offset),
            SyncResult::NotFound => Cursor::Exhausted,
        }
    }
}

/// Counters shared between a frame buffer and its observers
#[derive(Debug, Default)]
pub struct FrameCounters {
    frames_decoded: AtomicU64,
    spurious_markers: AtomicU64,
    undersized_frames: AtomicU64,
    bytes_ingested: AtomicU64,
    transport_errors: AtomicU64,
}

impl FrameCounters {
    /// Copy the current counter values
    pub fn snapshot(&self) -> FrameStats {
        FrameStats {
            frames_decoded: self.frames_decoded.load(Ordering::Relaxed),
            spurious_markers: self.spurious_markers.load(Ordering::Relaxed),
            undersized_frames: self.undersized_frames.load(Ordering::Relaxed),
            bytes_ingested: self.bytes_ingested.load(Ordering::Relaxed),
            transport_errors: self.transport_errors.load(Ordering::Relaxed),
        }
    }

    pub(crate) fn record_transport_error(&self) {
        self.transport_errors.fetch_add(1, Ordering::Relaxed);
    }
}

/// Point-in-time copy of [`FrameCounters`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Frames decoded into samples
    pub frames_decoded: u64,
    /// Markers rejected by the terminator check
    pub spurious_markers: u64,
    /// Terminated frames too short for the payload layout
    pub undersized_frames: u64,
    /// Bytes read from the transport
    pub bytes_ingested: u64,
    /// Failed transport reads (counted by the poller)
    pub transport_errors: u64,
}

/// Sliding-window reassembly buffer.
pub struct FrameBuffer {
    buffer: BytesMut,
    cursor: Cursor,
    config: BufferConfig,
    counters: Arc<FrameCounters>,
}

impl FrameBuffer {
    /// Buffer with the default 256-byte refill thresholds
    pub fn new() -> Self {
        Self::with_config(BufferConfig::default())
    }

    /// Buffer with custom refill thresholds and its own counters
    pub fn with_config(config: BufferConfig) -> Self {
        Self::with_counters(config, Arc::new(FrameCounters::default()))
    }

    /// Buffer that reports into an existing set of counters
    pub fn with_counters(config: BufferConfig, counters: Arc<FrameCounters>) -> Self {
        Self {
            buffer: BytesMut::with_capacity(4 * 1024),
            cursor: Cursor::Exhausted,
            config,
            counters,
        }
    }

    /// Shared handle to this buffer's counters
    pub fn counters(&self) -> Arc<FrameCounters> {
        self.counters.clone()
    }

    pub fn stats(&self) -> FrameStats {
        self.counters.snapshot()
    }

    /// Number of buffered bytes
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Drop all buffered bytes
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.cursor = Cursor::Exhausted;
    }

    /// Append freshly read transport bytes.
    ///
    /// On an empty buffer, bytes before the first marker are dropped.
    /// Otherwise everything before the cursor is dropped and the new bytes
    /// are appended, with the cursor moved to the front.
    pub fn ingest(&mut self, new_bytes: &[u8]) {
        self.counters
            .bytes_ingested
            .fetch_add(new_bytes.len() as u64, Ordering::Relaxed);

        if self.buffer.is_empty() {
            let scan = scan_frame_start(new_bytes, 0);
            self.record_spurious(scan.spurious_markers);
            match scan.result {
                SyncResult::Found(start) | SyncResult::Incomplete(start) => {
                    if start > 0 {
                        trace!("Dropped {start} bytes ahead of first marker");
                    }
                    self.buffer.extend_from_slice(&new_bytes[start..]);
                    self.cursor = Cursor::from(scan.result).rebased(start);
                }
                SyncResult::NotFound => {
                    trace!("Dropped {} bytes without a marker", new_bytes.len());
                    self.cursor = Cursor::Exhausted;
                }
            }
        } else {
            let keep_from = match self.cursor {
                Cursor::Frame(offset) | Cursor::Pending(offset) => offset,
                Cursor::Exhausted => self.buffer.len(),
            };
            self.buffer.advance(keep_from);
            self.buffer.extend_from_slice(new_bytes);
            self.cursor = match self.cursor {
                Cursor::Frame(_) => Cursor::Frame(0),
                Cursor::Pending(_) | Cursor::Exhausted => self.locate(0),
            };
            if self.cursor == Cursor::Exhausted {
                self.buffer.clear();
            }
        }

        debug!(
            "Ingested {} bytes, buffer holds {} ({:?})",
            new_bytes.len(),
            self.buffer.len(),
            self.cursor
        );
    }

    /// Extract and decode the next frame, reading from `transport` as needed.
    ///
    /// Returns `Ok(None)` when not enough data is available yet; nothing is
    /// read in that case unless the transport reports at least
    /// `min_read_bytes` waiting.
    ///
    /// # Errors
    /// Propagates transport I/O failures as [`NavxError::Io`].
    pub fn next_frame<T: Transport + ?Sized>(
        &mut self,
        transport: &mut T,
    ) -> Result<Option<NavigationSample>> {
        loop {
            if (self.buffer.is_empty() || self.needs_refill()) && !self.refill(transport)? {
                return Ok(None);
            }

            let Cursor::Frame(start) = self.cursor else {
                return Ok(None);
            };

            let end = start + self.buffer[start + LENGTH_OFFSET] as usize;
            let decoded = decode(&self.buffer[start..end]);
            self.cursor = self.locate(end + 1);

            match decoded {
                Ok(sample) => {
                    self.counters.frames_decoded.fetch_add(1, Ordering::Relaxed);
                    return Ok(Some(sample));
                }
                Err(NavxError::FrameTooShort { len, required }) => {
                    self.counters
                        .undersized_frames
                        .fetch_add(1, Ordering::Relaxed);
                    warn!("Skipping {len}-byte frame at offset {start}, need {required}");
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Whether the candidate at the cursor is too close to the tail to consume
    fn needs_refill(&self) -> bool {
        match self.cursor {
            Cursor::Frame(start) => {
                let end = start + self.buffer[start + LENGTH_OFFSET] as usize;
                end + self.config.tail_margin_bytes > self.buffer.len()
            }
            Cursor::Pending(_) | Cursor::Exhausted => true,
        }
    }

    /// Read everything waiting on the transport if enough bytes are available.
    ///
    /// Returns false without reading when fewer than `min_read_bytes` wait.
    fn refill<T: Transport + ?Sized>(&mut self, transport: &mut T) -> Result<bool> {
        let available = transport.bytes_available()?;
        if available < self.config.min_read_bytes {
            return Ok(false);
        }
        let bytes = transport.read(available)?;
        self.ingest(&bytes);
        Ok(true)
    }

    fn locate(&mut self, from: usize) -> Cursor {
        let scan = scan_frame_start(&self.buffer, from);
        self.record_spurious(scan.spurious_markers);
        Cursor::from(scan.result)
    }

    fn record_spurious(&self, count: usize) {
        if count > 0 {
            trace!("Rejected {count} spurious marker(s)");
            self.counters
                .spurious_markers
                .fetch_add(count as u64, Ordering::Relaxed);
        }
    }
}

impl Cursor {
    /// Shift an offset found in a slice that now starts at `base`
    fn rebased(self, base: usize) -> Self {
        match self {
            Cursor::Frame(offset) => Cursor::Frame(offset - base),
            Cursor::Pending(offset) => Cursor::Pending(offset - base),
            Cursor::Exhausted => Cursor::Exhausted,
        }
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}
