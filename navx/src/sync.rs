//! Frame synchronization
//!
//! Locates the next structurally valid frame in a byte sequence. A candidate
//! at offset `t` is valid when `buf[t]` is the marker, the length byte
//! `L = buf[t + 2]` is present, and `buf[t + L]` is the terminator.

use crate::messages::{LENGTH_OFFSET, MARKER, TERMINATOR};

/// Outcome of a frame start search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncResult {
    /// Validated frame starting at this offset
    Found(usize),
    /// Marker at this offset whose frame has not fully arrived yet
    Incomplete(usize),
    /// No marker at or after the search start
    NotFound,
}

impl SyncResult {
    /// Offset of a validated frame, if any
    pub fn found(self) -> Option<usize> {
        match self {
            SyncResult::Found(offset) => Some(offset),
            _ => None,
        }
    }
}

/// Search result plus the number of markers rejected on the way
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncScan {
    pub result: SyncResult,
    /// Markers whose terminator check failed
    pub spurious_markers: usize,
}

/// Find the next valid frame start at or after `from`.
pub fn find_frame_start(buf: &[u8], from: usize) -> SyncResult {
    scan_frame_start(buf, from).result
}

/// Like [`find_frame_start`], also counting the spurious markers skipped.
///
/// Scanning stops at the first marker that cannot be validated yet, so a
/// truncated frame at the tail is reported as [`SyncResult::Incomplete`]
/// rather than skipped.
pub fn scan_frame_start(buf: &[u8], from: usize) -> SyncScan {
    let mut pos = from;
    let mut spurious_markers = 0;

    let result = loop {
        let Some(t) = buf
            .get(pos..)
            .and_then(|rest| rest.iter().position(|&b| b == MARKER))
            .map(|i| pos + i)
        else {
            break SyncResult::NotFound;
        };

        let Some(&length) = buf.get(t + LENGTH_OFFSET) else {
            break SyncResult::Incomplete(t);
        };

        match buf.get(t + length as usize) {
            None => break SyncResult::Incomplete(t),
            Some(&TERMINATOR) => break SyncResult::Found(t),
            Some(_) => {
                spurious_markers += 1;
                pos = t + 1;
            }
        }
    };

    SyncScan {
        result,
        spurious_markers,
    }
}
