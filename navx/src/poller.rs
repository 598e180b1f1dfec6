//! Background poller keeping the latest navigation sample available.
//!
//! One thread owns the transport and a [`FrameBuffer`]. Every decoded frame
//! replaces the shared current sample through an atomic pointer swap, so any
//! number of readers can call [`NavigationPoller::current`] without locking.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use arc_swap::ArcSwapOption;
use tracing::{debug, info, warn};

use crate::buffer::{FrameBuffer, FrameCounters, FrameStats};
use crate::config::NavxConfig;
use crate::error::Result;
use crate::sample::NavigationSample;
use crate::transport::Transport;

/// Lifecycle of a [`NavigationPoller`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollerState {
    Running,
    Stopped,
}

/// Owns the poll thread and the published sample slot.
///
/// The poller starts running on construction. Dropping it stops the loop and
/// joins the thread, which also drops the transport.
pub struct NavigationPoller {
    current: Arc<ArcSwapOption<NavigationSample>>,
    running: Arc<AtomicBool>,
    counters: Arc<FrameCounters>,
    handle: Option<JoinHandle<()>>,
}

/// State moved onto the poll thread
struct PollWorker<T> {
    transport: T,
    buffer: FrameBuffer,
    current: Arc<ArcSwapOption<NavigationSample>>,
    running: Arc<AtomicBool>,
    counters: Arc<FrameCounters>,
    interval: Duration,
}

impl<T: Transport> PollWorker<T> {
    fn run(mut self) {
        while self.running.load(Ordering::Acquire) {
            match self.buffer.next_frame(&mut self.transport) {
                Ok(Some(sample)) => self.current.store(Some(Arc::new(sample))),
                Ok(None) => thread::park_timeout(self.interval),
                Err(e) => {
                    self.counters.record_transport_error();
                    warn!("navX transport read failed: {e}");
                    thread::park_timeout(self.interval);
                }
            }
        }
        debug!("navX poll loop exited");
    }
}

impl NavigationPoller {
    /// Start polling `transport` on a background thread.
    ///
    /// # Errors
    /// Returns [`NavxError::Io`](crate::NavxError::Io) if the thread cannot be spawned.
    pub fn spawn<T>(transport: T, config: &NavxConfig) -> Result<Self>
    where
        T: Transport + Send + 'static,
    {
        let current = Arc::new(ArcSwapOption::empty());
        let running = Arc::new(AtomicBool::new(true));
        let counters = Arc::new(FrameCounters::default());

        let worker = PollWorker {
            transport,
            buffer: FrameBuffer::with_counters(config.buffer, counters.clone()),
            current: current.clone(),
            running: running.clone(),
            counters: counters.clone(),
            interval: config.poller.poll_interval(),
        };

        let handle = thread::Builder::new()
            .name("navx-poller".to_string())
            .spawn(move || worker.run())?;

        info!(
            "navX poller started (interval {:?})",
            config.poller.poll_interval()
        );

        Ok(Self {
            current,
            running,
            counters,
            handle: Some(handle),
        })
    }

    /// Start polling with the default configuration
    pub fn spawn_default<T>(transport: T) -> Result<Self>
    where
        T: Transport + Send + 'static,
    {
        Self::spawn(transport, &NavxConfig::default())
    }

    /// Request the loop to stop.
    ///
    /// With `wait_for_exit`, blocks until the thread has exited; no sample is
    /// published after this returns. Calling it again is harmless.
    pub fn stop(&mut self, wait_for_exit: bool) {
        if self.running.swap(false, Ordering::AcqRel) {
            info!("Stopping navX poller");
        }

        if let Some(handle) = &self.handle {
            handle.thread().unpark();
        }

        if wait_for_exit {
            if let Some(handle) = self.handle.take() {
                if handle.join().is_err() {
                    warn!("navX poll thread panicked");
                }
            }
        }
    }

    /// Most recently published sample, or None before the first frame
    pub fn current(&self) -> Option<NavigationSample> {
        self.current.load().as_deref().copied()
    }

    pub fn state(&self) -> PollerState {
        if self.running.load(Ordering::Acquire) {
            PollerState::Running
        } else {
            PollerState::Stopped
        }
    }

    pub fn is_running(&self) -> bool {
        self.state() == PollerState::Running
    }

    /// Framing and transport counters accumulated by the poll thread
    pub fn stats(&self) -> FrameStats {
        self.counters.snapshot()
    }
}

impl Drop for NavigationPoller {
    fn drop(&mut self) {
        self.stop(true);
    }
}
