//! Byte transport consumed by the frame buffer.
//!
//! The decoder never opens or enumerates devices. It only needs to know how
//! many bytes are waiting and to read them without blocking.

use std::collections::VecDeque;
use std::io;
use std::sync::{Arc, Mutex, MutexGuard};

/// Non-blocking byte source.
pub trait Transport {
    /// Number of bytes that can be read right now
    fn bytes_available(&mut self) -> io::Result<usize>;

    /// Read up to `max_bytes` bytes that are immediately available.
    ///
    /// May return fewer bytes than requested, including none.
    fn read(&mut self, max_bytes: usize) -> io::Result<Vec<u8>>;
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn bytes_available(&mut self) -> io::Result<usize> {
        (**self).bytes_available()
    }

    fn read(&mut self, max_bytes: usize) -> io::Result<Vec<u8>> {
        (**self).read(max_bytes)
    }
}

#[derive(Debug, Default)]
struct MockState {
    pending: VecDeque<u8>,
    reads: usize,
    fail_next_read: bool,
    closed: bool,
}

/// In-memory transport for tests and simulated devices.
///
/// Clones share the same queue, so one handle can be moved into a poller
/// while another keeps feeding bytes.
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    state: Arc<Mutex<MockState>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Transport with `bytes` already waiting
    pub fn with_bytes(bytes: &[u8]) -> Self {
        let transport = Self::new();
        transport.push(bytes);
        transport
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        // Poisoning is ignored: the queue stays usable after a panic elsewhere
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Make `bytes` available to the reader
    pub fn push(&self, bytes: &[u8]) {
        self.lock().pending.extend(bytes.iter().copied());
    }

    /// Bytes waiting to be read
    pub fn pending(&self) -> usize {
        self.lock().pending.len()
    }

    /// Number of `read` calls issued so far
    pub fn reads(&self) -> usize {
        self.lock().reads
    }

    /// Make the next `read` fail with an I/O error
    pub fn fail_next_read(&self) {
        self.lock().fail_next_read = true;
    }

    /// Whether the reading side has been dropped
    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    /// Mark the reading side as released; used by [`MockReader`]
    fn close(&self) {
        self.lock().closed = true;
    }

    /// Reader handle that records its release when dropped
    pub fn reader(&self) -> MockReader {
        MockReader {
            inner: self.clone(),
        }
    }
}

impl Transport for MockTransport {
    fn bytes_available(&mut self) -> io::Result<usize> {
        Ok(self.lock().pending.len())
    }

    fn read(&mut self, max_bytes: usize) -> io::Result<Vec<u8>> {
        let mut state = self.lock();
        state.reads += 1;
        if state.fail_next_read {
            state.fail_next_read = false;
            return Err(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "mock transport read failure",
            ));
        }
        let n = max_bytes.min(state.pending.len());
        Ok(state.pending.drain(..n).collect())
    }
}

/// Exclusive reading end of a [`MockTransport`].
///
/// Dropping it marks the transport closed, which lets tests observe when the
/// owner of the transport released it.
#[derive(Debug)]
pub struct MockReader {
    inner: MockTransport,
}

impl Transport for MockReader {
    fn bytes_available(&mut self) -> io::Result<usize> {
        self.inner.bytes_available()
    }

    fn read(&mut self, max_bytes: usize) -> io::Result<Vec<u8>> {
        self.inner.read(max_bytes)
    }
}

impl Drop for MockReader {
    fn drop(&mut self) {
        self.inner.close();
    }
}

#[cfg(feature = "serial")]
pub use serial::SerialTransport;

#[cfg(feature = "serial")]
mod serial {
    use std::io::{self, Read};
    use std::time::Duration;

    use serialport::SerialPort;
    use tracing::info;

    use super::Transport;
    use crate::config::SerialConfig;
    use crate::error::Result;

    /// Serial port transport for a device at a known path.
    pub struct SerialTransport {
        port: Box<dyn SerialPort>,
    }

    impl SerialTransport {
        /// Open the port named in `config`.
        ///
        /// # Errors
        /// Returns [`NavxError::Serial`](crate::NavxError::Serial) if the port cannot be opened.
        pub fn open(config: &SerialConfig) -> Result<Self> {
            let port = serialport::new(&config.path, config.baud_rate)
                .timeout(Duration::from_millis(config.read_timeout_ms))
                .open()?;
            info!("Opened {} at {} baud", config.path, config.baud_rate);
            Ok(Self { port })
        }

        /// Wrap an already opened port
        pub fn from_port(port: Box<dyn SerialPort>) -> Self {
            Self { port }
        }
    }

    impl Transport for SerialTransport {
        fn bytes_available(&mut self) -> io::Result<usize> {
            Ok(self.port.bytes_to_read()? as usize)
        }

        fn read(&mut self, max_bytes: usize) -> io::Result<Vec<u8>> {
            let mut buf = vec![0u8; max_bytes];
            let n = match self.port.read(&mut buf) {
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::TimedOut => 0,
                Err(e) => return Err(e),
            };
            buf.truncate(n);
            Ok(buf)
        }
    }

}
