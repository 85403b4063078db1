//! Null sink

use pcmix_core::AudioError;

use super::AudioSink;

/// Sink that discards audio but remembers what it was given.
#[derive(Debug, Default)]
pub struct NullSink {
    started: bool,
    closed: bool,
    last_write: Option<Vec<u8>>,
    bytes_written: usize,
}

impl NullSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the last bytes that were written (useful for tests)
    pub fn last_write(&self) -> Option<&[u8]> {
        self.last_write.as_deref()
    }

    pub fn bytes_written(&self) -> usize {
        self.bytes_written
    }
}

impl AudioSink for NullSink {
    fn start(&mut self) -> Result<(), AudioError> {
        if self.closed {
            return Err(AudioError::SinkUnavailable("null sink is closed".into()));
        }
        self.started = true;
        Ok(())
    }

    fn stop(&mut self) {
        self.started = false;
        self.last_write = None;
    }

    fn close(&mut self) {
        self.stop();
        self.closed = true;
    }

    fn is_available(&self) -> bool {
        self.started && !self.closed
    }

    fn write(&mut self, bytes: &[u8]) -> Result<usize, AudioError> {
        if !self.is_available() {
            return Err(AudioError::SinkUnavailable("null sink not started".into()));
        }
        self.last_write = Some(bytes.to_vec());
        self.bytes_written += bytes.len();
        Ok(bytes.len())
    }
}
