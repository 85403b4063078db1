//! Output sinks
//!
//! The mixer never talks to an audio device directly. Mixed bytes are handed
//! to an [`AudioSink`], which owns whatever platform line sits behind it.

use pcmix_core::AudioError;

pub mod cpal_backend;
pub mod file;
pub mod null;

pub use cpal_backend::CpalSink;
pub use file::FileSink;
pub use null::NullSink;

/// Destination for mixed PCM bytes in the mixer's output format.
pub trait AudioSink {
    /// Open the line and begin playback
    fn start(&mut self) -> Result<(), AudioError>;
    /// Pause playback, dropping anything still queued
    fn stop(&mut self);
    /// Release the line. A closed sink is never available again.
    fn close(&mut self);
    /// Whether [`AudioSink::write`] can accept bytes right now
    fn is_available(&self) -> bool;
    /// Queue PCM bytes for output, returning how many were accepted.
    /// Fails with [`AudioError::SinkUnavailable`] when the sink is not ready.
    fn write(&mut self, bytes: &[u8]) -> Result<usize, AudioError>;
    /// Block until everything written so far has reached its destination
    fn finish(&mut self) -> Result<(), AudioError> {
        Ok(())
    }
}

impl<S: AudioSink + ?Sized> AudioSink for Box<S> {
    fn start(&mut self) -> Result<(), AudioError> {
        (**self).start()
    }

    fn stop(&mut self) {
        (**self).stop()
    }

    fn close(&mut self) {
        (**self).close()
    }

    fn is_available(&self) -> bool {
        (**self).is_available()
    }

    fn write(&mut self, bytes: &[u8]) -> Result<usize, AudioError> {
        (**self).write(bytes)
    }

    fn finish(&mut self) -> Result<(), AudioError> {
        (**self).finish()
    }
}
