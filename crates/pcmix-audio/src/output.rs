//! Output driver: runs mixing cycles and forwards the result to a sink.

use pcmix_core::{mixer_debug, sink_warn, AudioError};

use crate::{
    backend::{AudioSink, NullSink},
    mixer::Mixer,
    volume::Gain,
};

/// Output driver state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputState {
    Stopped,
    Running,
    Closed,
}

/// One source's contribution to a cycle.
#[derive(Debug, Clone, Copy)]
pub struct Source<'a> {
    pub bytes: &'a [u8],
    pub gain: Option<Gain>,
}

impl<'a> Source<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, gain: None }
    }

    pub fn with_gain(bytes: &'a [u8], gain: Gain) -> Self {
        Self {
            bytes,
            gain: Some(gain),
        }
    }
}

/// Owns a mixer and the sink its output goes to.
pub struct OutputDriver<S: AudioSink> {
    state: OutputState,
    mixer: Mixer,
    sink: S,
    scratch: Vec<u8>,
}

impl<S: AudioSink> OutputDriver<S> {
    pub fn with_sink(mixer: Mixer, sink: S) -> Self {
        let scratch = vec![0u8; mixer.buffer_size()];
        Self {
            state: OutputState::Stopped,
            mixer,
            sink,
            scratch,
        }
    }

    pub fn start(&mut self) -> Result<(), AudioError> {
        if self.state == OutputState::Closed {
            return Err(AudioError::SinkUnavailable("output is closed".into()));
        }
        self.sink.start()?;
        self.state = OutputState::Running;
        Ok(())
    }

    pub fn stop(&mut self) {
        if self.state == OutputState::Running {
            self.sink.stop();
            self.state = OutputState::Stopped;
        }
    }

    /// Wait for the sink to play or persist everything written.
    pub fn finish(&mut self) -> Result<(), AudioError> {
        self.sink.finish()
    }

    pub fn close(&mut self) {
        self.sink.close();
        self.state = OutputState::Closed;
    }

    pub fn state(&self) -> OutputState {
        self.state
    }

    pub fn mixer(&self) -> &Mixer {
        &self.mixer
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Mix `sources` and write the result to the sink.
    ///
    /// A lone source skips the accumulator and only has its volume applied.
    /// The written length is cut down to whole frames. Returns the number of
    /// bytes written.
    pub fn play(&mut self, sources: &[Source<'_>]) -> Result<usize, AudioError> {
        if !self.sink.is_available() {
            return Err(AudioError::SinkUnavailable(format!(
                "sink not ready (output {:?})",
                self.state
            )));
        }

        let capacity = self.mixer.buffer_size();
        if let Some(source) = sources.iter().find(|s| s.bytes.len() > capacity) {
            return Err(AudioError::BufferOverrun {
                len: source.bytes.len(),
                capacity,
            });
        }

        let len = match sources {
            [] => return Ok(0),
            [single] => {
                let len = single.bytes.len();
                self.scratch[..len].copy_from_slice(single.bytes);
                self.mixer.process_volume(&mut self.scratch[..len], single.gain);
                len
            }
            many => {
                let mut cycle = self.mixer.cycle();
                for source in many {
                    cycle.submit(source.bytes, source.gain)?;
                }
                cycle.drain(&mut self.scratch)?
            }
        };

        let frame = self.mixer.format().frame_bytes();
        let whole = len - len % frame;
        if whole != len {
            mixer_debug!("Dropping {} bytes of partial frame", len - whole);
        }
        if whole == 0 {
            return Ok(0);
        }

        self.sink.write(&self.scratch[..whole]).map_err(|e| {
            sink_warn!("Sink write failed: {}", e);
            e
        })
    }
}

impl OutputDriver<NullSink> {
    /// Driver writing into a [`NullSink`].
    pub fn new(mixer: Mixer) -> Self {
        Self::with_sink(mixer, NullSink::new())
    }
}
