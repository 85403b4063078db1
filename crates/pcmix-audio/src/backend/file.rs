//! Raw PCM file sink

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use pcmix_core::{sink_warn, AudioError};

use super::AudioSink;

/// Appends mixed bytes, headerless, to a file. The file is created on start.
pub struct FileSink {
    path: PathBuf,
    writer: Option<BufWriter<File>>,
}

impl FileSink {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            writer: None,
        }
    }
}

impl AudioSink for FileSink {
    fn start(&mut self) -> Result<(), AudioError> {
        if self.writer.is_none() {
            self.writer = Some(BufWriter::new(File::create(&self.path)?));
        }
        Ok(())
    }

    fn stop(&mut self) {
        if let Some(writer) = self.writer.as_mut() {
            if let Err(e) = writer.flush() {
                sink_warn!("Failed to flush {}: {}", self.path.display(), e);
            }
        }
    }

    fn close(&mut self) {
        self.stop();
        self.writer = None;
    }

    fn is_available(&self) -> bool {
        self.writer.is_some()
    }

    fn write(&mut self, bytes: &[u8]) -> Result<usize, AudioError> {
        let writer = self.writer.as_mut().ok_or_else(|| {
            AudioError::SinkUnavailable(format!("{} is not open", self.path.display()))
        })?;
        writer.write_all(bytes)?;
        Ok(bytes.len())
    }

    fn finish(&mut self) -> Result<(), AudioError> {
        if let Some(writer) = self.writer.as_mut() {
            writer.flush()?;
        }
        Ok(())
    }
}
