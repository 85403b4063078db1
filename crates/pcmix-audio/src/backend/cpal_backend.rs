//! cpal output sink

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use parking_lot::Mutex;
use pcmix_core::{sink_debug, sink_warn, AudioError};

use super::AudioSink;
use crate::codec::samples;
use crate::format::PcmFormat;

/// Mixer buffers the queue may hold before `write` blocks
const QUEUED_BUFFERS: usize = 4;

/// Largest number of queued samples `write` leaves behind.
fn queue_limit(format: &PcmFormat, buffer_size: usize) -> usize {
    QUEUED_BUFFERS * (buffer_size / format.sample_bytes()).max(1)
}

/// Plays mixed PCM on the default output device.
///
/// Written bytes are decoded to f32 and queued; the device callback drains
/// the queue and pads with silence when it runs dry. `write` blocks while more
/// than a few mixer buffers are queued. If no device or stream can be opened
/// the sink stays unavailable instead of failing construction.
pub struct CpalSink {
    format: PcmFormat,
    device: Option<cpal::Device>,
    config: cpal::StreamConfig,
    stream: Option<cpal::Stream>,
    queue: Arc<Mutex<VecDeque<f32>>>,
    queue_limit: usize,
    failed: Arc<AtomicBool>,
    playing: bool,
}

impl CpalSink {
    /// `buffer_size` is the mixer's buffer capacity in bytes.
    pub fn new(format: PcmFormat, sample_rate: u32, buffer_size: usize) -> Self {
        let host = cpal::default_host();
        let device = host.default_output_device();
        if device.is_none() {
            sink_warn!("No default output device");
        }

        Self {
            format,
            device,
            config: cpal::StreamConfig {
                channels: format.channels(),
                sample_rate: cpal::SampleRate(sample_rate),
                buffer_size: cpal::BufferSize::Default,
            },
            stream: None,
            queue: Arc::new(Mutex::new(VecDeque::new())),
            queue_limit: queue_limit(&format, buffer_size),
            failed: Arc::new(AtomicBool::new(false)),
            playing: false,
        }
    }

    /// Samples written but not yet consumed by the device
    pub fn pending_samples(&self) -> usize {
        self.queue.lock().len()
    }

    /// Sleep until at most `limit` samples are queued.
    fn wait_for_queue(&self, limit: usize) -> Result<(), AudioError> {
        while self.pending_samples() > limit {
            if !self.is_available() {
                return Err(AudioError::SinkUnavailable(
                    "output device stopped with audio queued".into(),
                ));
            }
            thread::sleep(Duration::from_millis(10));
        }
        Ok(())
    }

    fn build_stream(&self) -> Result<cpal::Stream, AudioError> {
        let device = self
            .device
            .as_ref()
            .ok_or_else(|| AudioError::Device("no output device".into()))?;

        let queue = Arc::clone(&self.queue);
        let failed = Arc::clone(&self.failed);
        device
            .build_output_stream(
                &self.config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    let mut queue = queue.lock();
                    for out in data.iter_mut() {
                        *out = queue.pop_front().unwrap_or(0.0);
                    }
                },
                move |err| {
                    sink_warn!("Output stream error: {}", err);
                    failed.store(true, Ordering::Release);
                },
                None,
            )
            .map_err(|e| AudioError::Device(e.to_string()))
    }
}

impl AudioSink for CpalSink {
    fn start(&mut self) -> Result<(), AudioError> {
        if self.stream.is_none() {
            self.stream = Some(self.build_stream()?);
            sink_debug!(
                "Opened output stream: {} Hz, {} channels",
                self.config.sample_rate.0,
                self.config.channels
            );
        }
        if let Some(stream) = &self.stream {
            stream
                .play()
                .map_err(|e| AudioError::Device(e.to_string()))?;
        }
        self.playing = true;
        Ok(())
    }

    fn stop(&mut self) {
        if let Some(stream) = &self.stream {
            if let Err(e) = stream.pause() {
                sink_warn!("Failed to pause output stream: {}", e);
            }
        }
        self.playing = false;
        self.queue.lock().clear();
    }

    fn close(&mut self) {
        self.stop();
        self.stream = None;
        self.device = None;
    }

    fn is_available(&self) -> bool {
        self.playing && self.stream.is_some() && !self.failed.load(Ordering::Acquire)
    }

    fn write(&mut self, bytes: &[u8]) -> Result<usize, AudioError> {
        if !self.is_available() {
            return Err(AudioError::SinkUnavailable(
                "output device is not playing".into(),
            ));
        }
        self.wait_for_queue(self.queue_limit)?;
        let full_scale = -(self.format.sample_min() as f32);
        let mut queue = self.queue.lock();
        queue.extend(samples(&self.format, bytes).map(|s| s as f32 / full_scale));
        Ok(bytes.len())
    }

    fn finish(&mut self) -> Result<(), AudioError> {
        self.wait_for_queue(0)
    }
}
