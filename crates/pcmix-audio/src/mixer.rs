//! Accumulating PCM mixer
//!
//! Sources submit raw PCM byte buffers during a cycle. Each submission is
//! decoded and added, optionally scaled per channel, into a shared
//! floating-point accumulator. Draining the cycle pulls the summed level back
//! into range with a single uniform rescale, serializes the result to the
//! output format and zeroes the accumulator for the next cycle.

use pcmix_core::{mixer_debug, mixer_trace, AudioError};

use crate::codec::{encode_slots, samples};
use crate::format::PcmFormat;
use crate::level::{check_level, correct_level, overflows};
use crate::volume::{apply_volume, Gain};

/// Summed contributions of the current cycle.
///
/// Slots inside the active region hold only what was submitted since the last
/// reset. Slots past it are never read.
#[derive(Debug, Clone)]
pub struct Accumulator {
    slots: Vec<f64>,
    active_len: usize,
}

impl Accumulator {
    fn new(slot_count: usize) -> Self {
        Self {
            slots: vec![0.0; slot_count],
            active_len: 0,
        }
    }

    /// Bytes covered by the current cycle.
    pub fn active_len(&self) -> usize {
        self.active_len
    }

    /// Every slot, active or not.
    pub fn slots(&self) -> &[f64] {
        &self.slots
    }

    fn add(&mut self, format: &PcmFormat, bytes: &[u8], gain: Gain) {
        if gain.is_unity() {
            for (slot, sample) in self.slots.iter_mut().zip(samples(format, bytes)) {
                *slot += sample as f64;
            }
        } else {
            let pairs = self.slots.iter_mut().zip(samples(format, bytes));
            for (i, (slot, sample)) in pairs.enumerate() {
                *slot += (sample as f32 * gain.for_index(i)) as f64;
            }
        }
        self.active_len = self.active_len.max(bytes.len());
    }

    fn reset(&mut self, sample_bytes: usize) {
        let count = self.active_len / sample_bytes;
        self.slots[..count].fill(0.0);
        self.active_len = 0;
    }
}

/// Mixer bound to one output format and buffer capacity.
pub struct Mixer {
    format: PcmFormat,
    capacity: usize,
    accumulator: Accumulator,
}

impl Mixer {
    /// Create a mixer whose cycles hold at most `capacity` bytes.
    pub fn new(format: PcmFormat, capacity: usize) -> Self {
        Self {
            format,
            capacity,
            accumulator: Accumulator::new(capacity / format.sample_bytes()),
        }
    }

    pub fn format(&self) -> &PcmFormat {
        &self.format
    }

    /// Capacity in bytes
    pub fn buffer_size(&self) -> usize {
        self.capacity
    }

    pub fn accumulator(&self) -> &Accumulator {
        &self.accumulator
    }

    /// Add one source's PCM bytes to the current cycle.
    ///
    /// `gain` defaults to unity, which sums samples exactly. The cycle length
    /// grows to the longest submission.
    pub fn submit(&mut self, bytes: &[u8], gain: Option<Gain>) -> Result<(), AudioError> {
        if bytes.len() > self.capacity {
            return Err(AudioError::BufferOverrun {
                len: bytes.len(),
                capacity: self.capacity,
            });
        }
        let gain = gain.unwrap_or_default();
        mixer_trace!("submit {} bytes, gain {:?}", bytes.len(), gain);
        self.accumulator.add(&self.format, bytes, gain);
        Ok(())
    }

    /// Close the cycle: correct overflow, serialize into `out` and reset.
    ///
    /// Returns the cycle's byte length. `out` must hold at least that many
    /// bytes; otherwise the cycle is left intact. Only whole samples are
    /// serialized: when the longest submission ended in a partial sample, the
    /// last `len % sample_bytes` bytes of `out[..len]` are left as they were.
    pub fn drain(&mut self, out: &mut [u8]) -> Result<usize, AudioError> {
        let len = self.accumulator.active_len;
        if out.len() < len {
            return Err(AudioError::OutputTooSmall {
                needed: len,
                available: out.len(),
            });
        }

        let sample_bytes = self.format.sample_bytes();
        let count = len / sample_bytes;
        let slots = &mut self.accumulator.slots[..count];

        let peak = check_level(&self.format, slots);
        if overflows(&self.format, peak) {
            let scale = correct_level(&self.format, slots, peak);
            mixer_debug!("Overflow peak {} corrected with scale {}", peak, scale);
        }
        encode_slots(&self.format, slots, &mut out[..count * sample_bytes]);

        self.accumulator.reset(sample_bytes);
        Ok(len)
    }

    /// Start a cycle that holds the mixer exclusively until drained.
    pub fn cycle(&mut self) -> MixCycle<'_> {
        MixCycle { mixer: self }
    }

    /// Scale `bytes` in place without touching the accumulator.
    pub fn process_volume<'a>(&self, bytes: &'a mut [u8], gain: Option<Gain>) -> &'a mut [u8] {
        apply_volume(&self.format, bytes, gain.unwrap_or_default())
    }
}

/// One mixing cycle. Consumed by [`MixCycle::drain`].
pub struct MixCycle<'a> {
    mixer: &'a mut Mixer,
}

impl MixCycle<'_> {
    pub fn submit(&mut self, bytes: &[u8], gain: Option<Gain>) -> Result<(), AudioError> {
        self.mixer.submit(bytes, gain)
    }

    pub fn active_len(&self) -> usize {
        self.mixer.accumulator.active_len()
    }

    pub fn drain(self, out: &mut [u8]) -> Result<usize, AudioError> {
        self.mixer.drain(out)
    }
}
