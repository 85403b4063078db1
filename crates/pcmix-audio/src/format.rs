//! PCM output format descriptor

use pcmix_core::config::AudioConfig;
use pcmix_core::AudioError;

/// Bytes per sample
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleWidth {
    Bits8,
    Bits16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    Little,
    Big,
}

/// Signed linear PCM format shared by the mixer, the volume processor and
/// the sinks. Fixed for the lifetime of a mixer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PcmFormat {
    width: SampleWidth,
    order: ByteOrder,
    channels: u16,
}

impl PcmFormat {
    /// Stereo format with the given width and byte order.
    pub fn new(width: SampleWidth, order: ByteOrder) -> Self {
        Self {
            width,
            order,
            channels: 2,
        }
    }

    /// Signed 16-bit little-endian stereo.
    pub fn s16le() -> Self {
        Self::new(SampleWidth::Bits16, ByteOrder::Little)
    }

    pub fn from_bits(bits: u16, big_endian: bool) -> Result<Self, AudioError> {
        let width = match bits {
            8 => SampleWidth::Bits8,
            16 => SampleWidth::Bits16,
            other => return Err(AudioError::UnsupportedSampleWidth(other)),
        };
        let order = if big_endian {
            ByteOrder::Big
        } else {
            ByteOrder::Little
        };
        Ok(Self::new(width, order))
    }

    pub fn from_config(config: &AudioConfig) -> Result<Self, AudioError> {
        Self::from_bits(config.sample_bits, config.big_endian)?.with_channels(config.channels)
    }

    /// Set the interleaved channel count (1 or 2).
    pub fn with_channels(mut self, channels: u16) -> Result<Self, AudioError> {
        if !(1..=2).contains(&channels) {
            return Err(AudioError::UnsupportedChannels(channels));
        }
        self.channels = channels;
        Ok(self)
    }

    pub fn width(&self) -> SampleWidth {
        self.width
    }

    pub fn byte_order(&self) -> ByteOrder {
        self.order
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    pub fn sample_bytes(&self) -> usize {
        match self.width {
            SampleWidth::Bits8 => 1,
            SampleWidth::Bits16 => 2,
        }
    }

    pub fn sample_bits(&self) -> u16 {
        self.sample_bytes() as u16 * 8
    }

    /// Bytes in one interleaved frame
    pub fn frame_bytes(&self) -> usize {
        self.sample_bytes() * self.channels as usize
    }

    pub fn sample_max(&self) -> i32 {
        match self.width {
            SampleWidth::Bits8 => i8::MAX as i32,
            SampleWidth::Bits16 => i16::MAX as i32,
        }
    }

    pub fn sample_min(&self) -> i32 {
        match self.width {
            SampleWidth::Bits8 => i8::MIN as i32,
            SampleWidth::Bits16 => i16::MIN as i32,
        }
    }

    /// Right shifts producing the first and second output byte of a sample.
    pub fn shift(&self) -> [u32; 2] {
        match self.order {
            ByteOrder::Little => [0, 8],
            ByteOrder::Big => [8, 0],
        }
    }
}

impl Default for PcmFormat {
    fn default() -> Self {
        Self::s16le()
    }
}
