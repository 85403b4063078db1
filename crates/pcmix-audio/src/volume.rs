//! Per-channel gain and the in-place volume processor

use crate::codec::{decode_sample, encode_sample};
use crate::format::PcmFormat;

/// Left/right gain applied to interleaved samples. Even sample indices are
/// the left channel, odd indices the right.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gain {
    pub left: f32,
    pub right: f32,
}

impl Gain {
    pub const UNITY: Gain = Gain {
        left: 1.0,
        right: 1.0,
    };

    /// Separate left and right gain, each clamped to [0.0, 1.0].
    pub fn stereo(left: f32, right: f32) -> Self {
        Self {
            left: left.clamp(0.0, 1.0),
            right: right.clamp(0.0, 1.0),
        }
    }

    /// Same gain on both channels.
    pub fn uniform(volume: f32) -> Self {
        Self::stereo(volume, volume)
    }

    /// True when neither channel attenuates.
    pub fn is_unity(&self) -> bool {
        self.left >= 1.0 && self.right >= 1.0
    }

    /// Gain for the sample at interleaved index `i`.
    #[inline]
    pub fn for_index(&self, i: usize) -> f32 {
        if i % 2 == 0 {
            self.left
        } else {
            self.right
        }
    }
}

impl Default for Gain {
    fn default() -> Self {
        Self::UNITY
    }
}

/// Scale the samples of `bytes` in place and hand the same buffer back.
///
/// Nothing is accumulated and no overflow correction is applied; gains are at
/// most 1.0 so an in-range buffer stays in range. Scaled values are truncated
/// toward zero.
pub fn apply_volume<'a>(format: &PcmFormat, bytes: &'a mut [u8], gain: Gain) -> &'a mut [u8] {
    if gain.is_unity() {
        return bytes;
    }

    for (i, chunk) in bytes.chunks_exact_mut(format.sample_bytes()).enumerate() {
        let sample = decode_sample(format, chunk);
        encode_sample(format, chunk, 0, (sample as f32 * gain.for_index(i)) as i32);
    }
    bytes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s16(values: &[i16]) -> Vec<u8> {
        values.iter().flat_map(|v| v.to_le_bytes()).collect()
    }

    use crate::codec::samples;

    fn decode(bytes: &[u8]) -> Vec<i32> {
        samples(&PcmFormat::s16le(), bytes).collect()
    }

    #[test]
    fn gain_is_clamped() {
        let gain = Gain::stereo(1.5, -0.25);
        assert_eq!(gain, Gain::stereo(1.0, 0.0));
        assert!(Gain::uniform(2.0).is_unity());
        assert!(!Gain::stereo(1.0, 0.99).is_unity());
    }

    #[test]
    fn unity_is_passthrough() {
        let original = s16(&[1234, -4321, 32767, -32768]);
        let mut bytes = original.clone();
        apply_volume(&PcmFormat::s16le(), &mut bytes, Gain::UNITY);
        assert_eq!(bytes, original);
    }

    #[test]
    fn zero_gain_silences() {
        let mut bytes = s16(&[1234, -4321, 32767, -32768]);
        apply_volume(&PcmFormat::s16le(), &mut bytes, Gain::uniform(0.0));
        assert!(bytes.iter().all(|b| *b == 0));
    }

    #[test]
    fn channels_scale_independently() {
        let mut bytes = s16(&[20000, -20000, 12345, -7]);
        apply_volume(&PcmFormat::s16le(), &mut bytes, Gain::stereo(0.5, 0.3));
        // 6172.5 and -2.1 truncate toward zero
        assert_eq!(decode(&bytes), vec![10000, -6000, 6172, -2]);
    }

    #[test]
    fn trailing_partial_sample_is_untouched() {
        let mut bytes = s16(&[1000, 1000, 1000]);
        bytes.push(0x7f);
        apply_volume(&PcmFormat::s16le(), &mut bytes, Gain::stereo(0.5, 0.25));
        // The unpaired third sample is a left sample
        assert_eq!(decode(&bytes[..6]), vec![500, 250, 500]);
        assert_eq!(bytes[6], 0x7f);
    }

    #[test]
    fn big_endian_round_trips_through_scaling() {
        let format = PcmFormat::from_bits(16, true).unwrap();
        let mut bytes: Vec<u8> = [1000i16, -1000]
            .iter()
            .flat_map(|v| v.to_be_bytes())
            .collect();
        apply_volume(&format, &mut bytes, Gain::uniform(0.5));
        let decoded: Vec<i32> = samples(&format, &bytes).collect();
        assert_eq!(decoded, vec![500, -500]);
    }
}
