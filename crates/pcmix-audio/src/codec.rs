//! Byte <-> sample conversion for signed linear PCM

use crate::format::{ByteOrder, PcmFormat, SampleWidth};

/// Decode the sample at the start of `chunk`.
#[inline]
pub fn decode_sample(format: &PcmFormat, chunk: &[u8]) -> i32 {
    match (format.width(), format.byte_order()) {
        (SampleWidth::Bits8, _) => chunk[0] as i8 as i32,
        (SampleWidth::Bits16, ByteOrder::Little) => i16::from_le_bytes([chunk[0], chunk[1]]) as i32,
        (SampleWidth::Bits16, ByteOrder::Big) => i16::from_be_bytes([chunk[0], chunk[1]]) as i32,
    }
}

/// Decode every whole sample in `bytes`. A trailing partial sample is ignored.
pub fn samples<'a>(format: &PcmFormat, bytes: &'a [u8]) -> impl Iterator<Item = i32> + 'a {
    let format = *format;
    bytes
        .chunks_exact(format.sample_bytes())
        .map(move |chunk| decode_sample(&format, chunk))
}

/// Write `value` into the sample slot starting at byte `pos`. Only the low
/// bits that fit the sample width are kept.
#[inline]
pub fn encode_sample(format: &PcmFormat, out: &mut [u8], pos: usize, value: i32) {
    match format.width() {
        SampleWidth::Bits8 => out[pos] = (value & 0xff) as u8,
        SampleWidth::Bits16 => {
            let [first, second] = format.shift();
            out[pos] = ((value >> first) & 0xff) as u8;
            out[pos + 1] = ((value >> second) & 0xff) as u8;
        }
    }
}

/// Serialize accumulator slots, truncating each toward zero.
pub fn encode_slots(format: &PcmFormat, slots: &[f64], out: &mut [u8]) {
    let step = format.sample_bytes();
    for (i, slot) in slots.iter().enumerate() {
        encode_sample(format, out, i * step, *slot as i32);
    }
}
