//! Mixing behavior across full submit/drain cycles

use pcmix_audio::{codec::samples, Gain, Mixer, PcmFormat};

fn le(values: &[i16]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_le_bytes()).collect()
}

fn be(values: &[i16]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_be_bytes()).collect()
}

fn drain(mixer: &mut Mixer) -> Vec<i32> {
    let mut out = vec![0u8; mixer.buffer_size()];
    let len = mixer.drain(&mut out).unwrap();
    samples(mixer.format(), &out[..len]).collect()
}

#[test]
fn test_single_source_round_trips() {
    let input = [0i16, 1, -1, 32767, -32768, 1234, -4321, 7];

    let mut mixer = Mixer::new(PcmFormat::s16le(), 64);
    let bytes = le(&input);
    mixer.submit(&bytes, None).unwrap();
    let mut out = vec![0u8; 64];
    let len = mixer.drain(&mut out).unwrap();
    assert_eq!(&out[..len], &bytes[..]);

    let mut mixer = Mixer::new(PcmFormat::from_bits(16, true).unwrap(), 64);
    let bytes = be(&input);
    mixer.submit(&bytes, Some(Gain::UNITY)).unwrap();
    let len = mixer.drain(&mut out).unwrap();
    assert_eq!(&out[..len], &bytes[..]);
}

#[test]
fn test_mixing_is_linear_in_range() {
    let a = [1000i16, -2000, 30000, -30000, 0, 5];
    let b = [-500i16, 2500, 2767, -2768, -32768, 6];

    let mut mixer = Mixer::new(PcmFormat::s16le(), 64);
    mixer.submit(&le(&a), None).unwrap();
    mixer.submit(&le(&b), None).unwrap();

    let expected: Vec<i32> = a.iter().zip(&b).map(|(x, y)| *x as i32 + *y as i32).collect();
    assert_eq!(drain(&mut mixer), expected);
}

#[test]
fn test_overflow_pins_peak() {
    let mut mixer = Mixer::new(PcmFormat::s16le(), 16);
    mixer.submit(&le(&[20000, -20000]), None).unwrap();
    mixer.submit(&le(&[20000, -20000]), None).unwrap();

    // 40000 * (32767 / 40000 as f32) lands a hair above 32767
    assert_eq!(drain(&mut mixer), vec![32767, -32767]);
}

#[test]
fn test_overflow_preserves_ratios() {
    let mut mixer = Mixer::new(PcmFormat::s16le(), 16);
    mixer.submit(&le(&[20000, 10000, -5000, 15000]), None).unwrap();
    mixer.submit(&le(&[20000, 10000, -5000, 15000]), None).unwrap();

    let out = drain(&mut mixer);
    assert_eq!(out[0], 32767);
    let scale = 32767.0 / 40000.0;
    for (got, sum) in out.iter().zip([40000.0, 20000.0, -10000.0, 30000.0]) {
        assert!((*got as f64 - sum * scale).abs() < 1.0, "{got} vs {sum}");
    }
}

#[test]
fn test_overflow_on_odd_peak() {
    let mut mixer = Mixer::new(PcmFormat::s16le(), 8);
    mixer.submit(&le(&[16500, 0]), None).unwrap();
    mixer.submit(&le(&[16500, 0]), None).unwrap();
    assert_eq!(drain(&mut mixer), vec![32767, 0]);
}

#[test]
fn test_sample_min_does_not_trigger_correction() {
    let mut mixer = Mixer::new(PcmFormat::s16le(), 8);
    mixer.submit(&le(&[-20000, 100]), None).unwrap();
    mixer.submit(&le(&[-12768, 0]), None).unwrap();
    assert_eq!(drain(&mut mixer), vec![-32768, 100]);
}

#[test]
fn test_below_sample_min_triggers_correction() {
    let mut mixer = Mixer::new(PcmFormat::s16le(), 8);
    mixer.submit(&le(&[-20000, 100]), None).unwrap();
    mixer.submit(&le(&[-12769, 0]), None).unwrap();
    // Peak 32768, scale 32767/32768: -32767.99 -> -32767, 99.99 -> 99
    assert_eq!(drain(&mut mixer), vec![-32767, 99]);
}

#[test]
fn test_big_endian_overflow() {
    let mut mixer = Mixer::new(PcmFormat::from_bits(16, true).unwrap(), 8);
    mixer.submit(&be(&[20000, -20000]), None).unwrap();
    mixer.submit(&be(&[20000, -20000]), None).unwrap();

    let mut out = [0u8; 8];
    let len = mixer.drain(&mut out).unwrap();
    assert_eq!(&out[..len], &be(&[32767, -32767])[..]);
}

#[test]
fn test_active_length_tracks_longest() {
    let mut mixer = Mixer::new(PcmFormat::s16le(), 32);
    mixer.submit(&le(&[1, 1]), None).unwrap();
    mixer.submit(&le(&[2, 2, 2, 2, 2, 2]), None).unwrap();
    mixer.submit(&le(&[3, 3, 3, 3]), None).unwrap();

    let mut out = vec![0u8; 32];
    assert_eq!(mixer.drain(&mut out).unwrap(), 12);
    assert_eq!(
        samples(&PcmFormat::s16le(), &out[..12]).collect::<Vec<_>>(),
        vec![6, 6, 5, 5, 2, 2]
    );
}

#[test]
fn test_drain_resets_cycle() {
    let mut mixer = Mixer::new(PcmFormat::s16le(), 16);
    mixer.submit(&le(&[30000, 30000, 30000, 30000]), None).unwrap();
    mixer.submit(&le(&[30000, 30000, 30000, 30000]), None).unwrap();
    drain(&mut mixer);

    assert_eq!(mixer.accumulator().active_len(), 0);
    assert!(mixer.accumulator().slots().iter().all(|s| *s == 0.0));

    mixer.submit(&le(&[1, -1]), None).unwrap();
    assert_eq!(drain(&mut mixer), vec![1, -1]);
}

#[test]
fn test_scaled_sources_sum() {
    let mut mixer = Mixer::new(PcmFormat::s16le(), 8);
    mixer
        .submit(&le(&[20000, 20000]), Some(Gain::stereo(0.5, 0.25)))
        .unwrap();
    mixer
        .submit(&le(&[20000, 20000]), Some(Gain::uniform(0.5)))
        .unwrap();
    assert_eq!(drain(&mut mixer), vec![20000, 15000]);
}

#[test]
fn test_unpaired_sample_uses_left_gain() {
    let mut mixer = Mixer::new(PcmFormat::s16le(), 8);
    mixer
        .submit(&le(&[1000, 1000, 1000]), Some(Gain::stereo(0.5, 0.25)))
        .unwrap();
    mixer.submit(&le(&[1, 1]), None).unwrap();
    assert_eq!(drain(&mut mixer), vec![501, 251, 500]);
}

#[test]
fn test_partial_sample_counts_toward_length_only() {
    let mut mixer = Mixer::new(PcmFormat::s16le(), 8);
    mixer.submit(&le(&[100]), None).unwrap();
    mixer.submit(&[0x05, 0x00, 0x77], None).unwrap();

    let mut out = [0xaau8; 8];
    assert_eq!(mixer.drain(&mut out).unwrap(), 3);
    assert_eq!(&out[..2], &le(&[105])[..]);
    assert_eq!(out[2], 0xaa);
}

#[test]
fn test_eight_bit_mixing() {
    let format = PcmFormat::from_bits(8, false).unwrap();
    let mut mixer = Mixer::new(format, 4);
    mixer.submit(&[100u8, (-100i8) as u8], None).unwrap();
    mixer.submit(&[100u8, (-50i8) as u8], None).unwrap();

    // Peak 200, scale 127/200: 126.99 -> 126, -95.25 -> -95
    assert_eq!(drain(&mut mixer), vec![126, -95]);
}

#[test]
fn test_process_volume_boundaries() {
    let mixer = Mixer::new(PcmFormat::s16le(), 16);
    let original = le(&[32767, -32768, 1234, -1]);

    let mut bytes = original.clone();
    mixer.process_volume(&mut bytes, Some(Gain::stereo(1.0, 1.0)));
    assert_eq!(bytes, original);

    mixer.process_volume(&mut bytes, None);
    assert_eq!(bytes, original);

    mixer.process_volume(&mut bytes, Some(Gain::stereo(0.0, 0.0)));
    assert_eq!(samples(mixer.format(), &bytes).collect::<Vec<_>>(), vec![0, 0, 0, 0]);
    assert_eq!(mixer.accumulator().active_len(), 0);
}
