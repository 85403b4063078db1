//! Overflow detection and correction for the accumulation buffer

use crate::format::PcmFormat;

/// Effective peak magnitude of `slots`.
///
/// Starts from the format's own range, so an in-range buffer reports
/// `sample_max`. A negative excursion counts one less than its magnitude:
/// `sample_min` itself maps to `sample_max` and does not overflow.
pub fn check_level(format: &PcmFormat, slots: &[f64]) -> f64 {
    let mut xmax = format.sample_max() as f64;
    let mut xmin = format.sample_min() as f64;
    for &value in slots {
        if value > xmax {
            xmax = value;
        } else if value < xmin {
            xmin = value;
        }
    }
    if xmin.abs() - 1.0 > xmax {
        xmax = xmin.abs() - 1.0;
    }
    xmax
}

/// Whether a peak from [`check_level`] needs correcting.
pub fn overflows(format: &PcmFormat, peak: f64) -> bool {
    peak > format.sample_max() as f64
}

/// Rescale every slot by `sample_max / peak` and return the factor used.
///
/// The factor is rounded to single precision before it is applied, which
/// keeps output identical to the reference mixer. No slot is clamped.
pub fn correct_level(format: &PcmFormat, slots: &mut [f64], peak: f64) -> f32 {
    let scale = (format.sample_max() as f64 / peak) as f32;
    for slot in slots.iter_mut() {
        *slot *= scale as f64;
    }
    scale
}
