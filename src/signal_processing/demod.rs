//! Heterodyne and phase demodulation.

use super::signal::{Sample, SignalBuffer};
use num_complex::Complex64;
use std::f64::consts::PI;

/// Shift `carrier_hz` down to 0 Hz
///
/// Multiplies sample n by `exp(-i·2π·carrier/rate·n)`. The result is always
/// complex. Rate and delay are unchanged; a negative carrier shifts up, so
/// shifting by `-carrier_hz` undoes a previous shift.
pub fn shift_to_baseband<T: Sample>(buffer: &SignalBuffer<T>, carrier_hz: f64) -> SignalBuffer<Complex64> {
    let omega = -2.0 * PI * carrier_hz / buffer.rate() as f64;
    let samples = buffer
        .samples()
        .iter()
        .enumerate()
        .map(|(n, &sample)| {
            let sample: Complex64 = sample.into();
            sample * Complex64::from_polar(1.0, omega * n as f64)
        })
        .collect();

    SignalBuffer::from_parts(samples, buffer.rate(), buffer.delay())
}

/// Unwrapped argument of each complex sample
///
/// For a baseband FM/PM signal this is the modulating phase. Rate and delay
/// are unchanged.
pub fn instantaneous_phase(buffer: &SignalBuffer<Complex64>) -> SignalBuffer<f64> {
    let wrapped: Vec<f64> = buffer.samples().iter().map(|s| s.arg()).collect();
    SignalBuffer::from_parts(unwrap_phase(&wrapped), buffer.rate(), buffer.delay())
}

/// Remove 2π discontinuities from a phase sequence
///
/// Each sample-to-sample step is brought into (-π, π] by adding a multiple of
/// 2π, and the corrected steps are accumulated from the first sample.
pub fn unwrap_phase(phases: &[f64]) -> Vec<f64> {
    let Some(&first) = phases.first() else {
        return vec![];
    };

    let mut out = Vec::with_capacity(phases.len());
    out.push(first);
    let mut correction = 0.0;
    for pair in phases.windows(2) {
        let step = pair[1] - pair[0];
        if step > PI || step <= -PI {
            let wrapped = step - 2.0 * PI * ((step + PI) / (2.0 * PI)).ceil() + 2.0 * PI;
            correction += wrapped - step;
        }
        out.push(pair[1] + correction);
    }
    out
}
