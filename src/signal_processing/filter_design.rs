//! Kaiser-window FIR filter design.
//!
//! Filters are specified by transition width and stopband attenuation. The
//! Kaiser order estimate turns those into a tap count and window shape, and
//! the taps are the ideal (windowed-sinc) lowpass or bandpass response.
//! Tap counts are always odd so the group delay is a whole number of samples.

use crate::constants::{BESSEL_EPSILON, KAISER_LINEAR_LIMIT_DB, KAISER_RECTANGULAR_LIMIT_DB};
use crate::error::{Result, VorError};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Pass band of a filter
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FilterBand {
    /// Pass everything below `cutoff_hz`
    Lowpass { cutoff_hz: f64 },
    /// Pass everything between `low_hz` and `high_hz`
    Bandpass { low_hz: f64, high_hz: f64 },
}

/// Declarative FIR filter specification
///
/// # Example
/// ```
/// use vordecoder::signal_processing::FilterSpec;
///
/// let spec = FilterSpec::lowpass(500.0, 60.0, 500.0);
/// let taps = spec.design(48000).unwrap();
/// assert_eq!(taps.num_taps() % 2, 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FilterSpec {
    /// Transition band width in Hz
    pub width_hz: f64,
    /// Stopband attenuation in positive dB
    pub attenuation_db: f64,
    #[serde(flatten)]
    pub band: FilterBand,
}

impl FilterSpec {
    pub fn lowpass(width_hz: f64, attenuation_db: f64, cutoff_hz: f64) -> Self {
        Self {
            width_hz,
            attenuation_db,
            band: FilterBand::Lowpass { cutoff_hz },
        }
    }

    pub fn bandpass(width_hz: f64, attenuation_db: f64, low_hz: f64, high_hz: f64) -> Self {
        Self {
            width_hz,
            attenuation_db,
            band: FilterBand::Bandpass { low_hz, high_hz },
        }
    }

    /// Check the filter against the rate it will run at
    ///
    /// # Errors
    /// Returns `VorError::InvalidSpec` if attenuation or width is not positive,
    /// the width reaches Nyquist, or a cutoff lies outside (0, Nyquist)
    pub fn validate(&self, rate: u32) -> Result<()> {
        if rate == 0 {
            return Err(VorError::InvalidSpec(
                "sample rate must be positive".to_string(),
            ));
        }
        let nyquist = rate as f64 / 2.0;

        if self.attenuation_db <= 0.0 || !self.attenuation_db.is_finite() {
            return Err(VorError::InvalidSpec(format!(
                "attenuation must be positive, got {} dB",
                self.attenuation_db
            )));
        }
        if self.width_hz.is_nan() || self.width_hz <= 0.0 || self.width_hz >= nyquist {
            return Err(VorError::InvalidSpec(format!(
                "transition width {} Hz outside (0, {}) Hz",
                self.width_hz, nyquist
            )));
        }

        let in_band = |hz: f64| hz > 0.0 && hz < nyquist;
        match self.band {
            FilterBand::Lowpass { cutoff_hz } => {
                if !in_band(cutoff_hz) {
                    return Err(VorError::InvalidSpec(format!(
                        "cutoff {} Hz outside (0, {}) Hz",
                        cutoff_hz, nyquist
                    )));
                }
            }
            FilterBand::Bandpass { low_hz, high_hz } => {
                if !in_band(low_hz) || !in_band(high_hz) {
                    return Err(VorError::InvalidSpec(format!(
                        "cutoffs {}-{} Hz outside (0, {}) Hz",
                        low_hz, high_hz, nyquist
                    )));
                }
                if low_hz >= high_hz {
                    return Err(VorError::InvalidSpec(format!(
                        "lower cutoff {} Hz must be below upper cutoff {} Hz",
                        low_hz, high_hz
                    )));
                }
            }
        }
        Ok(())
    }

    /// Design the taps for this spec at `rate`
    pub fn design(&self, rate: u32) -> Result<FilterTaps> {
        match self.band {
            FilterBand::Lowpass { cutoff_hz } => {
                design_lowpass(rate, self.width_hz, self.attenuation_db, cutoff_hz)
            }
            FilterBand::Bandpass { low_hz, high_hz } => {
                design_bandpass(rate, self.width_hz, self.attenuation_db, low_hz, high_hz)
            }
        }
    }
}

/// Designed FIR coefficients
#[derive(Debug, Clone, PartialEq)]
pub struct FilterTaps {
    coefficients: Vec<f64>,
    beta: f64,
}

impl FilterTaps {
    /// Wrap hand-made coefficients. Even-length sets are padded with a trailing
    /// zero tap so the group delay stays an integer.
    pub fn from_coefficients(mut coefficients: Vec<f64>) -> Self {
        if coefficients.len().is_multiple_of(2) {
            coefficients.push(0.0);
        }
        Self {
            coefficients,
            beta: 0.0,
        }
    }

    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    /// Number of taps (always odd)
    pub fn num_taps(&self) -> usize {
        self.coefficients.len()
    }

    /// Kaiser window shape parameter used for the design
    pub fn beta(&self) -> f64 {
        self.beta
    }

    /// Group delay in samples (half the filter length for linear phase)
    pub fn group_delay(&self) -> usize {
        (self.coefficients.len() - 1) / 2
    }

    /// Magnitude response at `freq_hz` for a filter running at `rate`
    pub fn gain_at(&self, freq_hz: f64, rate: u32) -> f64 {
        let omega = 2.0 * PI * freq_hz / rate as f64;
        let (re, im) = self
            .coefficients
            .iter()
            .enumerate()
            .fold((0.0, 0.0), |(re, im), (n, &h)| {
                let phase = omega * n as f64;
                (re + h * phase.cos(), im - h * phase.sin())
            });
        (re * re + im * im).sqrt()
    }
}

/// Design a Kaiser-window lowpass filter
///
/// # Arguments
/// * `rate` - Sample rate in Hz
/// * `width_hz` - Transition band width in Hz
/// * `attenuation_db` - Stopband attenuation in positive dB
/// * `cutoff_hz` - Cutoff frequency in Hz
///
/// # Errors
/// Returns `VorError::InvalidSpec` if the parameters are out of range
pub fn design_lowpass(
    rate: u32,
    width_hz: f64,
    attenuation_db: f64,
    cutoff_hz: f64,
) -> Result<FilterTaps> {
    FilterSpec::lowpass(width_hz, attenuation_db, cutoff_hz).validate(rate)?;

    let nyquist = rate as f64 / 2.0;
    let taps = design_windowed_sinc(
        width_hz / nyquist,
        attenuation_db,
        0.0,
        cutoff_hz / nyquist,
    );
    log::info!("Lowpass filtering with {} taps", taps.num_taps());
    Ok(taps)
}

/// Design a Kaiser-window bandpass filter passing `low_hz..high_hz`
///
/// # Errors
/// Returns `VorError::InvalidSpec` if the parameters are out of range
pub fn design_bandpass(
    rate: u32,
    width_hz: f64,
    attenuation_db: f64,
    low_hz: f64,
    high_hz: f64,
) -> Result<FilterTaps> {
    FilterSpec::bandpass(width_hz, attenuation_db, low_hz, high_hz).validate(rate)?;

    let nyquist = rate as f64 / 2.0;
    let taps = design_windowed_sinc(
        width_hz / nyquist,
        attenuation_db,
        low_hz / nyquist,
        high_hz / nyquist,
    );
    log::info!("Bandpass filtering with {} taps", taps.num_taps());
    Ok(taps)
}

/// Windowed-sinc design for the band `low..high`, all frequencies normalized
/// to Nyquist. `low == 0` gives a lowpass.
fn design_windowed_sinc(width_norm: f64, attenuation_db: f64, low: f64, high: f64) -> FilterTaps {
    let beta = kaiser_beta(attenuation_db);
    let num_taps = kaiser_num_taps(attenuation_db, width_norm);
    let window = kaiser_window(num_taps, beta);
    let alpha = (num_taps - 1) as f64 / 2.0;

    let mut coefficients: Vec<f64> = window
        .iter()
        .enumerate()
        .map(|(n, &w)| {
            let m = n as f64 - alpha;
            let ideal = high * sinc(high * m) - low * sinc(low * m);
            ideal * w
        })
        .collect();

    // Unity gain at DC for lowpass, at the band centre for bandpass
    let scale_freq = if low == 0.0 { 0.0 } else { (low + high) / 2.0 };
    let gain: f64 = coefficients
        .iter()
        .enumerate()
        .map(|(n, &h)| h * (PI * (n as f64 - alpha) * scale_freq).cos())
        .sum();
    for h in coefficients.iter_mut() {
        *h /= gain;
    }

    FilterTaps { coefficients, beta }
}

/// Kaiser window shape parameter for the given stopband attenuation
pub fn kaiser_beta(attenuation_db: f64) -> f64 {
    if attenuation_db > KAISER_LINEAR_LIMIT_DB {
        0.1102 * (attenuation_db - 8.7)
    } else if attenuation_db > KAISER_RECTANGULAR_LIMIT_DB {
        let excess = attenuation_db - KAISER_RECTANGULAR_LIMIT_DB;
        0.5842 * excess.powf(0.4) + 0.07886 * excess
    } else {
        0.0
    }
}

/// Minimum odd tap count meeting `attenuation_db` over a transition of
/// `width_norm` (fraction of Nyquist)
pub fn kaiser_num_taps(attenuation_db: f64, width_norm: f64) -> usize {
    let estimate = ((attenuation_db - 8.0) / (2.285 * width_norm * PI)).ceil();
    let n = if estimate < 1.0 { 1 } else { estimate as usize };
    if n.is_multiple_of(2) { n + 1 } else { n }
}

/// Kaiser window of `length` samples with shape parameter `beta`
pub fn kaiser_window(length: usize, beta: f64) -> Vec<f64> {
    match length {
        0 => return vec![],
        1 => return vec![1.0],
        _ => {}
    }

    let half = (length - 1) as f64 / 2.0;
    let i0_beta = bessel_i0(beta);

    (0..length)
        .map(|n| {
            let x = (n as f64 - half) / half;
            bessel_i0(beta * (1.0 - x * x).max(0.0).sqrt()) / i0_beta
        })
        .collect()
}

/// Normalized sinc, sin(pi x) / (pi x)
fn sinc(x: f64) -> f64 {
    if x == 0.0 {
        1.0
    } else {
        (PI * x).sin() / (PI * x)
    }
}

/// Modified Bessel function of the first kind, order zero (power series)
fn bessel_i0(x: f64) -> f64 {
    let half_x = x / 2.0;
    let mut sum = 1.0;
    let mut term = 1.0;
    let mut k = 1.0;
    loop {
        term *= (half_x / k) * (half_x / k);
        sum += term;
        if term < BESSEL_EPSILON * sum {
            break;
        }
        k += 1.0;
    }
    sum
}
