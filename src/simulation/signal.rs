use std::f64::consts::PI;

use serde::Deserialize;

use super::noise::{add_awgn, create_rng};
use crate::constants::VOR_TONE_HZ;
use crate::error::Result;
use crate::signal_processing::SignalBuffer;

/// FM deviation of the standard VOR subcarrier (480 Hz / 30 Hz)
pub const DEFAULT_MODULATION_INDEX: f64 = 16.0;

/// Parameters of a synthetic VOR capture
///
/// ```text
/// x(t) = A·cos(2π·30·t) + cos(2π·fc·t + m·cos(2π·30·t + θ)) [+ noise]
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct VorSignalParams {
    pub sample_rate: u32,
    pub duration_secs: f64,
    /// θ, the bearing a correctly calibrated decoder reports (angle offset 0)
    pub bearing_degrees: f64,
    /// Subcarrier frequency fc
    pub carrier_hz: f64,
    /// Reference tone amplitude A
    pub reference_amplitude: f64,
    /// Modulation index m
    pub modulation_index: f64,
    /// Adds white Gaussian noise at this SNR relative to the clean signal power
    pub snr_db: Option<f64>,
    /// Noise seed; a random seed is used when absent
    pub seed: Option<u64>,
}

impl Default for VorSignalParams {
    fn default() -> Self {
        Self {
            sample_rate: 48000,
            duration_secs: 2.0,
            bearing_degrees: 0.0,
            carrier_hz: 9960.0,
            reference_amplitude: 1.0,
            modulation_index: DEFAULT_MODULATION_INDEX,
            snr_db: None,
            seed: None,
        }
    }
}

impl VorSignalParams {
    pub fn new(sample_rate: u32, bearing_degrees: f64) -> Self {
        Self {
            sample_rate,
            bearing_degrees,
            ..Self::default()
        }
    }

    pub fn with_awgn(mut self, snr_db: f64, seed: u64) -> Self {
        self.snr_db = Some(snr_db);
        self.seed = Some(seed);
        self
    }
}

/// Generate a synthetic VOR capture with a fixed bearing
pub fn generate_vor_signal(params: &VorSignalParams) -> Result<SignalBuffer<f64>> {
    generate_vor_signal_with_bearing_fn(params, |_| params.bearing_degrees)
}

/// Generate a synthetic VOR capture whose bearing follows `bearing_fn`
///
/// `bearing_fn` takes the time in seconds and returns the bearing in degrees.
/// `params.bearing_degrees` is ignored.
pub fn generate_vor_signal_with_bearing_fn<F>(
    params: &VorSignalParams,
    bearing_fn: F,
) -> Result<SignalBuffer<f64>>
where
    F: Fn(f64) -> f64,
{
    let rate = params.sample_rate as f64;
    let num_samples = (params.duration_secs.max(0.0) * rate) as usize;

    let mut samples: Vec<f64> = (0..num_samples)
        .map(|n| {
            let t = n as f64 / rate;
            let tone = 2.0 * PI * VOR_TONE_HZ * t;
            let reference = params.reference_amplitude * tone.cos();
            let phase = params.modulation_index * (tone + bearing_fn(t).to_radians()).cos();
            reference + (2.0 * PI * params.carrier_hz * t + phase).cos()
        })
        .collect();

    if let Some(snr_db) = params.snr_db {
        let mut rng = create_rng(params.seed);
        add_awgn(&mut samples, snr_db, &mut rng);
    }

    SignalBuffer::new(samples, params.sample_rate)
}
