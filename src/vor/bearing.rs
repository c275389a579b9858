use crate::config::BearingConfig;
use crate::constants::{MIN_LAG_PERIODS, VOR_TONE_HZ};
use crate::error::{Result, VorError};
use crate::signal_processing::SignalBuffer;
use crate::signal_processing::math::{
    degrees_to_samples, normalize_degrees, offset_to_bearing, tone_period_samples,
};
use serde::Serialize;

/// Bearing estimate
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BearingResult {
    /// Bearing in degrees, [0, 360)
    pub degrees: f64,
    /// Winning correlation lag in samples
    pub lag: usize,
    /// Peak correlation normalized by the energy of both compared windows (-1 to 1)
    pub correlation: f64,
    /// Sample rate the correlation ran at
    pub rate: u32,
}

/// Cross-correlation bearing estimator
///
/// Aligns the reference (plain 30 Hz tone) and variable (FM-recovered 30 Hz
/// tone) signals using their tracked delays, then finds the lag at which they
/// best match. One period of the 30 Hz tone is one full turn of bearing.
#[derive(Debug, Clone)]
pub struct BearingEstimator {
    angle_offset_degrees: f64,
}

impl BearingEstimator {
    /// Create an estimator with the given calibration offset
    ///
    /// The variable signal is advanced by `angle_offset_degrees` worth of tone
    /// phase before correlating, which adds the offset to every bearing.
    /// The offset is wrapped into [0, 360) first.
    pub fn new(angle_offset_degrees: f64) -> Self {
        Self {
            angle_offset_degrees,
        }
    }

    pub fn from_config(config: &BearingConfig) -> Self {
        Self::new(config.angle_offset_degrees)
    }

    pub fn angle_offset_degrees(&self) -> f64 {
        self.angle_offset_degrees
    }

    /// Estimate the bearing between `reference` and `variable`
    ///
    /// Neither input is modified.
    ///
    /// # Errors
    /// * `VorError::RateMismatch` if the buffers run at different rates
    /// * `VorError::InsufficientSignal` if, after alignment, the reference is
    ///   shorter than the lag range plus one tone period, or the variable is
    ///   shorter than one tone period
    pub fn estimate(
        &self,
        reference: &SignalBuffer<f64>,
        variable: &SignalBuffer<f64>,
    ) -> Result<BearingResult> {
        if reference.rate() != variable.rate() {
            return Err(VorError::RateMismatch {
                reference: reference.rate(),
                variable: variable.rate(),
            });
        }
        let rate = reference.rate();

        let reference = align_to_capture(reference)?;
        let mut variable = align_to_capture(variable)?;

        let shift = degrees_to_samples(normalize_degrees(self.angle_offset_degrees), rate);
        if shift >= variable.len() {
            return Err(VorError::InsufficientSignal {
                needed: shift + 1,
                available: variable.len(),
            });
        }
        variable.drain(..shift);

        let period = tone_period_samples(rate);
        let lag_range = (MIN_LAG_PERIODS as f64 * rate as f64 / VOR_TONE_HZ).ceil() as usize;

        if reference.len() < lag_range + period {
            return Err(VorError::InsufficientSignal {
                needed: lag_range + period,
                available: reference.len(),
            });
        }
        if variable.len() < period {
            return Err(VorError::InsufficientSignal {
                needed: period,
                available: variable.len(),
            });
        }

        let max_variable_len = reference.len() - lag_range;
        if variable.len() > max_variable_len {
            log::debug!(
                "Truncating variable signal from {} to {} samples to keep {} lags",
                variable.len(),
                max_variable_len,
                lag_range
            );
            variable.truncate(max_variable_len);
        }

        let correlation = valid_cross_correlation(&reference, &variable);
        let (lag, peak) = correlation
            .iter()
            .copied()
            .enumerate()
            .fold((0, f64::NEG_INFINITY), |best, (i, c)| {
                if c > best.1 { (i, c) } else { best }
            });

        let reference_energy: f64 = reference[lag..lag + variable.len()]
            .iter()
            .map(|x| x * x)
            .sum();
        let variable_energy: f64 = variable.iter().map(|x| x * x).sum();
        let norm = (reference_energy * variable_energy).sqrt();
        let normalized = if norm > 0.0 { peak / norm } else { 0.0 };

        let degrees = offset_to_bearing(lag as f64 / rate as f64);
        log::debug!(
            "Correlation peak at lag {} of {} ({:.3}), bearing {:.1}°",
            lag,
            correlation.len(),
            normalized,
            degrees
        );

        Ok(BearingResult {
            degrees,
            lag,
            correlation: normalized,
            rate,
        })
    }
}

/// Private copy of the buffer with its leading `delay` samples dropped
fn align_to_capture(buffer: &SignalBuffer<f64>) -> Result<Vec<f64>> {
    let delay = buffer.delay();
    if delay >= buffer.len() {
        return Err(VorError::InsufficientSignal {
            needed: delay + 1,
            available: buffer.len(),
        });
    }
    Ok(buffer.samples()[delay..].to_vec())
}

/// Valid-range cross-correlation
///
/// `out[i] = Σ_n reference[n + i] · variable[n]` for every lag `i` at which
/// `variable` fits entirely inside `reference`. Empty when `variable` is longer.
pub fn valid_cross_correlation(reference: &[f64], variable: &[f64]) -> Vec<f64> {
    if variable.len() > reference.len() {
        return vec![];
    }
    (0..=reference.len() - variable.len())
        .map(|lag| {
            reference[lag..lag + variable.len()]
                .iter()
                .zip(variable)
                .map(|(r, v)| r * v)
                .sum()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal_processing::math::angle_error;
    use std::f64::consts::PI;

    fn tone(rate: u32, len: usize, phase_degrees: f64) -> Vec<f64> {
        (0..len)
            .map(|n| {
                (2.0 * PI * VOR_TONE_HZ * n as f64 / rate as f64 + phase_degrees.to_radians()).cos()
            })
            .collect()
    }

    fn buffer(samples: Vec<f64>, rate: u32, delay: usize) -> SignalBuffer<f64> {
        SignalBuffer::with_delay(samples, rate, delay).unwrap()
    }

    #[test]
    fn test_valid_cross_correlation() {
        let out = valid_cross_correlation(&[1.0, 2.0, 3.0, 4.0], &[1.0, 1.0]);
        assert_eq!(out, vec![3.0, 5.0, 7.0]);
        assert!(valid_cross_correlation(&[1.0], &[1.0, 2.0]).is_empty());
    }

    #[test]
    fn test_known_phase_offsets() {
        let rate = 3600;
        let estimator = BearingEstimator::new(0.0);
        for bearing in [0.0, 30.0, 90.0, 123.0, 180.0, 270.0, 357.0] {
            let reference = buffer(tone(rate, 1200, 0.0), rate, 0);
            let variable = buffer(tone(rate, 1200, bearing), rate, 0);

            let result = estimator.estimate(&reference, &variable).unwrap();
            // 3 degrees per sample at 3600 Hz
            assert!(
                angle_error(result.degrees, bearing).abs() <= 1.5 + 1e-9,
                "expected {}, got {}",
                bearing,
                result.degrees
            );
            assert!(result.correlation > 0.99);
        }
    }

    #[test]
    fn test_bearing_wraps_mod_360() {
        let rate = 3600;
        let reference = buffer(tone(rate, 1200, 0.0), rate, 0);
        let variable = buffer(tone(rate, 1200, 360.0 + 30.0), rate, 0);

        let result = BearingEstimator::new(0.0)
            .estimate(&reference, &variable)
            .unwrap();
        assert!((result.degrees - 30.0).abs() < 1e-6, "got {}", result.degrees);
        assert!(result.degrees >= 0.0 && result.degrees < 360.0);
    }

    #[test]
    fn test_delays_are_removed_before_correlating() {
        let rate = 3600;
        let mut reference = vec![5.0; 17];
        reference.extend(tone(rate, 1200, 0.0));
        let mut variable = vec![-3.0; 250];
        variable.extend(tone(rate, 1200, 60.0));

        let result = BearingEstimator::new(0.0)
            .estimate(&buffer(reference, rate, 17), &buffer(variable, rate, 250))
            .unwrap();
        assert!((result.degrees - 60.0).abs() < 1e-6, "got {}", result.degrees);
    }

    #[test]
    fn test_angle_offset_is_added() {
        let rate = 3600;
        let reference = buffer(tone(rate, 1200, 0.0), rate, 0);
        let variable = buffer(tone(rate, 1200, 45.0), rate, 0);

        let result = BearingEstimator::new(90.0)
            .estimate(&reference, &variable)
            .unwrap();
        assert!((result.degrees - 135.0).abs() < 1e-6, "got {}", result.degrees);

        // Negative offsets wrap: -90 behaves like 270
        let result = BearingEstimator::new(-90.0)
            .estimate(&reference, &variable)
            .unwrap();
        assert!((result.degrees - 315.0).abs() < 1e-6, "got {}", result.degrees);
    }

    #[test]
    fn test_inputs_are_not_modified() {
        let rate = 3600;
        let reference = buffer(tone(rate, 1200, 0.0), rate, 3);
        let variable = buffer(tone(rate, 1200, 45.0), rate, 5);
        let (ref_copy, var_copy) = (reference.clone(), variable.clone());

        BearingEstimator::new(114.0)
            .estimate(&reference, &variable)
            .unwrap();
        assert_eq!(reference, ref_copy);
        assert_eq!(variable, var_copy);
    }

    #[test]
    fn test_long_variable_is_truncated_not_rejected() {
        let rate = 3600;
        // Variable longer than the reference: truncated to leave 4 periods of lag
        let reference = buffer(tone(rate, 600, 0.0), rate, 0);
        let variable = buffer(tone(rate, 900, 120.0), rate, 0);

        let result = BearingEstimator::new(0.0)
            .estimate(&reference, &variable)
            .unwrap();
        assert!(result.lag <= 480);
        assert!((result.degrees - 120.0).abs() < 1e-6, "got {}", result.degrees);
    }

    #[test]
    fn test_short_buffers_rejected() {
        let rate = 3600;
        let reference = buffer(tone(rate, 100, 0.0), rate, 0);
        let variable = buffer(tone(rate, 100, 0.0), rate, 0);

        let result = BearingEstimator::new(0.0).estimate(&reference, &variable);
        assert!(matches!(
            result,
            Err(VorError::InsufficientSignal {
                needed: 600,
                available: 100
            })
        ));
    }

    #[test]
    fn test_reference_without_lag_room_rejected() {
        let rate = 3600;
        // Enough for the variable but not for 4 periods of lag on top of it
        let reference = buffer(tone(rate, 500, 0.0), rate, 0);
        let variable = buffer(tone(rate, 300, 0.0), rate, 0);
        assert!(matches!(
            BearingEstimator::new(0.0).estimate(&reference, &variable),
            Err(VorError::InsufficientSignal { .. })
        ));
    }

    #[test]
    fn test_delay_consuming_buffer_rejected() {
        let rate = 3600;
        let reference = buffer(tone(rate, 1200, 0.0), rate, 1200);
        let variable = buffer(tone(rate, 1200, 0.0), rate, 0);
        assert!(matches!(
            BearingEstimator::new(0.0).estimate(&reference, &variable),
            Err(VorError::InsufficientSignal { .. })
        ));
    }

    #[test]
    fn test_rate_mismatch() {
        let reference = buffer(tone(3600, 1200, 0.0), 3600, 0);
        let variable = buffer(tone(6000, 1200, 0.0), 6000, 0);
        assert!(matches!(
            BearingEstimator::new(0.0).estimate(&reference, &variable),
            Err(VorError::RateMismatch {
                reference: 3600,
                variable: 6000
            })
        ));
    }
}
