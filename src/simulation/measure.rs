use crate::error::Result;
use crate::signal_processing::angle_error;
use crate::vor::VorDecoder;

use super::{VorSignalParams, generate_vor_signal};

/// Decode a synthetic capture and return the signed bearing error in degrees
pub fn measure_bearing_error(decoder: &VorDecoder, params: &VorSignalParams) -> Result<f64> {
    let capture = generate_vor_signal(params)?;
    let decoded = decoder.decode(&capture)?;
    let expected =
        params.bearing_degrees + decoder.config().bearing.angle_offset_degrees;
    Ok(angle_error(decoded.bearing.degrees, expected))
}

#[derive(Debug, Clone, Default)]
pub struct ErrorStats {
    pub max_abs_error: f64,
    pub mean_abs_error: f64,
    /// Bearing with the largest absolute error
    pub worst_bearing: f64,
}

/// Decode one synthetic capture per bearing, all other parameters from `base`
pub fn measure_error_across_bearings(
    decoder: &VorDecoder,
    base: &VorSignalParams,
    bearings: &[f64],
) -> Result<ErrorStats> {
    let mut stats = ErrorStats::default();
    let mut total = 0.0;

    for &bearing in bearings {
        let params = VorSignalParams {
            bearing_degrees: bearing,
            ..base.clone()
        };
        let error = measure_bearing_error(decoder, &params)?.abs();
        log::debug!("bearing {:>5.1}°: error {:.2}°", bearing, error);
        total += error;
        if error > stats.max_abs_error {
            stats.max_abs_error = error;
            stats.worst_bearing = bearing;
        }
    }

    if !bearings.is_empty() {
        stats.mean_abs_error = total / bearings.len() as f64;
    }
    Ok(stats)
}
