use crate::constants::VOR_TONE_HZ;

/// Wrap an angle in degrees into [0, 360)
pub fn normalize_degrees(degrees: f64) -> f64 {
    let wrapped = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Convert a time offset between the two 30 Hz tones to a bearing (0-360 degrees)
///
/// One tone period maps to a full turn.
pub fn offset_to_bearing(offset_secs: f64) -> f64 {
    normalize_degrees(offset_secs * VOR_TONE_HZ * 360.0)
}

/// Number of samples spanning `degrees` of tone phase at `rate`, rounded
/// to the nearest sample
pub fn degrees_to_samples(degrees: f64, rate: u32) -> usize {
    (degrees / 360.0 / VOR_TONE_HZ * rate as f64).round() as usize
}

/// Samples in one period of the 30 Hz tone, rounded up
pub fn tone_period_samples(rate: u32) -> usize {
    (rate as f64 / VOR_TONE_HZ).ceil() as usize
}

/// Signed difference `measured - expected` wrapped to [-180, 180)
pub fn angle_error(measured: f64, expected: f64) -> f64 {
    normalize_degrees(measured - expected + 180.0) - 180.0
}

/// Mean of a set of bearings on the circle (0-360 degrees)
pub fn circular_mean_degrees(angles_degrees: &[f64]) -> Option<f64> {
    if angles_degrees.is_empty() {
        return None;
    }
    let sum_x: f64 = angles_degrees.iter().map(|a| a.to_radians().cos()).sum();
    let sum_y: f64 = angles_degrees.iter().map(|a| a.to_radians().sin()).sum();
    Some(normalize_degrees(sum_y.atan2(sum_x).to_degrees()))
}
