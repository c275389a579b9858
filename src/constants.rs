//! VOR signal constants and numeric thresholds.

/// Frequency of the VOR reference and variable tones in Hz.
/// One period of this tone spans 360 degrees of bearing.
pub const VOR_TONE_HZ: f64 = 30.0;

/// Number of tone periods that must remain as searchable lag range when
/// correlating the reference against the variable signal.
pub const MIN_LAG_PERIODS: usize = 4;

/// Stopband attenuation (dB) at or below which the Kaiser window degenerates
/// to a rectangular window (beta = 0).
pub const KAISER_RECTANGULAR_LIMIT_DB: f64 = 21.0;

/// Stopband attenuation (dB) above which the linear Kaiser beta formula applies.
pub const KAISER_LINEAR_LIMIT_DB: f64 = 50.0;

/// Relative convergence threshold for the Bessel I0 power series.
pub const BESSEL_EPSILON: f64 = 1e-12;

/// Magnitudes below this are treated as zero when normalizing signals.
pub const MIN_PEAK_THRESHOLD: f64 = 1e-12;
