//! Configuration for the VOR decoder.
//!
//! Every filter, the decimated rate, the subcarrier shift and the bearing
//! calibration offset are explicit fields. Defaults match a 48 kHz SDR audio
//! capture decimated to 6 kHz. Any subset of fields can be overridden from
//! TOML:
//!
//! ```toml
//! decimated_rate = 8820
//!
//! [fm]
//! carrier_hz = 9960.0
//!
//! [fm.phase_bandpass]
//! type = "bandpass"
//! width_hz = 15.0
//! attenuation_db = 60.0
//! low_hz = 15.0
//! high_hz = 45.0
//!
//! [bearing]
//! angle_offset_degrees = 114.0
//! ```

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, VorError};
use crate::signal_processing::FilterSpec;

/// Frequency parsed from a CLI-style string
///
/// # Parsing formats
/// - `9960` - frequency in Hz (no suffix)
/// - `9960hz` or `9960Hz` - frequency in Hz (explicit)
/// - `9.96khz` or `9.96kHz` - frequency in kHz
///
/// # Example
/// ```
/// use vordecoder::config::Frequency;
///
/// let freq: Frequency = "9.96khz".parse().unwrap();
/// assert!((freq.as_hz() - 9960.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frequency(f64);

impl Frequency {
    pub fn from_hz(hz: f64) -> Self {
        Self(hz)
    }

    pub fn as_hz(&self) -> f64 {
        self.0
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}hz", self.0)
    }
}

impl FromStr for Frequency {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        let lower = s.to_ascii_lowercase();

        let (num, scale) = if let Some(num) = lower.strip_suffix("khz") {
            (num, 1000.0)
        } else if let Some(num) = lower.strip_suffix("hz") {
            (num, 1.0)
        } else {
            (lower.as_str(), 1.0)
        };

        let value: f64 = num
            .trim()
            .parse()
            .map_err(|_| format!("invalid frequency: {}", s))?;
        let hz = value * scale;
        if !hz.is_finite() || hz <= 0.0 {
            return Err("frequency must be positive".to_string());
        }
        Ok(Self::from_hz(hz))
    }
}

/// Complete decoder configuration
///
/// # Example
/// ```
/// use vordecoder::config::VorConfig;
///
/// let mut config = VorConfig::default();
/// config.fm.carrier_hz = 9940.0;
/// config.bearing.angle_offset_degrees = 114.0;
/// assert!(config.validate(48000).is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VorConfig {
    /// 30 Hz reference tone path
    pub reference: ReferencePathConfig,
    /// FM subcarrier (variable phase) path
    pub fm: FmPathConfig,
    /// Rate both paths are decimated to before comparison (Hz).
    /// Must divide the capture rate.
    pub decimated_rate: u32,
    /// Bearing estimation
    pub bearing: BearingConfig,
    /// Run the reference and FM paths on separate threads
    pub parallel_paths: bool,
}

/// Reference path: isolate the 30 Hz tone at the capture rate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferencePathConfig {
    /// Lowpass applied before decimation
    pub lowpass: FilterSpec,
}

/// FM path: isolate the subcarrier, bring it to baseband and recover its phase
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FmPathConfig {
    /// Bandpass around the subcarrier at the capture rate
    pub bandpass: FilterSpec,
    /// Subcarrier frequency shifted to 0 Hz (Hz). Tune to centre the subcarrier.
    pub carrier_hz: f64,
    /// Lowpass of the baseband signal before decimation
    pub lowpass: FilterSpec,
    /// Bandpass on the recovered phase at the decimated rate; strips DC and drift
    pub phase_bandpass: FilterSpec,
}

/// Bearing estimation configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BearingConfig {
    /// Calibration added to every bearing (degrees).
    ///
    /// Compensates a systematic phase bias between the two paths. The
    /// synthetic signal model needs 0; recordings of real beacons have needed
    /// about 114 when processed with the default filters.
    pub angle_offset_degrees: f64,
}

impl Default for VorConfig {
    fn default() -> Self {
        Self {
            reference: ReferencePathConfig::default(),
            fm: FmPathConfig::default(),
            decimated_rate: 6000,
            bearing: BearingConfig::default(),
            parallel_paths: false,
        }
    }
}

impl Default for ReferencePathConfig {
    fn default() -> Self {
        Self {
            lowpass: FilterSpec::lowpass(500.0, 60.0, 500.0),
        }
    }
}

impl Default for FmPathConfig {
    fn default() -> Self {
        Self {
            bandpass: FilterSpec::bandpass(1000.0, 60.0, 8500.0, 11500.0),
            carrier_hz: 9960.0,
            lowpass: FilterSpec::lowpass(500.0, 60.0, 1500.0),
            phase_bandpass: FilterSpec::bandpass(15.0, 60.0, 15.0, 45.0),
        }
    }
}

impl VorConfig {
    /// Parse a TOML document; missing fields keep their defaults
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| VorError::Config(e.to_string()))
    }

    /// Load a TOML configuration file
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            VorError::Config(format!("{}: {}", path.as_ref().display(), e))
        })?;
        Self::from_toml_str(&text)
    }

    /// Serialize to TOML (e.g. to write out the defaults as a template)
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| VorError::Config(e.to_string()))
    }

    /// Check the configuration against a capture rate
    ///
    /// # Errors
    /// * `VorError::IncompatibleRate` if `decimated_rate` does not divide `capture_rate`
    /// * `VorError::InvalidSpec` if a filter is invalid at the rate it runs at
    /// * `VorError::Config` if the carrier is not strictly inside the capture band
    pub fn validate(&self, capture_rate: u32) -> Result<()> {
        if self.decimated_rate == 0 || !capture_rate.is_multiple_of(self.decimated_rate) {
            return Err(VorError::IncompatibleRate {
                input: capture_rate,
                output: self.decimated_rate,
            });
        }

        self.reference.lowpass.validate(capture_rate)?;
        self.fm.bandpass.validate(capture_rate)?;
        self.fm.lowpass.validate(capture_rate)?;
        self.fm.phase_bandpass.validate(self.decimated_rate)?;

        let nyquist = capture_rate as f64 / 2.0;
        if !self.fm.carrier_hz.is_finite() || self.fm.carrier_hz.abs() >= nyquist {
            return Err(VorError::Config(format!(
                "carrier {} Hz outside capture band (Nyquist {} Hz)",
                self.fm.carrier_hz, nyquist
            )));
        }
        Ok(())
    }
}
