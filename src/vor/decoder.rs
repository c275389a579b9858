use std::sync::Mutex;

use num_complex::Complex64;

use super::bearing::{BearingEstimator, BearingResult};
use super::observer::{NullObserver, SharedObserver, StageObserver};
use crate::config::VorConfig;
use crate::constants::VOR_TONE_HZ;
use crate::error::{Result, VorError};
use crate::signal_processing::{
    FilterTaps, SignalBuffer, apply, decimate, instantaneous_phase, shift_to_baseband,
};

/// Output of one decode
#[derive(Debug, Clone)]
pub struct Decoded {
    pub bearing: BearingResult,
    /// Decimated 30 Hz reference tone
    pub reference: SignalBuffer<f64>,
    /// Decimated 30 Hz tone recovered from the FM subcarrier
    pub variable: SignalBuffer<f64>,
    /// Subcarrier shifted to 0 Hz, lowpassed and decimated
    pub fm_baseband: SignalBuffer<Complex64>,
}

impl Decoded {
    /// Real part of the baseband FM signal, peak-normalized to 1.0
    pub fn fm_export(&self) -> SignalBuffer<f64> {
        self.fm_baseband.real().normalized()
    }
}

/// Taps for every filter in the pipeline, designed for one capture rate
struct PipelineTaps {
    reference_lowpass: FilterTaps,
    fm_bandpass: FilterTaps,
    fm_lowpass: FilterTaps,
    phase_bandpass: FilterTaps,
}

impl PipelineTaps {
    fn design(config: &VorConfig, capture_rate: u32) -> Result<Self> {
        Ok(Self {
            reference_lowpass: config.reference.lowpass.design(capture_rate)?,
            fm_bandpass: config.fm.bandpass.design(capture_rate)?,
            fm_lowpass: config.fm.lowpass.design(capture_rate)?,
            phase_bandpass: config.fm.phase_bandpass.design(config.decimated_rate)?,
        })
    }

    /// Capture samples spanned by the longest filter
    fn longest_span(&self, decimation: usize) -> usize {
        [
            self.reference_lowpass.num_taps(),
            self.fm_bandpass.num_taps(),
            self.fm_lowpass.num_taps(),
            self.phase_bandpass.num_taps() * decimation,
        ]
        .into_iter()
        .max()
        .unwrap_or(0)
    }
}

struct FmOutput {
    baseband: SignalBuffer<Complex64>,
    variable: SignalBuffer<f64>,
}

/// VOR bearing decoder
///
/// Splits a capture into the 30 Hz reference tone and the 30 Hz tone carried
/// as frequency modulation on the subcarrier, brings both to the decimated
/// rate, and hands them to a [`BearingEstimator`].
///
/// # Example
/// ```no_run
/// use vordecoder::{VorConfig, VorDecoder};
///
/// let capture = vordecoder::wav::read_mono_wav("vor.wav")?;
/// let decoder = VorDecoder::new(VorConfig::default())?;
/// let decoded = decoder.decode(&capture)?;
/// println!("{:.1}", decoded.bearing.degrees);
/// # Ok::<(), vordecoder::VorError>(())
/// ```
pub struct VorDecoder {
    config: VorConfig,
    estimator: BearingEstimator,
}

impl VorDecoder {
    /// Create a decoder
    ///
    /// Checks what can be checked without knowing the capture rate: the
    /// decimated rate is nonzero and the phase bandpass is valid at it.
    pub fn new(config: VorConfig) -> Result<Self> {
        if config.decimated_rate == 0 {
            return Err(VorError::Config("decimated_rate must be > 0".to_string()));
        }
        config.fm.phase_bandpass.validate(config.decimated_rate)?;
        if !config.bearing.angle_offset_degrees.is_finite() {
            return Err(VorError::Config(format!(
                "angle_offset_degrees must be finite, got {}",
                config.bearing.angle_offset_degrees
            )));
        }

        let estimator = BearingEstimator::from_config(&config.bearing);
        Ok(Self { config, estimator })
    }

    pub fn config(&self) -> &VorConfig {
        &self.config
    }

    pub fn decode(&self, capture: &SignalBuffer<f64>) -> Result<Decoded> {
        self.decode_with_observer(capture, &mut NullObserver)
    }

    /// Decode, reporting every intermediate signal to `observer`
    ///
    /// # Errors
    /// * `VorError::IncompatibleRate` if the decimated rate does not divide the capture rate
    /// * `VorError::InvalidSpec` / `VorError::Config` if the configuration is
    ///   not usable at the capture rate
    /// * `VorError::InsufficientSignal` if the capture is not longer than the
    ///   longest filter, or too short to correlate after filtering
    pub fn decode_with_observer(
        &self,
        capture: &SignalBuffer<f64>,
        observer: &mut dyn StageObserver,
    ) -> Result<Decoded> {
        self.config.validate(capture.rate())?;
        let taps = PipelineTaps::design(&self.config, capture.rate())?;
        log::debug!(
            "{} Hz gain: reference lowpass {:.3}, phase bandpass {:.3}",
            VOR_TONE_HZ,
            taps.reference_lowpass.gain_at(VOR_TONE_HZ, capture.rate()),
            taps.phase_bandpass.gain_at(VOR_TONE_HZ, self.config.decimated_rate)
        );

        let decimation = (capture.rate() / self.config.decimated_rate) as usize;
        let needed = taps.longest_span(decimation) + 1;
        if capture.len() < needed {
            return Err(VorError::InsufficientSignal {
                needed,
                available: capture.len(),
            });
        }

        log::info!(
            "Decoding {} samples @ {} Hz ({:.2} s), decimating by {}",
            capture.len(),
            capture.rate(),
            capture.duration_secs(),
            decimation
        );
        observe(observer, "Input", capture);

        let (reference, fm) = if self.config.parallel_paths {
            let shared = Mutex::new(observer);
            std::thread::scope(|s| {
                let fm_handle = s.spawn(|| {
                    let mut observer = SharedObserver::new(&shared);
                    self.fm_path(capture, &taps, &mut observer)
                });
                let mut observer = SharedObserver::new(&shared);
                let reference = self.reference_path(capture, &taps, &mut observer);
                let fm = fm_handle
                    .join()
                    .unwrap_or_else(|panic| std::panic::resume_unwind(panic));
                (reference, fm)
            })
        } else {
            (
                self.reference_path(capture, &taps, observer),
                self.fm_path(capture, &taps, observer),
            )
        };
        let reference = reference?;
        let fm = fm?;

        let bearing = self.estimator.estimate(&reference, &fm.variable)?;
        log::info!(
            "Bearing {:.1}° (lag {}, correlation {:.3})",
            bearing.degrees,
            bearing.lag,
            bearing.correlation
        );

        Ok(Decoded {
            bearing,
            reference,
            variable: fm.variable,
            fm_baseband: fm.baseband,
        })
    }

    fn reference_path(
        &self,
        capture: &SignalBuffer<f64>,
        taps: &PipelineTaps,
        observer: &mut dyn StageObserver,
    ) -> Result<SignalBuffer<f64>> {
        let filtered = apply(capture, &taps.reference_lowpass);
        let reference = decimate(&filtered, self.config.decimated_rate)?;
        observe(observer, "Reference", &reference);
        Ok(reference)
    }

    fn fm_path(
        &self,
        capture: &SignalBuffer<f64>,
        taps: &PipelineTaps,
        observer: &mut dyn StageObserver,
    ) -> Result<FmOutput> {
        let subcarrier = apply(capture, &taps.fm_bandpass);
        observe(observer, "FM bandpass", &subcarrier);

        let centered = shift_to_baseband(&subcarrier, self.config.fm.carrier_hz);
        let centered = apply(&centered, &taps.fm_lowpass);
        let baseband = decimate(&centered, self.config.decimated_rate)?;
        observe(observer, "Decimated Centered FM real", &baseband.real());
        observe(observer, "Decimated Centered FM imag", &baseband.imag());

        let phase = instantaneous_phase(&baseband);
        observe(observer, "FM phase", &phase);

        let variable = apply(&phase, &taps.phase_bandpass);
        observe(observer, "Variable", &variable);

        Ok(FmOutput { baseband, variable })
    }
}

fn observe(observer: &mut dyn StageObserver, title: &str, buffer: &SignalBuffer<f64>) {
    observer.observe(title, buffer.samples(), buffer.rate(), buffer.delay());
}
