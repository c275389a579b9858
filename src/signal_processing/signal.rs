use crate::constants::MIN_PEAK_THRESHOLD;
use crate::error::{Result, VorError};
use num_complex::Complex64;
use std::fmt::Debug;
use std::ops::{Add, Mul};

/// Sample element carried by a [`SignalBuffer`].
///
/// Implemented for real (`f64`) and complex (`Complex64`) samples. FIR taps
/// are always real, so a sample only needs to scale by `f64` and add.
pub trait Sample:
    Copy
    + Default
    + Debug
    + Send
    + Sync
    + Add<Output = Self>
    + Mul<f64, Output = Self>
    + Into<Complex64>
    + 'static
{
    /// Absolute value (real) or modulus (complex)
    fn magnitude(&self) -> f64;
}

impl Sample for f64 {
    fn magnitude(&self) -> f64 {
        self.abs()
    }
}

impl Sample for Complex64 {
    fn magnitude(&self) -> f64 {
        self.norm()
    }
}

/// A sampled signal together with its sample rate and the processing delay
/// accumulated since the original capture.
///
/// Buffers are values: every processing stage returns a fresh buffer and
/// leaves its input untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalBuffer<T> {
    samples: Vec<T>,
    rate: u32,
    delay: usize,
}

impl<T: Sample> SignalBuffer<T> {
    /// Wrap freshly captured samples (zero delay)
    ///
    /// # Errors
    /// Returns `VorError::InvalidSpec` if `rate` is zero
    pub fn new(samples: Vec<T>, rate: u32) -> Result<Self> {
        Self::with_delay(samples, rate, 0)
    }

    /// Wrap samples that already carry `delay` samples of processing latency
    pub fn with_delay(samples: Vec<T>, rate: u32, delay: usize) -> Result<Self> {
        if rate == 0 {
            return Err(VorError::InvalidSpec(
                "sample rate must be positive".to_string(),
            ));
        }
        Ok(Self::from_parts(samples, rate, delay))
    }

    /// Construct from a rate already known to be valid (stage outputs)
    pub(crate) fn from_parts(samples: Vec<T>, rate: u32, delay: usize) -> Self {
        debug_assert!(rate > 0);
        Self {
            samples,
            rate,
            delay,
        }
    }

    pub fn samples(&self) -> &[T] {
        &self.samples
    }

    pub fn into_samples(self) -> Vec<T> {
        self.samples
    }

    /// Sample rate in Hz
    pub fn rate(&self) -> u32 {
        self.rate
    }

    /// Accumulated processing delay in samples at this buffer's rate
    pub fn delay(&self) -> usize {
        self.delay
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn duration_secs(&self) -> f64 {
        self.samples.len() as f64 / self.rate as f64
    }

    /// Largest sample magnitude (0 for an empty buffer)
    pub fn peak(&self) -> f64 {
        self.samples
            .iter()
            .map(Sample::magnitude)
            .fold(0.0, f64::max)
    }
}

impl SignalBuffer<f64> {
    /// Copy scaled so the peak magnitude is 1.0. Silent buffers are returned unscaled.
    pub fn normalized(&self) -> Self {
        let peak = self.peak();
        if peak < MIN_PEAK_THRESHOLD {
            return self.clone();
        }
        let samples = self.samples.iter().map(|&s| s / peak).collect();
        Self::from_parts(samples, self.rate, self.delay)
    }
}

impl SignalBuffer<Complex64> {
    /// Real part of each sample, same rate and delay
    pub fn real(&self) -> SignalBuffer<f64> {
        let samples = self.samples.iter().map(|s| s.re).collect();
        SignalBuffer::from_parts(samples, self.rate, self.delay)
    }

    /// Imaginary part of each sample, same rate and delay
    pub fn imag(&self) -> SignalBuffer<f64> {
        let samples = self.samples.iter().map(|s| s.im).collect();
        SignalBuffer::from_parts(samples, self.rate, self.delay)
    }
}
