use super::filter_design::FilterTaps;
use super::signal::{Sample, SignalBuffer};

/// Direct-form FIR filter with a ring-buffer delay line
///
/// Starts from zero state. Works on real or complex samples; taps are real.
pub struct FirFilterCore<'a, T> {
    taps: &'a [f64],
    delay_line: Vec<T>,
    pos: usize,
}

impl<'a, T: Sample> FirFilterCore<'a, T> {
    /// Create a new FIR filter core over the given taps
    pub fn new(taps: &'a FilterTaps) -> Self {
        Self {
            taps: taps.coefficients(),
            delay_line: vec![T::default(); taps.num_taps()],
            pos: 0,
        }
    }

    /// Process a single sample through the filter
    pub fn process(&mut self, sample: T) -> T {
        self.delay_line[self.pos] = sample;

        let mut output = T::default();
        let n = self.taps.len();

        // Iterate the ring buffer in two contiguous reverse ranges to avoid
        // modulo arithmetic in the inner convolution loop.
        let mut tap_i = 0usize;
        for delay_idx in (0..=self.pos).rev() {
            output = output + self.delay_line[delay_idx] * self.taps[tap_i];
            tap_i += 1;
        }
        for delay_idx in ((self.pos + 1)..n).rev() {
            output = output + self.delay_line[delay_idx] * self.taps[tap_i];
            tap_i += 1;
        }
        debug_assert_eq!(tap_i, n);

        self.pos += 1;
        if self.pos == n {
            self.pos = 0;
        }
        output
    }
}

/// Filter a whole buffer (causal, zero initial state, same length)
///
/// The output is delayed by the filter's group delay, which is added to the
/// buffer's accumulated delay.
pub fn apply<T: Sample>(buffer: &SignalBuffer<T>, taps: &FilterTaps) -> SignalBuffer<T> {
    let mut core = FirFilterCore::new(taps);
    let samples = buffer
        .samples()
        .iter()
        .map(|&sample| core.process(sample))
        .collect();

    SignalBuffer::from_parts(samples, buffer.rate(), buffer.delay() + taps.group_delay())
}
