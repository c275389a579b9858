use super::signal::{Sample, SignalBuffer};
use crate::error::{Result, VorError};

/// Integer-factor decimation
///
/// Keeps every k-th sample starting at index 0, where `k = rate / output_rate`.
/// No anti-alias filtering is applied; lowpass the buffer below
/// `output_rate / 2` first. The accumulated delay is divided by `k` with
/// floor division, so up to one output sample of delay fraction is dropped.
///
/// # Errors
/// Returns `VorError::IncompatibleRate` if `output_rate` is zero or does not
/// divide the buffer's rate
pub fn decimate<T: Sample>(buffer: &SignalBuffer<T>, output_rate: u32) -> Result<SignalBuffer<T>> {
    let input_rate = buffer.rate();
    if output_rate == 0 || !input_rate.is_multiple_of(output_rate) {
        return Err(VorError::IncompatibleRate {
            input: input_rate,
            output: output_rate,
        });
    }

    let factor = (input_rate / output_rate) as usize;
    let samples = buffer.samples().iter().step_by(factor).copied().collect();

    log::debug!(
        "Decimated {} Hz -> {} Hz (factor {}), delay {} -> {}",
        input_rate,
        output_rate,
        factor,
        buffer.delay(),
        buffer.delay() / factor
    );

    Ok(SignalBuffer::from_parts(
        samples,
        output_rate,
        buffer.delay() / factor,
    ))
}
