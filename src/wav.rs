use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use hound::{WavReader, WavSpec, WavWriter};

use crate::constants::MIN_PEAK_THRESHOLD;
use crate::error::Result;
use crate::signal_processing::SignalBuffer;

/// Read the first channel of a WAV file
///
/// Integer PCM is scaled to [-1, 1); float samples are taken as-is. Any
/// further channels are ignored.
pub fn read_mono_wav<P: AsRef<Path>>(path: P) -> Result<SignalBuffer<f64>> {
    let reader = WavReader::open(path.as_ref())?;
    let spec = reader.spec();
    if spec.channels > 1 {
        log::info!(
            "{} has {} channels, using the first",
            path.as_ref().display(),
            spec.channels
        );
    }

    let interleaved = read_samples(reader, &spec)?;
    let samples = interleaved
        .into_iter()
        .step_by(spec.channels.max(1) as usize)
        .collect();

    SignalBuffer::new(samples, spec.sample_rate)
}

fn read_samples(mut reader: WavReader<BufReader<File>>, spec: &WavSpec) -> Result<Vec<f64>> {
    let samples = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .map(|s| s.map(f64::from))
            .collect::<std::result::Result<Vec<_>, _>>()?,
        hound::SampleFormat::Int => {
            let max_val = 2_i64.pow(spec.bits_per_sample as u32 - 1) as f64;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f64 / max_val))
                .collect::<std::result::Result<Vec<_>, _>>()?
        }
    };
    Ok(samples)
}

/// Write a mono 32-bit float WAV file
///
/// With `normalize_peak`, samples are scaled so the largest magnitude is 1.0.
pub fn save_wav<P: AsRef<Path>>(
    path: P,
    samples: &[f64],
    sample_rate: u32,
    normalize_peak: bool,
) -> Result<()> {
    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };

    let peak = samples.iter().fold(0.0f64, |a, &b| a.max(b.abs()));
    let scale = if normalize_peak && peak > MIN_PEAK_THRESHOLD {
        1.0 / peak
    } else {
        1.0
    };

    let mut writer = WavWriter::create(path, spec)?;
    for &sample in samples {
        writer.write_sample((sample * scale) as f32)?;
    }
    writer.finalize()?;
    Ok(())
}

/// Write a real signal buffer, optionally peak-normalized
pub fn save_signal<P: AsRef<Path>>(path: P, signal: &SignalBuffer<f64>, normalize_peak: bool) -> Result<()> {
    save_wav(path, signal.samples(), signal.rate(), normalize_peak)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("vordecoder_{}_{}.wav", name, std::process::id()))
    }

    #[test]
    fn test_save_and_read_normalized() {
        let path = temp_path("normalized");
        save_wav(&path, &[0.25, -0.5, 0.125], 6000, true).unwrap();

        let signal = read_mono_wav(&path).unwrap();
        assert_eq!(signal.rate(), 6000);
        assert_eq!(signal.delay(), 0);
        let expected = [0.5, -1.0, 0.25];
        for (a, b) in signal.samples().iter().zip(expected.iter()) {
            assert!((a - b).abs() < 1e-6);
        }
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_read_first_channel_of_stereo_pcm() {
        let path = temp_path("stereo");
        let spec = WavSpec {
            channels: 2,
            sample_rate: 48000,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = WavWriter::create(&path, spec).unwrap();
        for (left, right) in [(16384i16, -1i16), (-32768, 7), (0, 9)] {
            writer.write_sample(left).unwrap();
            writer.write_sample(right).unwrap();
        }
        writer.finalize().unwrap();

        let signal = read_mono_wav(&path).unwrap();
        assert_eq!(signal.rate(), 48000);
        assert_eq!(signal.samples(), &[0.5, -1.0, 0.0]);
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_missing_file_is_wav_error() {
        let result = read_mono_wav("/nonexistent/vordecoder/capture.wav");
        assert!(matches!(result, Err(crate::VorError::Wav(_))));
    }
}
