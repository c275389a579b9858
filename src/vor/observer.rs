//! Diagnostic observers for intermediate pipeline signals.
//!
//! The decoder reports each stage's output to a [`StageObserver`]. Observers
//! only look at the signals; nothing they do feeds back into the bearing.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::wav::save_wav;

/// Receives intermediate signals as the decoder produces them
pub trait StageObserver: Send {
    fn observe(&mut self, title: &str, samples: &[f64], rate: u32, delay: usize);
}

/// Discards everything
pub struct NullObserver;

impl StageObserver for NullObserver {
    fn observe(&mut self, _title: &str, _samples: &[f64], _rate: u32, _delay: usize) {}
}

/// Logs a one-line summary of each stage at debug level
pub struct LogObserver;

impl StageObserver for LogObserver {
    fn observe(&mut self, title: &str, samples: &[f64], rate: u32, delay: usize) {
        let peak = samples.iter().fold(0.0f64, |a, &b| a.max(b.abs()));
        let rms = if samples.is_empty() {
            0.0
        } else {
            (samples.iter().map(|x| x * x).sum::<f64>() / samples.len() as f64).sqrt()
        };
        log::debug!(
            "{}: {} samples @ {} Hz, delay {}, peak {:.4}, rms {:.4}",
            title,
            samples.len(),
            rate,
            delay,
            peak,
            rms
        );
    }
}

/// Writes each stage to `<dir>/<NN>_<title>.wav`, peak-normalized
///
/// Write failures are logged and skipped.
pub struct WavDumpObserver {
    dir: PathBuf,
    written: Vec<PathBuf>,
}

impl WavDumpObserver {
    pub fn new<P: AsRef<Path>>(dir: P) -> std::io::Result<Self> {
        std::fs::create_dir_all(dir.as_ref())?;
        Ok(Self {
            dir: dir.as_ref().to_path_buf(),
            written: Vec::new(),
        })
    }

    /// Files written so far, in stage order
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    fn file_name(&self, title: &str) -> String {
        let slug: String = title
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
            .collect();
        format!("{:02}_{}.wav", self.written.len(), slug)
    }
}

impl StageObserver for WavDumpObserver {
    fn observe(&mut self, title: &str, samples: &[f64], rate: u32, _delay: usize) {
        let path = self.dir.join(self.file_name(title));
        match save_wav(&path, samples, rate, true) {
            Ok(()) => {
                log::debug!("Wrote {} to {}", title, path.display());
                self.written.push(path);
            }
            Err(e) => log::warn!("Failed to write {}: {}", path.display(), e),
        }
    }
}

/// Serializes observations from both pipeline paths when they run on
/// separate threads
pub(crate) struct SharedObserver<'a, 'o> {
    inner: &'a Mutex<&'o mut dyn StageObserver>,
}

impl<'a, 'o> SharedObserver<'a, 'o> {
    pub(crate) fn new(inner: &'a Mutex<&'o mut dyn StageObserver>) -> Self {
        Self { inner }
    }
}

impl StageObserver for SharedObserver<'_, '_> {
    fn observe(&mut self, title: &str, samples: &[f64], rate: u32, delay: usize) {
        let mut observer = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        observer.observe(title, samples, rate, delay);
    }
}
