pub mod config;
pub mod constants;
pub mod error;
pub mod output;
pub mod signal_processing;
pub mod vor;
pub mod wav;

#[cfg(feature = "simulation")]
pub mod simulation;

pub use config::VorConfig;
pub use error::{Result, VorError};
pub use vor::{BearingEstimator, BearingResult, Decoded, VorDecoder};
pub use wav::{read_mono_wav, save_wav};
