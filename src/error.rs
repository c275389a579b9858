use thiserror::Error;

#[derive(Error, Debug)]
pub enum VorError {
    #[error("Invalid filter spec: {0}")]
    InvalidSpec(String),

    #[error("Incompatible rate: cannot decimate {input} Hz to {output} Hz by an integer factor")]
    IncompatibleRate { input: u32, output: u32 },

    #[error("Rate mismatch: reference at {reference} Hz, variable at {variable} Hz")]
    RateMismatch { reference: u32, variable: u32 },

    #[error("Insufficient signal: need {needed} samples, have {available}")]
    InsufficientSignal { needed: usize, available: usize },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, VorError>;
