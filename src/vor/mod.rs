pub mod bearing;
pub mod decoder;
pub mod observer;

pub use bearing::{BearingEstimator, BearingResult, valid_cross_correlation};
pub use decoder::{Decoded, VorDecoder};
pub use observer::{LogObserver, NullObserver, StageObserver, WavDumpObserver};
