//! Synthetic VOR captures for tests and the `generate_vor_wav` tool.

mod measure;
mod noise;
mod signal;

pub use measure::{ErrorStats, measure_bearing_error, measure_error_across_bearings};
pub use noise::{add_awgn, create_rng, signal_power};
pub use signal::{
    DEFAULT_MODULATION_INDEX, VorSignalParams, generate_vor_signal,
    generate_vor_signal_with_bearing_fn,
};
