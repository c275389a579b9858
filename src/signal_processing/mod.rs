pub mod demod;
pub mod filter_design;
pub mod fir;
pub mod math;
pub mod resample;
pub mod signal;

pub use demod::{instantaneous_phase, shift_to_baseband, unwrap_phase};
pub use filter_design::{FilterBand, FilterSpec, FilterTaps, design_bandpass, design_lowpass};
pub use fir::{FirFilterCore, apply};
pub use math::{angle_error, circular_mean_degrees, normalize_degrees, offset_to_bearing};
pub use resample::decimate;
pub use signal::{Sample, SignalBuffer};
