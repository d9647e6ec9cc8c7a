//! Signal-processing stages of the estimation pipeline.
//!
//! - `conditioner` - linear detrend and z-normalization per channel
//! - `pos` - POS chrominance projection into a single pulse signal
//! - `filters` - zero-phase Butterworth band-pass
//! - `spectrum` - Hann-windowed FFT peak estimation with sub-bin
//!   refinement and dominance scoring

pub mod conditioner;
pub mod filters;
pub mod pos;
pub mod spectrum;

pub use conditioner::{condition, detrend_linear, std, zscore};
pub use filters::{BandpassFilter, FilterError};
pub use spectrum::{band_peak, hann_window, BandPeak};
