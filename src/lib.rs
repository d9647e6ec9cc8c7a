//! # pulsecam
//!
//! Remote photoplethysmography (rPPG): estimating heart rate from the
//! subtle skin-color changes a blood pulse causes in ordinary RGB video,
//! with no contact sensor.
//!
//! The crate provides:
//! - **POS projection**: motion/lighting-robust chrominance combination
//!   of the forehead color traces (Wang et al., 2017)
//! - **DSP stages**: detrending, zero-phase Butterworth band-pass, and
//!   FFT peak estimation with sub-bin refinement
//! - **Session tracking**: harmonic-ambiguity correction, temporal
//!   smoothing, and motion-triggered resets across successive windows
//!
//! ## Example
//!
//! ```ignore
//! use pulsecam::{FaceBox, VitalsEngine};
//!
//! let mut engine = VitalsEngine::new();
//! let face = FaceBox::new(180, 90, 460, 420); // from an external detector
//!
//! // Blocks while sampling frames for the default 12 s window.
//! let estimate = engine.estimate(&mut camera, Some(face), None)?;
//! if let Some(bpm) = estimate.heart_rate {
//!     println!("{} BPM (confidence {:.2})", bpm, estimate.confidence);
//! }
//! ```
//!
//! The engine always answers: every degraded condition (no face, short
//! window, unusable frame rate, empty cardiac band) is a modeled
//! low-confidence [`Estimate`] carrying the last valid measurement, not
//! an error. Only a broken [`FrameSource`] propagates as
//! [`EngineError`].

pub mod config;
pub mod dsp;
pub mod engine;
pub mod error;
pub mod estimate;
pub mod tracker;
pub mod vision;

pub use config::EngineConfig;
pub use engine::VitalsEngine;
pub use error::{EngineError, FrameSourceError};
pub use estimate::{Estimate, EstimateKind};
pub use tracker::SessionTracker;
pub use vision::{FaceBox, Frame, FrameRead, FrameSequence, FrameSource};
