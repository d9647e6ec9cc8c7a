//! Frame access and skin-region sampling.
//!
//! This module provides:
//! - `Frame` struct for raw RGB8 video frames
//! - `FrameSource` trait for pluggable pull-based frame acquisition
//! - `FrameSequence` for deterministic replay of recorded windows
//! - Forehead ROI derivation and observation-window sampling
//!
//! # Design
//!
//! The engine never talks to a camera directly. Callers implement
//! `FrameSource` over whatever acquisition backend they use (a live
//! capture device, a decoded video file, an in-memory recording) and the
//! sampler pulls frames from it for the configured window duration.

mod frame;
mod roi;

pub use frame::{Frame, FrameRead, FrameSequence, FrameSource};
pub use roi::{mean_rgb, sample_window, FaceBox, RgbWindow, RoiRect};
