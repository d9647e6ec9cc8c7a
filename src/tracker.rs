//! Session state carried between estimate calls for one subject.
//!
//! The tracker owns the three pieces of cross-call memory: the smoothing
//! anchor (`previous_bpm`, cleared on large face motion), the sticky
//! fallback (`last_valid_bpm`, never cleared by motion), and the last
//! face box (for the motion delta). It applies harmonic-ambiguity
//! correction, output clamping, dominance-based confidence scoring, and
//! temporal smoothing to each raw spectral estimate.

use crate::config::EngineConfig;
use crate::vision::FaceBox;

/// Raw estimate after tracker post-processing.
#[derive(Debug, Clone, Copy)]
pub struct TrackedEstimate {
    /// Final integer BPM (truncated, clamped, possibly smoothed).
    pub bpm: u32,
    /// Dominance-derived confidence, penalized when a jump was rejected.
    pub confidence: f32,
    /// True when the new estimate was discarded in favor of the previous
    /// one.
    pub jump_rejected: bool,
}

/// Per-subject temporal state. One tracker per physical subject; calls
/// must be serialized by the owner.
#[derive(Debug, Clone, Default)]
pub struct SessionTracker {
    previous_bpm: Option<u32>,
    last_valid_bpm: Option<u32>,
    previous_box: Option<FaceBox>,
}

impl SessionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sticky fallback value reported on degraded windows.
    pub fn last_valid_bpm(&self) -> Option<u32> {
        self.last_valid_bpm
    }

    /// Smoothing anchor, if one survived the last motion check.
    pub fn previous_bpm(&self) -> Option<u32> {
        self.previous_bpm
    }

    /// Motion check, run before sampling.
    ///
    /// A top-left displacement above the configured threshold clears the
    /// smoothing anchor so the next estimate starts fresh;
    /// `last_valid_bpm` survives as the degraded-path floor. The current
    /// box is always stored for the next delta.
    pub fn observe_box(&mut self, face_box: &FaceBox, config: &EngineConfig) {
        if let Some(prev) = &self.previous_box {
            let shift = face_box.top_left_shift(prev);
            if shift > config.motion_reset_px {
                log::debug!("face moved {shift}px, clearing smoothing anchor");
                self.previous_bpm = None;
            }
        }
        self.previous_box = Some(*face_box);
    }

    /// Fold a raw spectral estimate into the session.
    pub fn finalize(
        &mut self,
        raw_bpm: f32,
        dominance: f32,
        config: &EngineConfig,
    ) -> TrackedEstimate {
        let anchor = self.previous_bpm.map(|b| b as f32);

        let mut bpm = harmonic_correct(raw_bpm, anchor, config);
        bpm = bpm.clamp(config.bpm_min, config.bpm_max);

        let mut confidence =
            (dominance / 2.0).clamp(config.min_confidence, config.max_confidence);

        let mut jump_rejected = false;
        if let Some(prev) = anchor {
            if (bpm - prev).abs() > config.max_jump_bpm {
                // A jump this large over one window is noise, not a real
                // rate change.
                bpm = prev;
                confidence *= config.jump_confidence_penalty;
                jump_rejected = true;
            } else {
                bpm = config.smoothing_weight * prev + (1.0 - config.smoothing_weight) * bpm;
            }
        }

        let bpm_int = bpm as u32;
        self.previous_bpm = Some(bpm_int);
        self.last_valid_bpm = Some(bpm_int);

        TrackedEstimate {
            bpm: bpm_int,
            confidence,
            jump_rejected,
        }
    }
}

/// Double a suspiciously low estimate when the previous one was high,
/// correcting the common half-rate spectral ambiguity.
fn harmonic_correct(raw_bpm: f32, previous_bpm: Option<f32>, config: &EngineConfig) -> f32 {
    match previous_bpm {
        Some(prev) if raw_bpm < config.harmonic_low_bpm && prev > config.harmonic_prev_bpm => {
            raw_bpm * 2.0
        }
        _ => raw_bpm,
    }
}
