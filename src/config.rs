//! Engine configuration.
//!
//! Every empirical constant of the estimation pipeline lives here so that
//! the thresholds are visible and overridable in one place. The defaults
//! reproduce the tuning the engine ships with; they are not derived from
//! first principles, so treat them as calibration data.

use serde::{Deserialize, Serialize};

/// Configuration for [`VitalsEngine`](crate::VitalsEngine).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Observation window length in seconds.
    pub duration_s: f32,
    /// Minimum accepted samples for a window to proceed past conditioning.
    pub min_samples: usize,
    /// Maximum consecutive failed reads tolerated before the window ends early.
    pub max_skipped_reads: usize,

    /// Low edge of the cardiac band (Hz). 0.8 Hz = 48 BPM.
    pub band_low_hz: f32,
    /// High edge of the cardiac band (Hz). 3.0 Hz = 180 BPM.
    pub band_high_hz: f32,

    /// Top-left box displacement (|dx| + |dy|, pixels) that clears the
    /// smoothing anchor.
    pub motion_reset_px: i32,

    /// Raw estimates below this (BPM) are candidates for half-rate
    /// harmonic doubling.
    pub harmonic_low_bpm: f32,
    /// Harmonic doubling only fires when the previous estimate exceeds
    /// this (BPM).
    pub harmonic_prev_bpm: f32,

    /// Hard output range (BPM); out-of-range estimates are clamped, not
    /// rejected.
    pub bpm_min: f32,
    pub bpm_max: f32,

    /// New-vs-previous difference (BPM) above which the new estimate is
    /// discarded as noise.
    pub max_jump_bpm: f32,
    /// Weight of the previous estimate when blending accepted updates.
    pub smoothing_weight: f32,
    /// Confidence multiplier applied when a jump is rejected.
    pub jump_confidence_penalty: f32,

    /// Confidence bounds for a measured estimate.
    pub min_confidence: f32,
    pub max_confidence: f32,

    /// Confidence reported when no face box is supplied.
    pub no_face_confidence: f32,
    /// Confidence reported for short windows, degenerate timing, and
    /// filter failures.
    pub degraded_confidence: f32,
    /// Confidence reported when no spectral bin falls in the cardiac band.
    pub no_band_confidence: f32,

    /// Divide-by-zero guard used throughout the pipeline.
    pub epsilon: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            duration_s: 12.0,
            min_samples: 60,
            max_skipped_reads: 1024,
            band_low_hz: 0.8,
            band_high_hz: 3.0,
            motion_reset_px: 12,
            harmonic_low_bpm: 65.0,
            harmonic_prev_bpm: 75.0,
            bpm_min: 45.0,
            bpm_max: 180.0,
            max_jump_bpm: 20.0,
            smoothing_weight: 0.7,
            jump_confidence_penalty: 0.6,
            min_confidence: 0.3,
            max_confidence: 0.95,
            no_face_confidence: 0.1,
            degraded_confidence: 0.2,
            no_band_confidence: 0.3,
            epsilon: 1e-6,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_shipped_tuning() {
        let cfg = EngineConfig::default();
        assert_eq!(cfg.min_samples, 60);
        assert!((cfg.duration_s - 12.0).abs() < f32::EPSILON);
        assert!((cfg.band_low_hz - 0.8).abs() < f32::EPSILON);
        assert!((cfg.band_high_hz - 3.0).abs() < f32::EPSILON);
        assert_eq!(cfg.motion_reset_px, 12);
        assert!((cfg.max_jump_bpm - 20.0).abs() < f32::EPSILON);
    }
}
