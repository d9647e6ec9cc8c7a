//! Engine facade orchestrating one observation window.

use crate::config::EngineConfig;
use crate::dsp::{band_peak, condition, pos, BandpassFilter};
use crate::error::EngineError;
use crate::estimate::{Estimate, EstimateKind};
use crate::tracker::SessionTracker;
use crate::vision::{sample_window, FaceBox, FrameSource};

use ndarray::Array1;

/// Remote-photoplethysmography heart-rate engine.
///
/// One instance per tracked subject; each call to [`estimate`] blocks
/// while it samples frames for the configured window and then returns a
/// usable (possibly low-confidence) [`Estimate`]. Degraded conditions
/// never raise; only a broken frame source returns `Err`.
///
/// [`estimate`]: VitalsEngine::estimate
#[derive(Debug, Default)]
pub struct VitalsEngine {
    config: EngineConfig,
    tracker: SessionTracker,
}

impl VitalsEngine {
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            config,
            tracker: SessionTracker::new(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Estimate heart rate over one observation window.
    ///
    /// Samples frames from `source` for `duration_s` (the configured
    /// default when `None`), runs the conditioning / projection /
    /// filtering / spectral pipeline, and folds the result into the
    /// session state.
    pub fn estimate(
        &mut self,
        source: &mut dyn FrameSource,
        face_box: Option<FaceBox>,
        duration_s: Option<f32>,
    ) -> Result<Estimate, EngineError> {
        let config = self.config.clone();
        let duration_s = duration_s.unwrap_or(config.duration_s);

        let face_box = match face_box {
            Some(b) => b,
            None => {
                log::debug!("no face box supplied");
                return Ok(self.fallback(EstimateKind::NoFaceBox, config.no_face_confidence));
            }
        };

        // Motion check runs before the blocking sampling phase.
        self.tracker.observe_box(&face_box, &config);

        let window = sample_window(source, &face_box, duration_s, &config)?;
        if window.len() < config.min_samples {
            log::debug!(
                "window of {} samples below {} floor",
                window.len(),
                config.min_samples
            );
            return Ok(self.fallback(
                EstimateKind::InsufficientSamples,
                config.degraded_confidence,
            ));
        }

        let fs = match window.sampling_rate() {
            Some(fs) => fs,
            None => {
                return Ok(
                    self.fallback(EstimateKind::DegenerateTiming, config.degraded_confidence)
                )
            }
        };

        let r = condition(&Array1::from(window.r), config.epsilon);
        let g = condition(&Array1::from(window.g), config.epsilon);
        let b = condition(&Array1::from(window.b), config.epsilon);

        let pulse = pos::project(&r, &g, &b, config.epsilon);

        let filtered = match BandpassFilter::design(fs, config.band_low_hz, config.band_high_hz)
            .and_then(|f| f.apply_zero_phase(&pulse))
        {
            Ok(filtered) => filtered,
            Err(err) => {
                log::warn!("band-pass failed at {fs:.2} Hz: {err}");
                return Ok(
                    self.fallback(EstimateKind::FilterFailure, config.degraded_confidence)
                );
            }
        };

        let peak = match band_peak(
            &filtered,
            fs,
            config.band_low_hz,
            config.band_high_hz,
            config.epsilon,
        ) {
            Some(peak) => peak,
            None => {
                return Ok(
                    self.fallback(EstimateKind::NoSpectralEnergyInBand, config.no_band_confidence)
                )
            }
        };

        log::debug!(
            "raw peak {:.1} BPM (dominance {:.2}) at fs {:.2} Hz",
            peak.bpm,
            peak.dominance,
            fs
        );

        let tracked = self.tracker.finalize(peak.bpm, peak.dominance, &config);
        Ok(Estimate {
            heart_rate: Some(tracked.bpm),
            confidence: tracked.confidence,
            kind: if tracked.jump_rejected {
                EstimateKind::LargeJumpRejected
            } else {
                EstimateKind::Measured
            },
        })
    }

    fn fallback(&self, kind: EstimateKind, confidence: f32) -> Estimate {
        Estimate::fallback(kind, self.tracker.last_valid_bpm(), confidence)
    }
}
