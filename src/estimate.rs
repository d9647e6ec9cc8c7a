//! Engine output record.

use serde::{Deserialize, Serialize};

/// Which branch of the pipeline produced an [`Estimate`].
///
/// The external contract is `{heart_rate, confidence}`; the tag exists so
/// callers (and tests) can tell a measured value from each degraded path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EstimateKind {
    /// Full pipeline ran and the new estimate was accepted.
    Measured,
    /// Full pipeline ran but the new estimate jumped too far from the
    /// previous one and was discarded in its favor.
    LargeJumpRejected,
    /// No face box was supplied.
    NoFaceBox,
    /// Fewer samples were collected than the configured floor.
    InsufficientSamples,
    /// Window elapsed time was non-positive.
    DegenerateTiming,
    /// Band-pass filter could not be designed or applied.
    FilterFailure,
    /// No spectral bin fell inside the cardiac band.
    NoSpectralEnergyInBand,
}

/// Heart-rate estimate for one observation window.
///
/// `heart_rate` is `None` only when the engine degraded before ever
/// producing a valid measurement; once a measurement exists it is sticky
/// and reported as the floor on subsequent degraded windows.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Estimate {
    /// Heart rate in BPM, clamped to the configured output range.
    pub heart_rate: Option<u32>,
    /// Confidence in `[0.1, 0.95]` across all paths.
    pub confidence: f32,
    /// Branch that produced this estimate.
    pub kind: EstimateKind,
}

impl Estimate {
    /// Degraded estimate falling back to the last valid measurement.
    pub(crate) fn fallback(kind: EstimateKind, last_valid: Option<u32>, confidence: f32) -> Self {
        Self {
            heart_rate: last_valid,
            confidence,
            kind,
        }
    }

    /// True when the window was actually measured (including a rejected
    /// jump, which still reports a heart rate).
    pub fn is_measured(&self) -> bool {
        matches!(
            self.kind,
            EstimateKind::Measured | EstimateKind::LargeJumpRejected
        )
    }
}
