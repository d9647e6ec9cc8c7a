//! Hard-error types.
//!
//! Degraded measurement conditions (short windows, filter failures, empty
//! spectra) are not errors: they surface as low-confidence
//! [`Estimate`](crate::Estimate)s tagged with an
//! [`EstimateKind`](crate::EstimateKind). The only condition that
//! propagates as `Err` is a frame source that is itself broken.

use thiserror::Error;

/// Failure reported by a [`FrameSource`](crate::vision::FrameSource)
/// implementation.
#[derive(Debug, Error)]
pub enum FrameSourceError {
    /// The source is no longer usable (device gone, stream torn down).
    #[error("frame source unavailable: {0}")]
    Unavailable(String),
    /// The source produced data the engine cannot interpret.
    #[error("malformed frame data: {0}")]
    Malformed(String),
}

/// Hard error returned by [`VitalsEngine`](crate::VitalsEngine).
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    FrameSource(#[from] FrameSourceError),
}
