//! End-to-end tests driving the engine with synthetic frame sequences.

use pulsecam::{
    EstimateKind, FaceBox, Frame, FrameRead, FrameSequence, FrameSource, FrameSourceError,
    VitalsEngine,
};
use std::f32::consts::PI;

const WIDTH: u32 = 320;
const HEIGHT: u32 = 240;
const FPS: f32 = 30.0;

fn face_box() -> FaceBox {
    FaceBox::new(80, 40, 240, 200)
}

/// Uniform frames whose green/blue channels oscillate in antiphase at
/// `hz`, which the POS projection picks up as a pulse.
fn pulse_frames(hz: f32, seconds: f32) -> Vec<Frame> {
    let count = (seconds * FPS).round() as usize;
    (0..count)
        .map(|i| {
            let t = i as f32 / FPS;
            let wave = 10.0 * (2.0 * PI * hz * t).sin();
            let g = (128.0 + wave).round() as u8;
            let b = (128.0 - wave).round() as u8;
            Frame::solid(WIDTH, HEIGHT, [128, g, b], (t * 1_000_000.0) as i64)
        })
        .collect()
}

fn assert_in_contract(estimate: &pulsecam::Estimate) {
    if let Some(bpm) = estimate.heart_rate {
        assert!((45..=180).contains(&bpm), "bpm {bpm} out of range");
    }
    assert!(
        (0.1..=0.95).contains(&estimate.confidence),
        "confidence {} out of range",
        estimate.confidence
    );
}

#[test]
fn recovers_72_bpm_from_synthetic_pulse() {
    let mut engine = VitalsEngine::new();
    let mut source = FrameSequence::new(pulse_frames(1.2, 13.0));

    let estimate = engine.estimate(&mut source, Some(face_box()), None).unwrap();
    assert_in_contract(&estimate);
    assert_eq!(estimate.kind, EstimateKind::Measured);

    let bpm = estimate.heart_rate.expect("measured window has a rate");
    assert!((69..=75).contains(&bpm), "expected ~72 BPM, got {bpm}");
}

#[test]
fn no_face_box_returns_low_confidence_fallback() {
    let mut engine = VitalsEngine::new();
    let mut source = FrameSequence::new(pulse_frames(1.2, 13.0));

    let estimate = engine.estimate(&mut source, None, None).unwrap();
    assert_eq!(estimate.kind, EstimateKind::NoFaceBox);
    assert_eq!(estimate.heart_rate, None);
    assert!((estimate.confidence - 0.1).abs() < 1e-6);
}

#[test]
fn last_valid_bpm_survives_as_fallback_floor() {
    let mut engine = VitalsEngine::new();

    let mut source = FrameSequence::new(pulse_frames(1.2, 13.0));
    let first = engine.estimate(&mut source, Some(face_box()), None).unwrap();
    let measured = first.heart_rate.unwrap();

    let mut empty = FrameSequence::default();
    let degraded = engine.estimate(&mut empty, None, None).unwrap();
    assert_eq!(degraded.kind, EstimateKind::NoFaceBox);
    assert_eq!(degraded.heart_rate, Some(measured));
}

#[test]
fn short_window_yields_insufficient_samples() {
    let mut engine = VitalsEngine::new();
    // 40 frames, well under the 60-sample floor.
    let mut source = FrameSequence::new(pulse_frames(1.2, 40.0 / FPS));

    let estimate = engine.estimate(&mut source, Some(face_box()), None).unwrap();
    assert_eq!(estimate.kind, EstimateKind::InsufficientSamples);
    assert_eq!(estimate.heart_rate, None);
    assert!((estimate.confidence - 0.2).abs() < 1e-6);
}

#[test]
fn exactly_sixty_samples_proceeds_past_conditioning() {
    let mut engine = VitalsEngine::new();
    let mut source = FrameSequence::new(pulse_frames(1.2, 60.0 / FPS));

    let estimate = engine.estimate(&mut source, Some(face_box()), None).unwrap();
    // The floor is "fewer than 60", so 60 samples run the full pipeline.
    assert!(estimate.is_measured(), "kind {:?}", estimate.kind);
    assert_in_contract(&estimate);
}

#[test]
fn constant_timestamps_yield_degenerate_timing() {
    let mut engine = VitalsEngine::new();
    let frames: Vec<Frame> = (0..70)
        .map(|_| Frame::solid(WIDTH, HEIGHT, [128, 128, 128], 0))
        .collect();
    let mut source = FrameSequence::new(frames);

    let estimate = engine.estimate(&mut source, Some(face_box()), None).unwrap();
    assert_eq!(estimate.kind, EstimateKind::DegenerateTiming);
    assert!((estimate.confidence - 0.2).abs() < 1e-6);
}

#[test]
fn frame_rate_too_low_for_band_yields_filter_failure() {
    let mut engine = VitalsEngine::new();
    // 5 fps puts Nyquist at 2.5 Hz, below the 3 Hz band edge.
    let frames: Vec<Frame> = (0..75)
        .map(|i| Frame::solid(WIDTH, HEIGHT, [128, 128, 128], i * 200_000))
        .collect();
    let mut source = FrameSequence::new(frames);

    let estimate = engine.estimate(&mut source, Some(face_box()), None).unwrap();
    assert_eq!(estimate.kind, EstimateKind::FilterFailure);
    assert!((estimate.confidence - 0.2).abs() < 1e-6);
}

#[test]
fn large_jump_rejected_in_favor_of_previous() {
    let mut engine = VitalsEngine::new();

    let mut first = FrameSequence::new(pulse_frames(1.2, 13.0));
    let a = engine.estimate(&mut first, Some(face_box()), None).unwrap();
    let first_bpm = a.heart_rate.unwrap();

    // 2.0 Hz = 120 BPM, a >20 BPM jump from ~72.
    let mut second = FrameSequence::new(pulse_frames(2.0, 13.0));
    let b = engine.estimate(&mut second, Some(face_box()), None).unwrap();

    assert_eq!(b.kind, EstimateKind::LargeJumpRejected);
    assert_eq!(b.heart_rate, Some(first_bpm));
    // Penalized by 0.6x, from a confidence capped at 0.95.
    assert!(b.confidence <= 0.95 * 0.6 + 1e-6);
    assert_in_contract(&b);
}

#[test]
fn face_motion_clears_smoothing_anchor() {
    let mut engine = VitalsEngine::new();

    let mut first = FrameSequence::new(pulse_frames(1.2, 13.0));
    engine.estimate(&mut first, Some(face_box()), None).unwrap();

    // Box shifted 20 px: anchor cleared, so the 90 BPM window is neither
    // jump-rejected nor blended toward 72.
    let moved = FaceBox::new(100, 40, 260, 200);
    let mut second = FrameSequence::new(pulse_frames(1.5, 13.0));
    let b = engine.estimate(&mut second, Some(moved), None).unwrap();

    assert_eq!(b.kind, EstimateKind::Measured);
    let bpm = b.heart_rate.unwrap();
    assert!((87..=93).contains(&bpm), "expected ~90 BPM, got {bpm}");
}

#[test]
fn replaying_a_window_is_idempotent() {
    let frames = pulse_frames(1.2, 13.0);

    let mut engine_a = VitalsEngine::new();
    let mut source_a = FrameSequence::new(frames.clone());
    let a = engine_a
        .estimate(&mut source_a, Some(face_box()), None)
        .unwrap();

    let mut engine_b = VitalsEngine::new();
    let mut source_b = FrameSequence::new(frames);
    let b = engine_b
        .estimate(&mut source_b, Some(face_box()), None)
        .unwrap();

    assert_eq!(a, b);
}

#[test]
fn skipped_reads_are_tolerated() {
    struct Flaky {
        inner: FrameSequence,
        polls: usize,
    }
    impl FrameSource for Flaky {
        fn read_frame(&mut self) -> Result<FrameRead, FrameSourceError> {
            self.polls += 1;
            // Every third poll fails transiently.
            if self.polls % 3 == 0 {
                return Ok(FrameRead::Skip);
            }
            self.inner.read_frame()
        }
    }

    let mut engine = VitalsEngine::new();
    let mut source = Flaky {
        inner: FrameSequence::new(pulse_frames(1.2, 13.0)),
        polls: 0,
    };

    let estimate = engine.estimate(&mut source, Some(face_box()), None).unwrap();
    assert_eq!(estimate.kind, EstimateKind::Measured);
    let bpm = estimate.heart_rate.unwrap();
    assert!((69..=75).contains(&bpm), "expected ~72 BPM, got {bpm}");
}

#[test]
fn broken_source_propagates_hard_error() {
    struct Broken;
    impl FrameSource for Broken {
        fn read_frame(&mut self) -> Result<FrameRead, FrameSourceError> {
            Err(FrameSourceError::Unavailable("device gone".into()))
        }
    }

    let mut engine = VitalsEngine::new();
    let result = engine.estimate(&mut Broken, Some(face_box()), None);
    assert!(result.is_err());
}
