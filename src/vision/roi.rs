//! Face box, forehead ROI derivation, and observation-window sampling.

use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::vision::frame::{Frame, FrameRead, FrameSource};

/// Forehead band as fractions of the face box: central 30% horizontally,
/// 12%..30% of box height vertically.
const FOREHEAD_X: (f64, f64) = (0.35, 0.65);
const FOREHEAD_Y: (f64, f64) = (0.12, 0.30);

/// Axis-aligned face bounding box in pixel coordinates, `x1 < x2`, `y1 < y2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaceBox {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl FaceBox {
    pub fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    pub fn width(&self) -> i32 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> i32 {
        self.y2 - self.y1
    }

    /// Top-left displacement (|dx| + |dy|) relative to another box.
    pub fn top_left_shift(&self, other: &FaceBox) -> i32 {
        (self.x1 - other.x1).abs() + (self.y1 - other.y1).abs()
    }

    /// Forehead sampling sub-rectangle, fractional corners truncated.
    pub fn forehead(&self) -> RoiRect {
        // f64 so the truncated corners match exact pixel fractions.
        let w = self.width() as f64;
        let h = self.height() as f64;
        RoiRect {
            x1: (self.x1 as f64 + w * FOREHEAD_X.0) as i32,
            x2: (self.x1 as f64 + w * FOREHEAD_X.1) as i32,
            y1: (self.y1 as f64 + h * FOREHEAD_Y.0) as i32,
            y2: (self.y1 as f64 + h * FOREHEAD_Y.1) as i32,
        }
    }
}

/// Half-open sampling rectangle `[x1, x2) x [y1, y2)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoiRect {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl RoiRect {
    /// Clip to frame bounds. The result may be empty.
    fn clipped(&self, width: u32, height: u32) -> RoiRect {
        RoiRect {
            x1: self.x1.clamp(0, width as i32),
            x2: self.x2.clamp(0, width as i32),
            y1: self.y1.clamp(0, height as i32),
            y2: self.y2.clamp(0, height as i32),
        }
    }

    fn is_empty(&self) -> bool {
        self.x2 <= self.x1 || self.y2 <= self.y1
    }
}

/// Mean RGB over the rectangle, `None` when it clips to nothing.
pub fn mean_rgb(frame: &Frame, rect: &RoiRect) -> Option<[f32; 3]> {
    let rect = rect.clipped(frame.width, frame.height);
    if rect.is_empty() {
        return None;
    }

    let mut sum = [0.0f64; 3];
    let stride = (frame.width * 3) as usize;
    for y in rect.y1..rect.y2 {
        let row = y as usize * stride;
        for x in rect.x1..rect.x2 {
            let idx = row + x as usize * 3;
            sum[0] += frame.data[idx] as f64;
            sum[1] += frame.data[idx + 1] as f64;
            sum[2] += frame.data[idx + 2] as f64;
        }
    }

    let count = ((rect.x2 - rect.x1) * (rect.y2 - rect.y1)) as f64;
    Some([
        (sum[0] / count) as f32,
        (sum[1] / count) as f32,
        (sum[2] / count) as f32,
    ])
}

/// Per-channel color traces collected over one observation window.
#[derive(Debug, Clone, Default)]
pub struct RgbWindow {
    pub r: Vec<f32>,
    pub g: Vec<f32>,
    pub b: Vec<f32>,
    pub timestamps_us: Vec<i64>,
}

impl RgbWindow {
    pub fn len(&self) -> usize {
        self.timestamps_us.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps_us.is_empty()
    }

    fn push(&mut self, rgb: [f32; 3], timestamp_us: i64) {
        self.r.push(rgb[0]);
        self.g.push(rgb[1]);
        self.b.push(rgb[2]);
        self.timestamps_us.push(timestamp_us);
    }

    /// Window elapsed time (first to last sample) in seconds.
    pub fn elapsed_s(&self) -> f32 {
        match (self.timestamps_us.first(), self.timestamps_us.last()) {
            (Some(first), Some(last)) => (last - first) as f32 / 1_000_000.0,
            _ => 0.0,
        }
    }

    /// True sampling rate in Hz, `None` when elapsed time is non-positive.
    pub fn sampling_rate(&self) -> Option<f32> {
        let elapsed = self.elapsed_s();
        if elapsed <= 0.0 {
            return None;
        }
        Some(self.len() as f32 / elapsed)
    }
}

/// Collect mean forehead color for up to `duration_s` of frames.
///
/// The window is bounded by frame timestamps relative to the first frame
/// read, so a recorded sequence replays identically. Frames with an empty
/// clipped ROI and skipped reads are dropped without error; the window
/// ends early when the source is exhausted or stalls for more than
/// `max_skipped_reads` consecutive polls.
pub fn sample_window(
    source: &mut dyn FrameSource,
    face_box: &FaceBox,
    duration_s: f32,
    config: &EngineConfig,
) -> Result<RgbWindow, EngineError> {
    let forehead = face_box.forehead();
    let duration_us = (duration_s as f64 * 1_000_000.0) as i64;

    let mut window = RgbWindow::default();
    let mut anchor_us: Option<i64> = None;
    let mut skipped = 0usize;

    loop {
        match source.read_frame()? {
            FrameRead::End => break,
            FrameRead::Skip => {
                skipped += 1;
                if skipped > config.max_skipped_reads {
                    log::warn!(
                        "frame source stalled after {} consecutive skipped reads",
                        skipped - 1
                    );
                    break;
                }
            }
            FrameRead::Frame(frame) => {
                skipped = 0;
                let anchor = *anchor_us.get_or_insert(frame.timestamp_us);
                if frame.timestamp_us - anchor >= duration_us {
                    break;
                }
                if let Some(rgb) = mean_rgb(&frame, &forehead) {
                    window.push(rgb, frame.timestamp_us);
                }
            }
        }
    }

    log::debug!(
        "sampled {} frames over {:.2}s",
        window.len(),
        window.elapsed_s()
    );
    Ok(window)
}
