//! Frame buffer and pull-based frame sources.

use crate::error::FrameSourceError;

/// Raw RGB8 video frame.
#[derive(Debug, Clone)]
pub struct Frame {
    /// Row-major RGB8 pixel data.
    pub data: Vec<u8>,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Capture timestamp in microseconds.
    pub timestamp_us: i64,
}

impl Frame {
    /// Create a frame from raw RGB8 data.
    ///
    /// # Panics
    /// Panics when `data.len() != width * height * 3`.
    pub fn new(data: Vec<u8>, width: u32, height: u32, timestamp_us: i64) -> Self {
        assert_eq!(
            data.len(),
            (width * height * 3) as usize,
            "frame data size mismatch"
        );
        Self {
            data,
            width,
            height,
            timestamp_us,
        }
    }

    /// Frame filled with a single color.
    pub fn solid(width: u32, height: u32, rgb: [u8; 3], timestamp_us: i64) -> Self {
        let mut data = Vec::with_capacity((width * height * 3) as usize);
        for _ in 0..width * height {
            data.extend_from_slice(&rgb);
        }
        Self {
            data,
            width,
            height,
            timestamp_us,
        }
    }

    /// Pixel at (x, y) as [R, G, B]; black outside the frame.
    #[inline]
    pub fn get_pixel(&self, x: u32, y: u32) -> [u8; 3] {
        if x >= self.width || y >= self.height {
            return [0, 0, 0];
        }
        let idx = ((y * self.width + x) * 3) as usize;
        [self.data[idx], self.data[idx + 1], self.data[idx + 2]]
    }
}

/// Result of polling a [`FrameSource`] once.
#[derive(Debug, Clone)]
pub enum FrameRead {
    /// A frame was read.
    Frame(Frame),
    /// The read failed transiently; the caller should poll again.
    Skip,
    /// The source has no more frames.
    End,
}

/// Pull-based frame capability.
///
/// Implementations own any blocking behavior (a live camera blocks until
/// the next frame; a recorded sequence returns immediately). A transient
/// read failure is `Ok(FrameRead::Skip)`; only a source that is itself
/// broken returns `Err`, which the engine propagates as a hard error.
pub trait FrameSource {
    /// Read the next frame, report a skipped read, or signal exhaustion.
    fn read_frame(&mut self) -> Result<FrameRead, FrameSourceError>;
}

/// Restartable in-memory frame sequence.
///
/// Replays a recorded window deterministically; `rewind` restarts it from
/// the first frame so the same window can be fed through several engines.
#[derive(Debug, Clone, Default)]
pub struct FrameSequence {
    frames: Vec<Frame>,
    cursor: usize,
}

impl FrameSequence {
    pub fn new(frames: Vec<Frame>) -> Self {
        Self { frames, cursor: 0 }
    }

    /// Restart playback from the first frame.
    pub fn rewind(&mut self) {
        self.cursor = 0;
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

impl FrameSource for FrameSequence {
    fn read_frame(&mut self) -> Result<FrameRead, FrameSourceError> {
        match self.frames.get(self.cursor) {
            Some(frame) => {
                self.cursor += 1;
                Ok(FrameRead::Frame(frame.clone()))
            }
            None => Ok(FrameRead::End),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solid_frame_pixels() {
        let frame = Frame::solid(4, 3, [10, 20, 30], 0);
        assert_eq!(frame.data.len(), 4 * 3 * 3);
        assert_eq!(frame.get_pixel(2, 1), [10, 20, 30]);
        assert_eq!(frame.get_pixel(9, 9), [0, 0, 0]);
    }

    #[test]
    fn sequence_replays_then_ends() {
        let mut seq = FrameSequence::new(vec![
            Frame::solid(2, 2, [1, 2, 3], 0),
            Frame::solid(2, 2, [4, 5, 6], 1),
        ]);

        assert!(matches!(seq.read_frame(), Ok(FrameRead::Frame(_))));
        assert!(matches!(seq.read_frame(), Ok(FrameRead::Frame(_))));
        assert!(matches!(seq.read_frame(), Ok(FrameRead::End)));

        seq.rewind();
        assert!(matches!(seq.read_frame(), Ok(FrameRead::Frame(_))));
    }
}
