//! Spectral peak estimation for the filtered pulse signal.
//!
//! Applies a Hann window, takes the real half-spectrum, restricts it to
//! the cardiac band, and locates the dominant peak with sub-bin precision
//! via parabolic interpolation. Also reports the dominance ratio of the
//! two strongest in-band bins, which the tracker uses as a confidence
//! proxy.

use ndarray::Array1;
use num_complex::Complex32;
use rustfft::FftPlanner;
use std::f32::consts::PI;

/// Dominant in-band spectral peak.
#[derive(Debug, Clone, Copy)]
pub struct BandPeak {
    /// Peak frequency converted to beats per minute.
    pub bpm: f32,
    /// Strongest over second-strongest in-band magnitude.
    pub dominance: f32,
}

/// Symmetric Hann window of length `n`.
pub fn hann_window(n: usize) -> Array1<f32> {
    if n < 2 {
        return Array1::ones(n);
    }
    (0..n)
        .map(|i| 0.5 * (1.0 - (2.0 * PI * i as f32 / (n - 1) as f32).cos()))
        .collect()
}

/// Refine a peak index from the magnitudes at the peak and its neighbors.
///
/// Returns the index unchanged when the peak sits at either end of the
/// slice or the three points are collinear.
pub(crate) fn parabolic_interpolation(magnitudes: &[f32], idx: usize) -> f32 {
    if idx == 0 || idx + 1 >= magnitudes.len() {
        return idx as f32;
    }
    let left = magnitudes[idx - 1];
    let center = magnitudes[idx];
    let right = magnitudes[idx + 1];
    let denom = left - 2.0 * center + right;
    if denom == 0.0 {
        return idx as f32;
    }
    idx as f32 + 0.5 * (left - right) / denom
}

/// Locate the dominant peak inside `[low, high]` Hz.
///
/// Returns `None` when no frequency bin falls inside the band (the
/// window is too short or the rate too odd to resolve it).
pub fn band_peak(
    signal: &Array1<f32>,
    fs: f32,
    low: f32,
    high: f32,
    epsilon: f32,
) -> Option<BandPeak> {
    let n = signal.len();
    if n < 2 || fs <= 0.0 {
        return None;
    }

    let window = hann_window(n);
    let mut buffer: Vec<Complex32> = signal
        .iter()
        .zip(window.iter())
        .map(|(s, w)| Complex32::new(s * w, 0.0))
        .collect();

    let mut planner = FftPlanner::new();
    planner.plan_fft_forward(n).process(&mut buffer);

    // Real half-spectrum restricted to the band.
    let bin_hz = fs / n as f32;
    let mut freqs = Vec::new();
    let mut mags = Vec::new();
    for (i, c) in buffer.iter().take(n / 2 + 1).enumerate() {
        let f = i as f32 * bin_hz;
        if f >= low && f <= high {
            freqs.push(f);
            mags.push(c.norm());
        }
    }
    if mags.is_empty() {
        return None;
    }

    let peak_idx = mags
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.total_cmp(b.1))
        .map(|(i, _)| i)
        .unwrap_or(0);

    let refined = parabolic_interpolation(&mags, peak_idx).max(0.0);
    let i0 = (refined.floor() as usize).min(freqs.len() - 1);
    let hz = if i0 + 1 < freqs.len() {
        freqs[i0] + (refined - i0 as f32) * (freqs[i0 + 1] - freqs[i0])
    } else {
        freqs[i0]
    };

    let dominance = if mags.len() >= 2 {
        let mut sorted = mags.clone();
        sorted.sort_by(f32::total_cmp);
        sorted[sorted.len() - 1] / (sorted[sorted.len() - 2] + epsilon)
    } else {
        1.0
    };

    Some(BandPeak {
        bpm: hz * 60.0,
        dominance,
    })
}
