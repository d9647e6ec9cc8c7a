//! Band-limited filtering for the pulse signal.
//!
//! Implements a 3rd-order Butterworth band-pass as a cascade of true
//! 3rd-order high-pass and low-pass halves (a first-order section plus a
//! Q=1 biquad each, bilinear transform with frequency prewarping), applied
//! zero-phase by running the cascade forward and backward over an
//! odd-reflection padded copy of the signal.

use ndarray::Array1;
use thiserror::Error;

/// Extra samples mirrored onto each end before the forward-backward pass,
/// sized to absorb the cascade's startup transient.
const PAD_LEN: usize = 21;

/// Band-pass design or application failure. The engine maps any of these
/// to a degraded low-confidence estimate rather than an error.
#[derive(Debug, Error)]
pub enum FilterError {
    #[error("band [{low}, {high}] Hz does not fit below the Nyquist rate {nyquist} Hz")]
    InvalidBand { low: f32, high: f32, nyquist: f32 },
    #[error("signal of {len} samples is too short to filter (need > {min})")]
    WindowTooShort { len: usize, min: usize },
}

/// Second-order section in direct form I; first-order sections set the
/// trailing coefficients to zero.
#[derive(Debug, Clone, Copy)]
struct Section {
    b0: f32,
    b1: f32,
    b2: f32,
    a1: f32,
    a2: f32,
}

impl Section {
    fn apply(&self, signal: &mut [f32]) {
        let (mut x1, mut x2) = (0.0f32, 0.0f32);
        let (mut y1, mut y2) = (0.0f32, 0.0f32);
        for x in signal.iter_mut() {
            let x0 = *x;
            let y0 = self.b0 * x0 + self.b1 * x1 + self.b2 * x2 - self.a1 * y1 - self.a2 * y2;
            x2 = x1;
            x1 = x0;
            y2 = y1;
            y1 = y0;
            *x = y0;
        }
    }
}

/// Prewarped bilinear-transform constant for cutoff `fc` at rate `fs`.
fn prewarp(fc: f32, fs: f32) -> f32 {
    (std::f32::consts::PI * fc / fs).tan()
}

/// First-order Butterworth section (analog pole at s = -1).
fn first_order(fc: f32, fs: f32, highpass: bool) -> Section {
    let k = prewarp(fc, fs);
    let norm = 1.0 / (1.0 + k);
    let (b0, b1) = if highpass {
        (norm, -norm)
    } else {
        (k * norm, k * norm)
    };
    Section {
        b0,
        b1,
        b2: 0.0,
        a1: (k - 1.0) * norm,
        a2: 0.0,
    }
}

/// Biquad for the quadratic factor of the 3rd-order Butterworth
/// prototype (s^2 + s + 1, i.e. Q = 1).
fn second_order(fc: f32, fs: f32, highpass: bool) -> Section {
    let k = prewarp(fc, fs);
    let k2 = k * k;
    let q = 1.0f32;
    let norm = 1.0 / (1.0 + k / q + k2);
    let (b0, b1, b2) = if highpass {
        (norm, -2.0 * norm, norm)
    } else {
        (k2 * norm, 2.0 * k2 * norm, k2 * norm)
    };
    Section {
        b0,
        b1,
        b2,
        a1: 2.0 * (k2 - 1.0) * norm,
        a2: (1.0 - k / q + k2) * norm,
    }
}

/// 3rd-order Butterworth band-pass, applied zero-phase.
#[derive(Debug, Clone)]
pub struct BandpassFilter {
    sections: [Section; 4],
}

impl BandpassFilter {
    /// Design the filter for `low..high` Hz at sampling rate `fs`.
    ///
    /// Fails when the band does not fit strictly inside (0, fs/2), which
    /// happens when the observed frame rate is too low for the cardiac
    /// band.
    pub fn design(fs: f32, low: f32, high: f32) -> Result<Self, FilterError> {
        let nyquist = fs / 2.0;
        if !(fs.is_finite() && low > 0.0 && low < high && high < nyquist) {
            return Err(FilterError::InvalidBand { low, high, nyquist });
        }
        Ok(Self {
            sections: [
                first_order(low, fs, true),
                second_order(low, fs, true),
                first_order(high, fs, false),
                second_order(high, fs, false),
            ],
        })
    }

    /// Apply the cascade forward and backward (zero phase).
    ///
    /// The signal is extended on both ends with odd reflections before
    /// filtering so the startup transient lands in the padding.
    pub fn apply_zero_phase(&self, signal: &Array1<f32>) -> Result<Array1<f32>, FilterError> {
        let n = signal.len();
        if n <= PAD_LEN {
            return Err(FilterError::WindowTooShort { len: n, min: PAD_LEN });
        }

        let mut padded = Vec::with_capacity(n + 2 * PAD_LEN);
        let first = signal[0];
        let last = signal[n - 1];
        for i in (1..=PAD_LEN).rev() {
            padded.push(2.0 * first - signal[i]);
        }
        padded.extend(signal.iter().copied());
        for i in 1..=PAD_LEN {
            padded.push(2.0 * last - signal[n - 1 - i]);
        }

        self.run_cascade(&mut padded);
        padded.reverse();
        self.run_cascade(&mut padded);
        padded.reverse();

        Ok(Array1::from_iter(
            padded[PAD_LEN..PAD_LEN + n].iter().copied(),
        ))
    }

    fn run_cascade(&self, signal: &mut [f32]) {
        for section in &self.sections {
            section.apply(signal);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    fn sine(n: usize, fs: f32, hz: f32) -> Array1<f32> {
        (0..n)
            .map(|i| (2.0 * PI * hz * i as f32 / fs).sin())
            .collect()
    }

    fn center_energy(signal: &Array1<f32>) -> f32 {
        // Skip the outer quarters so edge effects do not pollute the check.
        let n = signal.len();
        signal
            .iter()
            .skip(n / 4)
            .take(n / 2)
            .map(|v| v * v)
            .sum::<f32>()
            / (n / 2) as f32
    }

    #[test]
    fn passband_tone_survives() {
        let fs = 30.0;
        let input = sine(360, fs, 1.2);
        let filter = BandpassFilter::design(fs, 0.8, 3.0).unwrap();
        let output = filter.apply_zero_phase(&input).unwrap();

        let ratio = center_energy(&output) / center_energy(&input);
        assert!(ratio > 0.5, "passband energy ratio {ratio}");
    }

    #[test]
    fn low_frequency_drift_rejected() {
        let fs = 30.0;
        let input = sine(360, fs, 0.2);
        let filter = BandpassFilter::design(fs, 0.8, 3.0).unwrap();
        let output = filter.apply_zero_phase(&input).unwrap();

        let ratio = center_energy(&output) / center_energy(&input);
        assert!(ratio < 0.05, "stopband energy ratio {ratio}");
    }

    #[test]
    fn high_frequency_noise_rejected() {
        let fs = 30.0;
        let input = sine(360, fs, 8.0);
        let filter = BandpassFilter::design(fs, 0.8, 3.0).unwrap();
        let output = filter.apply_zero_phase(&input).unwrap();

        let ratio = center_energy(&output) / center_energy(&input);
        assert!(ratio < 0.05, "stopband energy ratio {ratio}");
    }

    #[test]
    fn design_fails_below_nyquist() {
        // 4 Hz sampling puts the 3 Hz band edge above Nyquist.
        assert!(BandpassFilter::design(4.0, 0.8, 3.0).is_err());
    }

    #[test]
    fn apply_fails_on_tiny_window() {
        let filter = BandpassFilter::design(30.0, 0.8, 3.0).unwrap();
        let short = Array1::from(vec![0.0f32; PAD_LEN]);
        assert!(filter.apply_zero_phase(&short).is_err());
    }
}
