//! Per-channel signal conditioning: linear detrend and z-normalization.

use ndarray::Array1;

/// Remove the least-squares linear trend from a signal.
pub fn detrend_linear(signal: &Array1<f32>) -> Array1<f32> {
    let n = signal.len();
    if n < 2 {
        return signal.clone();
    }

    // Fit y = a*x + b over x = 0..n-1 in f64 to keep the normal equations
    // stable for long windows.
    let nf = n as f64;
    let sum_x = nf * (nf - 1.0) / 2.0;
    let sum_x2 = (nf - 1.0) * nf * (2.0 * nf - 1.0) / 6.0;
    let mut sum_y = 0.0f64;
    let mut sum_xy = 0.0f64;
    for (i, &y) in signal.iter().enumerate() {
        sum_y += y as f64;
        sum_xy += i as f64 * y as f64;
    }

    let denom = nf * sum_x2 - sum_x * sum_x;
    if denom.abs() < f64::EPSILON {
        return signal.clone();
    }
    let a = (nf * sum_xy - sum_x * sum_y) / denom;
    let b = (sum_y - a * sum_x) / nf;

    Array1::from_iter(
        signal
            .iter()
            .enumerate()
            .map(|(i, &y)| y - (a * i as f64 + b) as f32),
    )
}

/// Rescale to zero mean and unit variance, guarded against flat signals.
pub fn zscore(signal: &Array1<f32>, epsilon: f32) -> Array1<f32> {
    let mean = signal.mean().unwrap_or(0.0);
    let sd = std(signal);
    signal.mapv(|x| (x - mean) / (sd + epsilon))
}

/// Population standard deviation.
pub fn std(signal: &Array1<f32>) -> f32 {
    let mean = signal.mean().unwrap_or(0.0);
    let variance = signal.mapv(|x| (x - mean).powi(2)).mean().unwrap_or(0.0);
    variance.sqrt()
}

/// Detrend then z-normalize one channel trace.
pub fn condition(signal: &Array1<f32>, epsilon: f32) -> Array1<f32> {
    zscore(&detrend_linear(signal), epsilon)
}
