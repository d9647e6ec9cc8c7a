//! POS (Plane-Orthogonal-to-Skin) chrominance projection.
//!
//! Wang et al. (2017): "Algorithmic Principles of Remote PPG". Combines
//! the three normalized channel traces into a single pulse signal on a
//! plane orthogonal to the skin-tone axis, which suppresses specular and
//! lighting artifacts that a single-channel signal picks up.

use ndarray::Array1;

use super::conditioner::std;

/// Project normalized R/G/B traces onto the pulse axis.
///
/// `S1 = G - B`, `S2 = G + B - 2R`, `H = S1 + alpha * S2` where
/// `alpha = std(S1) / (std(S2) + epsilon)` tunes the second chrominance
/// component to the observed signal energy.
pub fn project(
    r: &Array1<f32>,
    g: &Array1<f32>,
    b: &Array1<f32>,
    epsilon: f32,
) -> Array1<f32> {
    let s1 = g - b;
    let s2 = g + b - &(r * 2.0);
    let alpha = std(&s1) / (std(&s2) + epsilon);
    &s1 + &(&s2 * alpha)
}
