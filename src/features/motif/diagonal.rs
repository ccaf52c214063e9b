//! Diagonal path enhancement
//!
//! Repeated phrases show up as diagonal stripes in the affinity matrix. The
//! matrix is mapped to time-lag coordinates (zero padded to `2T` lags), each
//! lag is smoothed over time with a Gaussian, and the result is mapped back.
//! Smoothing along a lag is smoothing along the corresponding diagonal.

use crate::array::FrameArray;
use crate::features::filters::{gaussian_filter1d, BoundaryMode};

/// Smooth an affinity matrix along its diagonals and zero the main diagonal.
pub fn enhance_diagonals(affinity: &FrameArray, sigma: f32) -> FrameArray {
    let t = affinity.rows();
    let mut enhanced = FrameArray::zeros(t, t);
    if t == 0 {
        return enhanced;
    }

    let lags = 2 * t;
    let mut lag_row = vec![0.0f32; t];
    for lag in 0..lags {
        for (j, slot) in lag_row.iter_mut().enumerate() {
            let r = (j + lag) % lags;
            *slot = if r < t { affinity.get(r, j) } else { 0.0 };
        }
        let smoothed = gaussian_filter1d(&lag_row, sigma, BoundaryMode::Mirror);
        for (j, &v) in smoothed.iter().enumerate() {
            let r = (j + lag) % lags;
            if r < t {
                enhanced.set(r, j, v);
            }
        }
    }

    for i in 0..t {
        enhanced.set(i, i, 0.0);
    }
    enhanced
}
