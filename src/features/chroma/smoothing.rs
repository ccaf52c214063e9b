//! Temporal chroma smoothing

use crate::array::FrameArray;
use crate::features::filters::{filter_along, gaussian_filter1d, Axis, BoundaryMode};

/// Smooth chroma vectors over time with a Gaussian kernel
///
/// # Arguments
///
/// * `chroma` - Grid-aligned chroma `(slots, 12)`
/// * `sigma` - Kernel standard deviation in slots (e.g., 4.0)
///
/// # Returns
///
/// Smoothed chroma; edges are extended by repeating the first/last slot
pub fn smooth_chroma(chroma: &FrameArray, sigma: f32) -> FrameArray {
    log::debug!("Smoothing {} chroma vectors with sigma {}", chroma.rows(), sigma);
    filter_along(chroma, Axis::Rows, |s| {
        gaussian_filter1d(s, sigma, BoundaryMode::Nearest)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_smoothing_spreads_impulse() {
        let mut chroma = FrameArray::zeros(21, 12);
        chroma.set(10, 0, 1.0);
        let out = smooth_chroma(&chroma, 2.0);
        assert!(out.get(10, 0) < 1.0);
        assert!(out.get(12, 0) > 0.0);
        let total: f32 = out.column(0).iter().sum();
        assert!((total - 1.0).abs() < 1e-4);
        assert!(out.column(1).iter().all(|&v| v == 0.0));
    }
}
