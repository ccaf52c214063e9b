//! Harmonic-percussive source separation (HPSS)
//!
//! Separates a magnitude spectrogram into harmonic and percussive parts by
//! median filtering: harmonic energy is smooth along time, percussive energy
//! is smooth along frequency. Soft Wiener masks distribute each cell.

use crate::array::FrameArray;
use crate::error::AnalysisError;
use crate::features::filters::{filter_along, median_filter1d, Axis, BoundaryMode};

/// Values below this are treated as zero when building masks
const TINY: f32 = 1e-30;

/// Decompose spectrogram into harmonic and percussive components
///
/// # Arguments
///
/// * `magnitude_spec` - Magnitude spectrogram `(frames, bins)`
/// * `kernel` - Median filter length (frames for harmonic, bins for percussive)
/// * `margin` - Separation margin; larger values leave more in neither part
///
/// # Returns
///
/// Tuple of (harmonic, percussive) spectrograms
pub fn hpss_decompose(
    magnitude_spec: &FrameArray,
    kernel: usize,
    margin: f32,
) -> Result<(FrameArray, FrameArray), AnalysisError> {
    if magnitude_spec.is_empty() {
        return Err(AnalysisError::InvalidInput(
            "Empty spectrogram".to_string(),
        ));
    }
    if kernel == 0 || margin <= 0.0 {
        return Err(AnalysisError::InvalidInput(format!(
            "Invalid HPSS parameters: kernel={}, margin={}",
            kernel, margin
        )));
    }

    log::debug!(
        "Decomposing spectrogram with HPSS: {} frames x {} bins, kernel={}",
        magnitude_spec.rows(),
        magnitude_spec.cols(),
        kernel
    );

    let harm = filter_along(magnitude_spec, Axis::Rows, |s| {
        median_filter1d(s, kernel, BoundaryMode::Reflect)
    });
    let perc = filter_along(magnitude_spec, Axis::Cols, |s| {
        median_filter1d(s, kernel, BoundaryMode::Reflect)
    });

    let (rows, cols) = magnitude_spec.shape();
    let mut harmonic = FrameArray::zeros(rows, cols);
    let mut percussive = FrameArray::zeros(rows, cols);
    for r in 0..rows {
        for c in 0..cols {
            let h = harm.get(r, c);
            let p = perc.get(r, c);
            let s = magnitude_spec.get(r, c);
            harmonic.set(r, c, s * soft_mask(h, p * margin));
            percussive.set(r, c, s * soft_mask(p, h * margin));
        }
    }

    Ok((harmonic, percussive))
}

/// Power-2 Wiener mask `x^2 / (x^2 + reference^2)`, zero where both vanish.
fn soft_mask(x: f32, reference: f32) -> f32 {
    let z = x.max(reference);
    if z < TINY {
        return 0.0;
    }
    let m = (x / z).powi(2);
    let r = (reference / z).powi(2);
    m / (m + r)
}
