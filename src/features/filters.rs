//! One-dimensional smoothing filters
//!
//! Gaussian, uniform and median filters over `f32` sequences, with explicit
//! boundary handling. Kernels are truncated at 4 sigma.

use crate::array::FrameArray;

/// Gaussian kernels are truncated at this many standard deviations
const TRUNCATE: f32 = 4.0;

/// How samples outside the signal are synthesized
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryMode {
    /// Repeat the edge sample: `a a a | a b c d | d d d`
    Nearest,
    /// Reflect about the edge sample: `d c b | a b c d | c b a`
    Mirror,
    /// Reflect including the edge sample: `c b a | a b c d | d c b`
    Reflect,
}

/// Axis of a [`FrameArray`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Along rows (time / slots)
    Rows,
    /// Along columns (features)
    Cols,
}

/// Map a possibly out-of-range index into `[0, n)` for the boundary mode.
fn resolve_index(i: i64, n: usize, mode: BoundaryMode) -> usize {
    let n = n as i64;
    if (0..n).contains(&i) {
        return i as usize;
    }
    match mode {
        BoundaryMode::Nearest => i.clamp(0, n - 1) as usize,
        BoundaryMode::Mirror => {
            if n == 1 {
                return 0;
            }
            let period = 2 * n - 2;
            let m = i.rem_euclid(period);
            (if m < n { m } else { period - m }) as usize
        }
        BoundaryMode::Reflect => {
            let period = 2 * n;
            let m = i.rem_euclid(period);
            (if m < n { m } else { period - 1 - m }) as usize
        }
    }
}

/// Normalized Gaussian kernel of radius `round(4 sigma)`
pub fn gaussian_kernel(sigma: f32) -> Vec<f32> {
    if sigma <= 0.0 {
        return vec![1.0];
    }
    let radius = (TRUNCATE * sigma + 0.5) as i64;
    let mut kernel: Vec<f32> = (-radius..=radius)
        .map(|x| (-0.5 * (x as f32 / sigma).powi(2)).exp())
        .collect();
    let sum: f32 = kernel.iter().sum();
    for w in kernel.iter_mut() {
        *w /= sum;
    }
    kernel
}

/// Correlate `signal` with a symmetric, odd-length kernel.
fn convolve_symmetric(signal: &[f32], kernel: &[f32], mode: BoundaryMode) -> Vec<f32> {
    let n = signal.len();
    if n == 0 {
        return Vec::new();
    }
    let radius = (kernel.len() / 2) as i64;
    (0..n)
        .map(|i| {
            kernel
                .iter()
                .enumerate()
                .map(|(k, &w)| {
                    let j = resolve_index(i as i64 + k as i64 - radius, n, mode);
                    w * signal[j]
                })
                .sum()
        })
        .collect()
}

/// Gaussian smoothing of a 1D signal
pub fn gaussian_filter1d(signal: &[f32], sigma: f32, mode: BoundaryMode) -> Vec<f32> {
    convolve_symmetric(signal, &gaussian_kernel(sigma), mode)
}

/// Moving average of `size` samples.
///
/// The window for sample `i` covers `[i - size/2, i - size/2 + size)`, so an
/// even window leans towards the past.
pub fn uniform_filter1d(signal: &[f32], size: usize, mode: BoundaryMode) -> Vec<f32> {
    let n = signal.len();
    if n == 0 || size <= 1 {
        return signal.to_vec();
    }
    let offset = (size / 2) as i64;
    (0..n)
        .map(|i| {
            let sum: f32 = (0..size as i64)
                .map(|k| signal[resolve_index(i as i64 - offset + k, n, mode)])
                .sum();
            sum / size as f32
        })
        .collect()
}

/// Running median of `size` samples centered on each sample
pub fn median_filter1d(signal: &[f32], size: usize, mode: BoundaryMode) -> Vec<f32> {
    let n = signal.len();
    if n == 0 || size <= 1 {
        return signal.to_vec();
    }
    let offset = (size / 2) as i64;
    let mut window = vec![0.0f32; size];
    (0..n)
        .map(|i| {
            for (k, slot) in window.iter_mut().enumerate() {
                *slot = signal[resolve_index(i as i64 - offset + k as i64, n, mode)];
            }
            let mid = size / 2;
            let (_, median, _) = window.select_nth_unstable_by(mid, |a, b| {
                a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal)
            });
            *median
        })
        .collect()
}

/// Apply a 1D filter to every line of `array` along `axis`.
pub fn filter_along<F>(array: &FrameArray, axis: Axis, filter: F) -> FrameArray
where
    F: Fn(&[f32]) -> Vec<f32>,
{
    match axis {
        Axis::Cols => {
            let mut out = FrameArray::zeros(array.rows(), array.cols());
            for (r, row) in array.iter_rows().enumerate() {
                for (dst, v) in out.row_mut(r).iter_mut().zip(filter(row)) {
                    *dst = v;
                }
            }
            out
        }
        Axis::Rows => {
            let mut out = FrameArray::zeros(array.rows(), array.cols());
            for c in 0..array.cols() {
                out.set_column(c, &filter(&array.column(c)));
            }
            out
        }
    }
}
