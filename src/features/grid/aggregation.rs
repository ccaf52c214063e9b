//! Frame aggregation functions
//!
//! Collapse a block of frames `(frames, features)` into one feature vector.

use crate::array::FrameArray;

/// How frames inside one grid slot are combined
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregation {
    /// Arithmetic mean over frames
    Mean,
    /// Maximum over frames
    Max,
    /// Hamming-weighted mean, favouring frames near the slot center
    CenterWeighted,
}

impl Aggregation {
    /// Aggregate `rows [start, end)` of `data` along the frame axis.
    ///
    /// An empty range yields a zero vector.
    pub fn apply(&self, data: &FrameArray, start: usize, end: usize) -> Vec<f32> {
        let cols = data.cols();
        let end = end.min(data.rows());
        if start >= end {
            return vec![0.0; cols];
        }
        let len = end - start;

        match self {
            Aggregation::Mean => {
                let mut acc = vec![0.0f32; cols];
                for r in start..end {
                    for (a, &v) in acc.iter_mut().zip(data.row(r)) {
                        *a += v;
                    }
                }
                acc.iter_mut().for_each(|a| *a /= len as f32);
                acc
            }
            Aggregation::Max => {
                let mut acc = data.row(start).to_vec();
                for r in start + 1..end {
                    for (a, &v) in acc.iter_mut().zip(data.row(r)) {
                        *a = a.max(v);
                    }
                }
                acc
            }
            Aggregation::CenterWeighted => {
                let weights = hamming(len);
                let total: f32 = weights.iter().sum();
                let mut acc = vec![0.0f32; cols];
                for (r, &w) in (start..end).zip(weights.iter()) {
                    for (a, &v) in acc.iter_mut().zip(data.row(r)) {
                        *a += w * v;
                    }
                }
                acc.iter_mut().for_each(|a| *a /= total);
                acc
            }
        }
    }
}

/// Symmetric Hamming window of length `m` (`[1.0]` for `m == 1`)
pub fn hamming(m: usize) -> Vec<f32> {
    match m {
        0 => Vec::new(),
        1 => vec![1.0],
        _ => (0..m)
            .map(|n| {
                0.54 - 0.46 * (2.0 * std::f32::consts::PI * n as f32 / (m - 1) as f32).cos()
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block() -> FrameArray {
        FrameArray::from_rows(&[vec![0.0, 1.0], vec![1.0, 1.0], vec![0.0, 1.0]]).unwrap()
    }

    #[test]
    fn test_mean_and_max() {
        let data = block();
        let mean = Aggregation::Mean.apply(&data, 0, 3);
        assert!((mean[0] - 1.0 / 3.0).abs() < 1e-6);
        assert_eq!(mean[1], 1.0);
        assert_eq!(Aggregation::Max.apply(&data, 0, 3), vec![1.0, 1.0]);
    }

    #[test]
    fn test_center_weighted_favours_center() {
        let data = block();
        let cw = Aggregation::CenterWeighted.apply(&data, 0, 3);
        // hamming(3) = [0.08, 1.0, 0.08]
        assert!((cw[0] - 1.0 / 1.16).abs() < 1e-5);
        assert!((cw[1] - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_empty_range_is_zero() {
        let data = block();
        for agg in [Aggregation::Mean, Aggregation::Max, Aggregation::CenterWeighted] {
            assert_eq!(agg.apply(&data, 2, 2), vec![0.0, 0.0]);
            assert_eq!(agg.apply(&data, 5, 9), vec![0.0, 0.0]);
        }
    }

    #[test]
    fn test_hamming_endpoints() {
        let w = hamming(5);
        assert!((w[0] - 0.08).abs() < 1e-6);
        assert!((w[2] - 1.0).abs() < 1e-6);
        assert_eq!(hamming(1), vec![1.0]);
    }
}
