//! Self-similarity (recurrence) affinity
//!
//! Builds a symmetric `T x T` affinity matrix between melody profiles:
//!
//! 1. Cosine distance `1 - cos` between every pair of slots (zero vectors have
//!    cosine 0, so distance 1)
//! 2. Pairs closer than `width` slots in time are excluded
//! 3. Each slot keeps its `k` nearest neighbours; only mutual links survive
//! 4. Affinity `exp(-d / bandwidth)`, bandwidth = median distance to the k-th
//!    kept neighbour
//!
//! Pairs that are not linked have affinity 0.

use crate::array::{dot, FrameArray};
use crate::error::AnalysisError;

/// Build the recurrence affinity matrix
///
/// # Arguments
///
/// * `profiles` - Unit-length (or zero) feature rows, one per slot
/// * `width` - Minimum slot separation of a link
/// * `neighbors` - Links kept per slot; `None` uses `2 * ceil(sqrt(T - 2 * width + 1))`
///
/// # Errors
///
/// Returns `AnalysisError::DegenerateMotifInput` if the sequence is too short
/// for `width` or no mutual link exists
pub fn recurrence_affinity(
    profiles: &FrameArray,
    width: usize,
    neighbors: Option<usize>,
) -> Result<FrameArray, AnalysisError> {
    let t = profiles.rows();
    if width == 0 || t < 2 || width > (t - 1) / 2 {
        return Err(AnalysisError::DegenerateMotifInput(format!(
            "width {} too large for {} slots",
            width, t
        )));
    }

    let k = neighbors
        .unwrap_or_else(|| 2 * ((t - 2 * width + 1) as f64).sqrt().ceil() as usize)
        .max(1);

    let norms: Vec<f32> = profiles
        .iter_rows()
        .map(|r| r.iter().map(|v| v * v).sum::<f32>().sqrt())
        .collect();
    let distance = |i: usize, j: usize| -> f32 {
        let denom = norms[i] * norms[j];
        let cos = if denom > 0.0 {
            dot(profiles.row(i), profiles.row(j)) / denom
        } else {
            0.0
        };
        (1.0 - cos).clamp(0.0, 2.0)
    };

    // k nearest out-of-band neighbours per slot
    let mut linked = vec![false; t * t];
    let mut distances = FrameArray::zeros(t, t);
    let mut candidates: Vec<(f32, usize)> = Vec::with_capacity(t);
    for i in 0..t {
        candidates.clear();
        for j in 0..t {
            if i.abs_diff(j) >= width {
                let d = distance(i, j);
                distances.set(i, j, d);
                candidates.push((d, j));
            }
        }
        candidates.sort_by(|a, b| {
            a.0.partial_cmp(&b.0)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.1.cmp(&b.1))
        });
        for &(_, j) in candidates.iter().take(k) {
            linked[i * t + j] = true;
        }
    }

    // Mutual links only
    let mut kth_distances: Vec<f32> = Vec::with_capacity(t);
    let mut row_links: Vec<f32> = Vec::with_capacity(t);
    let mut n_links = 0usize;
    for i in 0..t {
        row_links.clear();
        for j in 0..t {
            if linked[i * t + j] && linked[j * t + i] {
                row_links.push(distances.get(i, j));
            }
        }
        if row_links.is_empty() {
            continue;
        }
        n_links += row_links.len();
        row_links.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        kth_distances.push(row_links[k.min(row_links.len()) - 1]);
    }

    if n_links == 0 {
        return Err(AnalysisError::DegenerateMotifInput(
            "no mutual nearest-neighbour links".to_string(),
        ));
    }

    let bandwidth = median(&mut kth_distances);
    log::debug!(
        "Recurrence: {} slots, k={}, {} links, bandwidth {:.4}",
        t,
        k,
        n_links / 2,
        bandwidth
    );

    let mut affinity = FrameArray::zeros(t, t);
    for i in 0..t {
        for j in 0..t {
            if linked[i * t + j] && linked[j * t + i] {
                let d = distances.get(i, j);
                // Zero distance stays a link with affinity 1, not a structural zero
                let a = if bandwidth > 0.0 {
                    (-d / bandwidth).exp()
                } else if d == 0.0 {
                    1.0
                } else {
                    0.0
                };
                affinity.set(i, j, a);
            }
        }
    }

    Ok(affinity)
}

/// Median (mean of the middle pair for even lengths); 0.0 when empty
fn median(values: &mut [f32]) -> f32 {
    if values.is_empty() {
        return 0.0;
    }
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        (values[mid - 1] + values[mid]) / 2.0
    } else {
        values[mid]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// One-hot profiles following a pitch-class pattern
    fn profiles_from_pattern(pattern: &[usize], bins: usize) -> FrameArray {
        let mut out = FrameArray::zeros(pattern.len(), bins);
        for (t, &p) in pattern.iter().enumerate() {
            out.set(t, p, 1.0);
        }
        out
    }

    #[test]
    fn test_median() {
        assert_eq!(median(&mut [3.0, 1.0, 2.0]), 2.0);
        assert_eq!(median(&mut [4.0, 1.0, 3.0, 2.0]), 2.5);
        assert_eq!(median(&mut []), 0.0);
    }

    #[test]
    fn test_affinity_is_symmetric_and_banded() {
        let pattern: Vec<usize> = (0..40).map(|t| (t * 7) % 12).collect();
        let profiles = profiles_from_pattern(&pattern, 12);
        let affinity = recurrence_affinity(&profiles, 3, None).unwrap();

        for i in 0..40 {
            for j in 0..40 {
                assert_eq!(affinity.get(i, j), affinity.get(j, i));
                if i.abs_diff(j) < 3 {
                    assert_eq!(affinity.get(i, j), 0.0);
                }
                assert!((0.0..=1.0).contains(&affinity.get(i, j)));
            }
        }
    }

    #[test]
    fn test_repeats_link_strongly() {
        let phrase = [0usize, 2, 4, 5, 7, 9, 11, 1, 3, 6];
        let pattern: Vec<usize> = phrase.iter().chain(phrase.iter()).copied().collect();
        let profiles = profiles_from_pattern(&pattern, 12);
        let affinity = recurrence_affinity(&profiles, 3, None).unwrap();

        for t in 0..10 {
            assert_eq!(affinity.get(t, t + 10), 1.0);
        }
    }

    #[test]
    fn test_too_short_is_degenerate() {
        let profiles = profiles_from_pattern(&[0, 1, 2, 3, 4], 12);
        assert!(matches!(
            recurrence_affinity(&profiles, 3, None),
            Err(AnalysisError::DegenerateMotifInput(_))
        ));
    }
}
