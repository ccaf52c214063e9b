//! Motif segment extraction and selection
//!
//! Binarizes the enhanced affinity matrix, reads runs of ones along each
//! upper diagonal as candidate repeats, and greedily keeps the strongest
//! candidates that do not collide with each other.

use super::MotifSegment;
use crate::array::{percentile, FrameArray};
use crate::config::MotifConfig;
use crate::error::AnalysisError;

/// Threshold at the given percentile of the strictly positive values
///
/// # Errors
///
/// Returns `AnalysisError::DegenerateMotifInput` if no value is positive
pub fn positive_threshold(enhanced: &FrameArray, pct: f32) -> Result<f32, AnalysisError> {
    let positive: Vec<f32> = enhanced
        .as_slice()
        .iter()
        .copied()
        .filter(|&v| v > 0.0)
        .collect();
    percentile(&positive, pct).ok_or_else(|| {
        AnalysisError::DegenerateMotifInput("no positive affinity after enhancement".to_string())
    })
}

/// Runs of `value >= threshold` along each diagonal offset `>= width`
///
/// Each run of at least `min_length` slots becomes a candidate scored by the
/// mean enhanced affinity over the run. Candidates are returned sorted by
/// `(score * length, length)`, strongest first; equal keys keep diagonal order.
pub fn diagonal_runs(
    enhanced: &FrameArray,
    threshold: f32,
    width: usize,
    min_length: usize,
) -> Vec<MotifSegment> {
    let t = enhanced.rows();
    let mut segments = Vec::new();

    for offset in width..t {
        let diag_len = t - offset;
        if diag_len < min_length {
            continue;
        }
        let value = |i: usize| enhanced.get(i, i + offset);

        let mut i = 0;
        while i < diag_len {
            if value(i) < threshold {
                i += 1;
                continue;
            }
            let start = i;
            while i < diag_len && value(i) >= threshold {
                i += 1;
            }
            let length = i - start;
            if length >= min_length {
                let score = (start..i).map(value).sum::<f32>() / length as f32;
                segments.push(MotifSegment {
                    start_a: start,
                    start_b: start + offset,
                    length,
                    score,
                });
            }
        }
    }

    segments.sort_by(|a, b| {
        let ka = a.score * a.length as f32;
        let kb = b.score * b.length as f32;
        kb.partial_cmp(&ka)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(b.length.cmp(&a.length))
    });
    segments
}

/// Greedy non-overlapping selection
///
/// Considers the first `max_candidates` candidates in order and accepts a
/// segment unless its halves overlap each other or either half overlaps
/// either half of an accepted segment. Stops after `max_segments`.
pub fn select_non_overlapping(
    candidates: &[MotifSegment],
    max_candidates: usize,
    max_segments: usize,
) -> Vec<MotifSegment> {
    let mut selected: Vec<MotifSegment> = Vec::new();
    if max_segments == 0 {
        return selected;
    }

    for seg in candidates.iter().take(max_candidates) {
        let (a, b) = (seg.region_a(), seg.region_b());
        if overlaps(a, b) {
            continue;
        }
        let collides = selected.iter().any(|kept| {
            let (ka, kb) = (kept.region_a(), kept.region_b());
            overlaps(a, ka) || overlaps(a, kb) || overlaps(b, ka) || overlaps(b, kb)
        });
        if !collides {
            selected.push(*seg);
            if selected.len() >= max_segments {
                break;
            }
        }
    }
    selected
}

/// Half-open interval intersection
fn overlaps(a: (usize, usize), b: (usize, usize)) -> bool {
    a.0 < b.1 && b.0 < a.1
}

/// Candidates and selection in one pass
pub fn find_segments(
    enhanced: &FrameArray,
    config: &MotifConfig,
) -> Result<Vec<MotifSegment>, AnalysisError> {
    let threshold = positive_threshold(enhanced, config.threshold_percentile)?;
    let candidates = diagonal_runs(enhanced, threshold, config.width, config.min_length);
    let selected = select_non_overlapping(&candidates, config.max_candidates, config.max_segments);
    log::debug!(
        "Motif segments: threshold {:.4}, {} candidates, {} selected",
        threshold,
        candidates.len(),
        selected.len()
    );
    Ok(selected)
}
