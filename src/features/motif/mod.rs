//! Motif detection and correction
//!
//! Finds repeated melodic fragments in the pitch grid and lets the repeats
//! reinforce each other:
//! - Melody shape profiles (vocal range, smoothing, gating)
//! - Recurrence affinity (cosine k-NN with a minimum lag)
//! - Diagonal enhancement
//! - Segment extraction and non-overlapping selection
//! - Probability blending between paired regions

pub mod correction;
pub mod diagonal;
pub mod profile;
pub mod recurrence;
pub mod segments;

pub use correction::apply_motif_correction;
pub use diagonal::enhance_diagonals;
pub use profile::melody_profiles;
pub use recurrence::recurrence_affinity;
pub use segments::{diagonal_runs, find_segments, select_non_overlapping};

use crate::array::FrameArray;
use crate::config::MotifConfig;
use crate::error::AnalysisError;
use serde::{Deserialize, Serialize};

/// A pair of grid regions `[start_a, start_a + length)` and
/// `[start_b, start_b + length)` that repeat each other
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MotifSegment {
    /// First slot of the earlier region
    pub start_a: usize,

    /// First slot of the later region
    pub start_b: usize,

    /// Length of both regions in slots
    pub length: usize,

    /// Mean enhanced affinity along the match
    pub score: f32,
}

impl MotifSegment {
    /// Half-open slot range of the earlier region
    pub fn region_a(&self) -> (usize, usize) {
        (self.start_a, self.start_a + self.length)
    }

    /// Half-open slot range of the later region
    pub fn region_b(&self) -> (usize, usize) {
        (self.start_b, self.start_b + self.length)
    }
}

/// Detect repeated melodic segments in a scale-biased pitch grid
///
/// # Arguments
///
/// * `notes` - Pitch grid `(slots, 88)`
/// * `config` - Motif parameters
///
/// # Returns
///
/// Accepted segments, strongest first; empty when the grid has fewer than two
/// slots
///
/// # Errors
///
/// Returns `AnalysisError::DegenerateMotifInput` when no usable affinity
/// structure exists (sequence too short for the minimum lag, no mutual
/// links, or nothing positive left after enhancement). Callers treat this as
/// "no motifs".
pub fn extract_motifs(
    notes: &FrameArray,
    config: &MotifConfig,
) -> Result<Vec<MotifSegment>, AnalysisError> {
    if notes.rows() < 2 {
        return Ok(Vec::new());
    }

    let profiles = melody_profiles(notes, config);
    let affinity = recurrence_affinity(&profiles, config.width, config.neighbors)?;
    let enhanced = enhance_diagonals(&affinity, config.diagonal_sigma);
    find_segments(&enhanced, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::N_PITCHES;

    /// Grid whose melody is `phrase` repeated `times`, with gentle decay so
    /// slots are never exact duplicates of unrelated slots
    fn repeated_melody(phrase: &[usize], times: usize) -> FrameArray {
        let t = phrase.len() * times;
        let mut notes = FrameArray::zeros(t, N_PITCHES);
        for slot in 0..t {
            let pitch = phrase[slot % phrase.len()];
            notes.set(slot, pitch, 0.9);
            notes.set(slot, pitch + 1, 0.1);
        }
        notes
    }

    #[test]
    fn test_short_grid_has_no_motifs() {
        let notes = FrameArray::zeros(1, N_PITCHES);
        assert!(extract_motifs(&notes, &MotifConfig::default()).unwrap().is_empty());
    }

    #[test]
    fn test_too_short_for_width_is_degenerate() {
        let notes = repeated_melody(&[30, 32, 34], 2);
        let err = extract_motifs(&notes, &MotifConfig::default()).unwrap_err();
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_repeated_phrase_is_detected() {
        let phrase = [30usize, 32, 34, 35, 37, 39, 41, 42, 44, 46, 47, 49];
        let notes = repeated_melody(&phrase, 2);
        let segments = extract_motifs(&notes, &MotifConfig::default()).unwrap();

        assert!(!segments.is_empty());
        let best = segments[0];
        assert_eq!(best.start_b - best.start_a, phrase.len());
        assert!(best.length >= 8);
    }

    #[test]
    fn test_segments_never_overlap() {
        let phrase = [30usize, 33, 35, 38, 40, 42, 45, 47, 50];
        let notes = repeated_melody(&phrase, 5);
        let segments = extract_motifs(&notes, &MotifConfig::default()).unwrap();

        let mut regions = Vec::new();
        for s in &segments {
            let (a, b) = (s.region_a(), s.region_b());
            assert!(a.1 <= b.0 || b.1 <= a.0);
            regions.push(a);
            regions.push(b);
        }
        for (i, r) in regions.iter().enumerate() {
            for q in regions.iter().skip(i + 1) {
                assert!(r.1 <= q.0 || q.1 <= r.0);
            }
        }
        assert!(segments.len() <= MotifConfig::default().max_segments);
    }
}
