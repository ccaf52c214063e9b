//! Motif-based probability correction

use super::MotifSegment;
use crate::array::FrameArray;

/// Blend each motif region with its partner region
///
/// Every slot covered by a segment half accumulates the partner slot's pitch
/// vector. Covered slots become `w_self * original + w_motif * mean(partners)`;
/// all other slots are copied unchanged. Segments reaching past the grid are
/// clipped to the part where both halves are inside it.
///
/// # Arguments
///
/// * `notes` - Biased pitch grid `(slots, pitches)`
/// * `segments` - Accepted motif segments
/// * `w_self` - Weight of the original values (e.g., 0.6)
/// * `w_motif` - Weight of the partner average (e.g., 0.4)
pub fn apply_motif_correction(
    notes: &FrameArray,
    segments: &[MotifSegment],
    w_self: f32,
    w_motif: f32,
) -> FrameArray {
    let n = notes.rows();
    let mut contributions = FrameArray::zeros(n, notes.cols());
    let mut counts = vec![0u32; n];

    for seg in segments {
        let valid_len = seg
            .length
            .min(n.saturating_sub(seg.start_a))
            .min(n.saturating_sub(seg.start_b));
        for offset in 0..valid_len {
            let a = seg.start_a + offset;
            let b = seg.start_b + offset;
            accumulate(contributions.row_mut(a), notes.row(b));
            counts[a] += 1;
            accumulate(contributions.row_mut(b), notes.row(a));
            counts[b] += 1;
        }
    }

    let mut corrected = notes.clone();
    let mut touched = 0usize;
    for (t, &count) in counts.iter().enumerate() {
        if count == 0 {
            continue;
        }
        touched += 1;
        let contrib = contributions.row(t);
        for (v, c) in corrected.row_mut(t).iter_mut().zip(contrib) {
            *v = w_self * *v + w_motif * (c / count as f32);
        }
    }

    log::debug!(
        "Motif correction: {} segments touched {} of {} slots",
        segments.len(),
        touched,
        n
    );
    corrected
}

fn accumulate(acc: &mut [f32], values: &[f32]) {
    for (a, v) in acc.iter_mut().zip(values) {
        *a += v;
    }
}
