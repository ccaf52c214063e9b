//! Melody shape profiles
//!
//! Reduces the pitch grid to one unit-length "shape" vector per slot: only
//! the vocal range is kept, the surface is lightly smoothed, weak values and
//! weak slots are gated out, and every surviving row is L2-normalized.

use crate::array::{l2_normalize, FrameArray};
use crate::config::MotifConfig;
use crate::features::filters::{
    filter_along, gaussian_filter1d, uniform_filter1d, Axis, BoundaryMode,
};

/// Build per-slot melody profiles `(slots, highest - lowest + 1)`.
pub fn melody_profiles(notes: &FrameArray, config: &MotifConfig) -> FrameArray {
    let hi = (config.highest_pitch + 1).min(notes.cols());
    let in_range = notes
        .slice_cols(config.lowest_pitch, hi)
        .map(|v| v.max(0.0));

    let smoothed = filter_along(&in_range, Axis::Cols, |s| {
        gaussian_filter1d(s, config.pitch_sigma, BoundaryMode::Nearest)
    });
    let mut profiles = filter_along(&smoothed, Axis::Rows, |s| {
        uniform_filter1d(s, config.time_window, BoundaryMode::Nearest)
    });

    let peaks = profiles.row_max();
    let mean_peak = if peaks.is_empty() {
        0.0
    } else {
        peaks.iter().sum::<f32>() / peaks.len() as f32
    };
    let frame_floor = mean_peak * config.frame_gate;

    let mut silenced = 0usize;
    for (t, &peak) in peaks.iter().enumerate() {
        let row = profiles.row_mut(t);
        let local_floor = peak * config.local_gate;
        for v in row.iter_mut() {
            if *v < local_floor {
                *v = 0.0;
            }
        }
        if peak < frame_floor {
            row.iter_mut().for_each(|v| *v = 0.0);
            silenced += 1;
        }
        l2_normalize(row, 0.0);
    }

    log::debug!(
        "Melody profiles: {} slots x {} bins, {} slots gated out",
        profiles.rows(),
        profiles.cols(),
        silenced
    );

    profiles
}
