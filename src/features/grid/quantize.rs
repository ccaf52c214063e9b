//! Beat-synchronous grid quantization
//!
//! Each inter-beat interval is split into `subdivisions` equal sub-intervals.
//! The frames falling into a sub-interval are aggregated into one grid row,
//! and the row is stamped with the sub-interval's real start time rather than
//! a frame-derived time, so rounding never shifts the grid.
//!
//! # Algorithm
//!
//! 1. Start at boundary 0.0; for each beat, split `[prev, beat]` into equal parts
//! 2. Map each part to frames with `round(t / spf)`, clamped to the array
//! 3. Aggregate the frames (or emit zeros when none fall inside)
//! 4. After the last beat, cover `[last_beat, num_frames * spf]` the same way

use super::aggregation::Aggregation;
use crate::array::FrameArray;
use crate::error::AnalysisError;

/// Grid-aligned array with the start time of each slot
#[derive(Debug, Clone, PartialEq)]
pub struct QuantizedGrid {
    /// One row per grid slot
    pub values: FrameArray,

    /// Start time of each slot in seconds (non-decreasing)
    pub times: Vec<f64>,
}

impl QuantizedGrid {
    /// Number of grid slots
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// True when no slot was emitted
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }
}

/// Quantize frame data onto a beat grid
///
/// # Arguments
///
/// * `data` - Frame array `(num_frames, num_features)`
/// * `beat_times` - Beat timestamps in seconds (non-decreasing)
/// * `spf` - Seconds per frame of `data`
/// * `subdivisions` - Sub-intervals per beat
/// * `aggregation` - How frames inside a slot are combined
///
/// # Returns
///
/// Grid values and slot start times; both have one entry per emitted slot
///
/// # Errors
///
/// Returns `AnalysisError::InvalidInput` if `spf` is not positive, `subdivisions`
/// is zero, or beat times are not finite, non-negative and non-decreasing.
///
/// # Example
///
/// ```
/// use solfege_dsp::array::FrameArray;
/// use solfege_dsp::features::grid::{quantize_to_grid, Aggregation};
///
/// let data = FrameArray::zeros(100, 88);
/// let grid = quantize_to_grid(&data, &[0.5, 1.0], 0.01, 4, Aggregation::Max)?;
/// assert_eq!(grid.len(), grid.values.rows());
/// # Ok::<(), solfege_dsp::AnalysisError>(())
/// ```
pub fn quantize_to_grid(
    data: &FrameArray,
    beat_times: &[f64],
    spf: f64,
    subdivisions: usize,
    aggregation: Aggregation,
) -> Result<QuantizedGrid, AnalysisError> {
    if !spf.is_finite() || spf <= 0.0 {
        return Err(AnalysisError::InvalidInput(format!(
            "Seconds per frame must be positive, got {}",
            spf
        )));
    }
    if subdivisions == 0 {
        return Err(AnalysisError::InvalidInput(
            "Subdivisions must be >= 1".to_string(),
        ));
    }
    validate_beats(beat_times)?;

    let num_frames = data.rows();
    let total_duration = num_frames as f64 * spf;

    let usable = beat_times.partition_point(|&t| t <= total_duration);
    if usable < beat_times.len() {
        log::debug!(
            "Dropping {} beats past the end of the data ({:.3}s)",
            beat_times.len() - usable,
            total_duration
        );
    }

    log::debug!(
        "Quantizing {} frames onto {} beats x {} subdivisions ({:?})",
        num_frames,
        usable,
        subdivisions,
        aggregation
    );

    let mut values = FrameArray::with_cols(data.cols());
    let mut times = Vec::with_capacity((usable + 1) * subdivisions);
    let mut prev = 0.0f64;

    for &beat in &beat_times[..usable] {
        subdivide(
            data,
            prev,
            beat,
            spf,
            subdivisions,
            aggregation,
            &mut values,
            &mut times,
        )?;
        prev = beat;
    }

    // Tail after the last beat
    if prev < total_duration {
        subdivide(
            data,
            prev,
            total_duration,
            spf,
            subdivisions,
            aggregation,
            &mut values,
            &mut times,
        )?;
    }

    log::debug!("Quantized grid: {} slots", times.len());

    Ok(QuantizedGrid { values, times })
}

fn validate_beats(beat_times: &[f64]) -> Result<(), AnalysisError> {
    for (i, &t) in beat_times.iter().enumerate() {
        if !t.is_finite() || t < 0.0 {
            return Err(AnalysisError::InvalidInput(format!(
                "Beat time at index {} is invalid: {}",
                i, t
            )));
        }
        if i > 0 && t < beat_times[i - 1] {
            return Err(AnalysisError::InvalidInput(format!(
                "Beat times must be non-decreasing: {} follows {}",
                t,
                beat_times[i - 1]
            )));
        }
    }
    Ok(())
}

/// Emit the grid rows for one interval `[start, end]`.
#[allow(clippy::too_many_arguments)]
fn subdivide(
    data: &FrameArray,
    start: f64,
    end: f64,
    spf: f64,
    subdivisions: usize,
    aggregation: Aggregation,
    values: &mut FrameArray,
    times: &mut Vec<f64>,
) -> Result<(), AnalysisError> {
    let num_frames = data.rows() as i64;
    let step = (end - start) / subdivisions as f64;
    let boundary = |j: usize| {
        if j == subdivisions {
            end
        } else {
            start + step * j as f64
        }
    };

    for j in 0..subdivisions {
        let (t_start, t_end) = (boundary(j), boundary(j + 1));
        if t_end <= t_start {
            continue;
        }

        let f_start = ((t_start / spf).round_ties_even() as i64).clamp(0, num_frames) as usize;
        let f_end = ((t_end / spf).round_ties_even() as i64).clamp(0, num_frames) as usize;

        let row = aggregation.apply(data, f_start, f_end);
        values.push_row(&row)?;
        times.push(t_start);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(frames: usize, cols: usize) -> FrameArray {
        let mut a = FrameArray::zeros(frames, cols);
        for r in 0..frames {
            for c in 0..cols {
                a.set(r, c, (r % 7) as f32 / 7.0);
            }
        }
        a
    }

    #[test]
    fn test_grid_length_matches_beats() {
        // 2.0 s of data at 10 ms/frame, beats every 0.5 s
        let data = ramp(200, 3);
        let beats = [0.5, 1.0, 1.5];
        let grid = quantize_to_grid(&data, &beats, 0.01, 4, Aggregation::Mean).unwrap();

        // 3 beats + tail [1.5, 2.0] -> 4 intervals x 4 subdivisions
        assert_eq!(grid.len(), 16);
        assert_eq!(grid.values.rows(), 16);
        assert!((grid.times[0] - 0.0).abs() < 1e-12);
        assert!((grid.times[1] - 0.125).abs() < 1e-12);
        assert!((grid.times[4] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_times_non_decreasing_and_within_duration() {
        let data = ramp(150, 2);
        let beats = [0.3, 0.7, 0.7, 1.2, 5.0];
        let grid = quantize_to_grid(&data, &beats, 0.01, 4, Aggregation::Max).unwrap();
        assert_eq!(grid.len(), grid.values.rows());
        assert!(grid.times.windows(2).all(|w| w[0] <= w[1]));
        assert!(grid.times.iter().all(|&t| t <= 1.5));
    }

    #[test]
    fn test_duplicate_beat_emits_no_rows() {
        let data = ramp(100, 1);
        let with_dup = quantize_to_grid(&data, &[0.5, 0.5], 0.01, 4, Aggregation::Mean).unwrap();
        let without = quantize_to_grid(&data, &[0.5], 0.01, 4, Aggregation::Mean).unwrap();
        assert_eq!(with_dup, without);
    }

    #[test]
    fn test_zero_beats_single_tail_pass() {
        let data = ramp(100, 2);
        let grid = quantize_to_grid(&data, &[], 0.01, 4, Aggregation::Mean).unwrap();
        assert_eq!(grid.len(), 4);
        assert!((grid.times[3] - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_all_zero_input_gives_all_zero_grid() {
        let data = FrameArray::zeros(120, 88);
        for agg in [Aggregation::Mean, Aggregation::Max, Aggregation::CenterWeighted] {
            let grid = quantize_to_grid(&data, &[0.2, 0.4, 0.9], 0.01, 4, agg).unwrap();
            assert!(grid.values.as_slice().iter().all(|&v| v == 0.0));
        }
    }

    #[test]
    fn test_sub_frame_interval_yields_zero_row() {
        // 4 sub-intervals of 2.5 ms each inside a 10 ms frame
        let data = FrameArray::from_rows(&[vec![1.0], vec![1.0]]).unwrap();
        let grid = quantize_to_grid(&data, &[0.01], 0.01, 4, Aggregation::Max).unwrap();
        assert_eq!(grid.values.row(0), &[0.0]); // frames [0, 0)
    }

    #[test]
    fn test_invalid_parameters() {
        let data = ramp(10, 1);
        assert!(quantize_to_grid(&data, &[], 0.0, 4, Aggregation::Mean).is_err());
        assert!(quantize_to_grid(&data, &[], 0.01, 0, Aggregation::Mean).is_err());
        assert!(quantize_to_grid(&data, &[0.05, 0.02], 0.01, 4, Aggregation::Mean).is_err());
        assert!(quantize_to_grid(&data, &[f64::NAN], 0.01, 4, Aggregation::Mean).is_err());
    }
}
