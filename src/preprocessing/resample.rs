//! Tuning correction by resampling
//!
//! A recording tuned `offset` semitones away from A440 is treated as if it
//! had been sampled at `sr * 2^(-offset/12)` and resampled back to `sr`,
//! which shifts every pitch by `-offset` semitones.

use crate::error::AnalysisError;

/// Playback rate that cancels a tuning offset given in fractional semitones
///
/// ```
/// use solfege_dsp::preprocessing::resample::tuning_rate;
///
/// assert_eq!(tuning_rate(0.0), 1.0);
/// assert!((tuning_rate(12.0) - 0.5).abs() < 1e-12);
/// ```
pub fn tuning_rate(offset_semitones: f64) -> f64 {
    2f64.powf(-offset_semitones / 12.0)
}

/// Resample from `sample_rate * rate` to `sample_rate` with linear interpolation
///
/// # Arguments
///
/// * `samples` - Input samples
/// * `rate` - Ratio of the source rate to the target rate
///
/// # Returns
///
/// `ceil(len / rate)` samples
///
/// # Errors
///
/// Returns `AnalysisError::InvalidInput` if `rate` is not finite and positive
pub fn resample(samples: &[f32], rate: f64) -> Result<Vec<f32>, AnalysisError> {
    if !rate.is_finite() || rate <= 0.0 {
        return Err(AnalysisError::InvalidInput(format!(
            "Resampling rate must be positive, got {}",
            rate
        )));
    }
    if samples.is_empty() || rate == 1.0 {
        return Ok(samples.to_vec());
    }

    let out_len = (samples.len() as f64 / rate).ceil() as usize;
    log::debug!(
        "Resampling {} samples by rate {:.6} -> {} samples",
        samples.len(),
        rate,
        out_len
    );

    let last = samples.len() - 1;
    Ok((0..out_len)
        .map(|i| {
            let pos = i as f64 * rate;
            let idx = (pos.floor() as usize).min(last);
            let next = (idx + 1).min(last);
            let frac = (pos - idx as f64).clamp(0.0, 1.0) as f32;
            samples[idx] + (samples[next] - samples[idx]) * frac
        })
        .collect())
}

/// Apply tuning correction: resample by `tuning_rate(offset)`
pub fn correct_tuning(samples: &[f32], offset_semitones: f64) -> Result<Vec<f32>, AnalysisError> {
    resample(samples, tuning_rate(offset_semitones))
}
