//! Channel mixing utilities (multi-channel to mono conversion)

use crate::error::AnalysisError;

/// Average interleaved channels into a mono signal
///
/// # Arguments
///
/// * `interleaved` - Samples ordered `[c0, c1, ..., c0, c1, ...]`
/// * `channels` - Number of interleaved channels
///
/// # Returns
///
/// Mono samples; a trailing partial frame is dropped
///
/// # Errors
///
/// Returns `AnalysisError::InvalidInput` if `channels` is zero
pub fn downmix_interleaved(interleaved: &[f32], channels: usize) -> Result<Vec<f32>, AnalysisError> {
    match channels {
        0 => Err(AnalysisError::InvalidInput(
            "Channel count must be >= 1".to_string(),
        )),
        1 => Ok(interleaved.to_vec()),
        _ => Ok(interleaved
            .chunks_exact(channels)
            .map(|frame| frame.iter().sum::<f32>() / channels as f32)
            .collect()),
    }
}

/// Truncate every track to the shortest one
pub fn truncate_to_shortest(tracks: &mut [Vec<f32>]) -> usize {
    let min_len = tracks.iter().map(|t| t.len()).min().unwrap_or(0);
    for track in tracks.iter_mut() {
        track.truncate(min_len);
    }
    min_len
}

/// Sample-wise sum of equally long tracks
pub fn mix_tracks(tracks: &[&[f32]]) -> Vec<f32> {
    let len = tracks.iter().map(|t| t.len()).min().unwrap_or(0);
    (0..len)
        .map(|i| tracks.iter().map(|t| t[i]).sum())
        .collect()
}
