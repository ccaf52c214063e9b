//! Time-varying key estimation
//!
//! Tracks the key over a beat grid with a 24-state HMM. Chroma is quantized
//! onto the grid, smoothed, grouped into beat-sized blocks and correlated
//! with the key templates; Viterbi decoding then picks a key per block,
//! which is expanded back to one key per grid slot.
//!
//! # Algorithm
//!
//! 1. Chroma (STFT -> HPSS -> pitch-class projection), or caller-supplied chroma
//! 2. Mean-quantize onto the beat grid, Gaussian-smooth across slots
//! 3. Average blocks of `subdivisions` slots (tail padded with the last slot)
//! 4. Correlate each block with the 24 templates
//! 5. Global key = best summed correlation
//! 6. Emissions `exp(score)`, row-normalized; Viterbi with key-distance transitions
//! 7. Repeat each block's key over its slots, truncated to the grid length

use super::hmm::viterbi;
use super::templates::KeyTemplates;
use super::transitions::{build_transition_matrix, initial_distribution};
use crate::analysis::result::{Key, KeyEstimate, N_KEYS};
use crate::array::FrameArray;
use crate::config::TranscriptionConfig;
use crate::error::AnalysisError;
use crate::features::chroma::{center_and_normalize, extract_chroma, smooth_chroma};
use crate::features::grid::{quantize_to_grid, Aggregation};

/// One composite key index (0–23) per grid slot
pub type KeySequence = Vec<usize>;

/// Estimate the key sequence from a waveform
///
/// # Arguments
///
/// * `samples` - Mono waveform (ideally the instrumental stem)
/// * `sample_rate` - Sample rate in Hz
/// * `beat_times` - Beat timestamps in seconds
/// * `config` - Transcription configuration (chroma, grid and key sections)
///
/// # Returns
///
/// Key index per grid slot and the global key
///
/// # Errors
///
/// Returns `AnalysisError::InvalidInput` if the audio is too short to produce
/// any chroma frame or any grid slot
pub fn estimate_key_sequence(
    samples: &[f32],
    sample_rate: u32,
    beat_times: &[f64],
    config: &TranscriptionConfig,
) -> Result<(KeySequence, KeyEstimate), AnalysisError> {
    let chroma = extract_chroma(samples, sample_rate, &config.chroma)?;
    let chroma_spf = config.chroma.hop_length as f64 / sample_rate as f64;
    estimate_key_sequence_from_chroma(&chroma, chroma_spf, beat_times, config)
}

/// Estimate the key sequence from precomputed chroma
///
/// # Arguments
///
/// * `chroma` - Chroma frames `(frames, 12)`
/// * `chroma_spf` - Seconds per chroma frame
/// * `beat_times` - Beat timestamps in seconds
/// * `config` - Transcription configuration
///
/// # Returns
///
/// Key index per grid slot and the global key
///
/// # Errors
///
/// Returns `AnalysisError::InvalidInput` for empty chroma, a chroma width other
/// than 12, or an empty grid
pub fn estimate_key_sequence_from_chroma(
    chroma: &FrameArray,
    chroma_spf: f64,
    beat_times: &[f64],
    config: &TranscriptionConfig,
) -> Result<(KeySequence, KeyEstimate), AnalysisError> {
    if chroma.is_empty() {
        return Err(AnalysisError::InvalidInput(
            "Empty chroma: audio too short for key estimation".to_string(),
        ));
    }
    if chroma.cols() != 12 {
        return Err(AnalysisError::InvalidInput(format!(
            "Chroma must have 12 pitch classes, got {}",
            chroma.cols()
        )));
    }

    let subdivisions = config.grid.subdivisions;
    let grid = quantize_to_grid(chroma, beat_times, chroma_spf, subdivisions, Aggregation::Mean)?;
    if grid.is_empty() {
        return Err(AnalysisError::InvalidInput(
            "Beat grid for chroma is empty".to_string(),
        ));
    }

    let smoothed = smooth_chroma(&grid.values, config.key.filter_sigma);
    let blocks = block_average(&smoothed, subdivisions);

    let templates = KeyTemplates::new(&config.key);
    let scores: Vec<[f32; N_KEYS]> = blocks
        .iter_rows()
        .map(|row| templates.score(&center_and_normalize(row)))
        .collect();

    let global_key = global_key(&scores);
    log::debug!(
        "Key estimation: {} slots, {} blocks, global key {}",
        grid.len(),
        blocks.rows(),
        global_key.label()
    );

    let emissions: Vec<Vec<f64>> = scores.iter().map(|s| emission_row(s)).collect();
    let transition = build_transition_matrix(&config.key.hmm);
    let p_init = initial_distribution(global_key, &config.key.hmm);
    let path = viterbi(&emissions, &transition, &p_init)?;

    let sequence: KeySequence = path
        .iter()
        .flat_map(|&k| std::iter::repeat(k).take(subdivisions))
        .take(grid.len())
        .collect();

    let changes = sequence.windows(2).filter(|w| w[0] != w[1]).count();
    log::debug!("Key sequence decoded with {} key changes", changes);

    Ok((sequence, KeyEstimate::from(global_key)))
}

/// Average consecutive blocks of `block_size` rows, padding the tail with the last row.
fn block_average(values: &FrameArray, block_size: usize) -> FrameArray {
    let rows = values.rows();
    let block_size = block_size.max(1);
    let n_blocks = rows.div_ceil(block_size);
    let mut out = FrameArray::zeros(n_blocks, values.cols());

    for b in 0..n_blocks {
        let acc = out.row_mut(b);
        for offset in 0..block_size {
            let r = (b * block_size + offset).min(rows - 1);
            for (a, v) in acc.iter_mut().zip(values.row(r)) {
                *a += v;
            }
        }
        for a in acc.iter_mut() {
            *a /= block_size as f32;
        }
    }
    out
}

/// Key with the highest score summed over all blocks
fn global_key(scores: &[[f32; N_KEYS]]) -> Key {
    let mut totals = [0.0f32; N_KEYS];
    for row in scores {
        for (t, s) in totals.iter_mut().zip(row.iter()) {
            *t += s;
        }
    }
    crate::array::argmax(&totals)
        .and_then(|(idx, _)| Key::from_index(idx))
        .unwrap_or(Key::Major(0))
}

/// Softmax over correlation scores
fn emission_row(scores: &[f32; N_KEYS]) -> Vec<f64> {
    let exp: Vec<f64> = scores.iter().map(|&s| (s as f64).exp()).collect();
    let sum: f64 = exp.iter().sum();
    exp.into_iter().map(|e| e / sum).collect()
}
