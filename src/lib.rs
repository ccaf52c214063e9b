//! # Solfège DSP
//!
//! Key-aware solfège transcription: turns frame-rate pitch and onset
//! activations from a neural transcription model into a monophonic note
//! sequence labeled with movable-do syllables.
//!
//! ## Features
//!
//! - **Beat Grid**: Beat-synchronous quantization with real-time-aligned slots
//! - **Key Tracking**: HPSS chroma, Krumhansl-Schmuckler templates and HMM Viterbi decoding
//! - **Scale Bias**: Per-key reweighting of out-of-scale detections
//! - **Motif Correction**: Self-similarity analysis that lets repeated phrases reinforce each other
//! - **Note Assignment**: Greedy monophonic segmentation
//! - **Solfège**: Movable-do labels relative to the key active at each note
//!
//! ## Quick Start
//!
//! ```no_run
//! use solfege_dsp::{transcribe, BeatTrack, KeySource, TranscriptionConfig, TranscriptionInput};
//! use solfege_dsp::array::FrameArray;
//! use solfege_dsp::preprocessing::spf::SpfCalibration;
//!
//! // Activations from the transcription model (frames x 88)
//! let onsets = FrameArray::zeros(1000, 88);
//! let pitches = FrameArray::zeros(1000, 88);
//! let mix: Vec<f32> = vec![]; // Original mix, tuning-corrected
//!
//! let input = TranscriptionInput {
//!     onsets,
//!     pitches,
//!     spf: SpfCalibration::theoretical(256, 22050)?,
//!     beats: BeatTrack { tempo_bpm: Some(120.0), beat_times: vec![0.5, 1.0, 1.5] },
//!     key_source: KeySource::Waveform { samples: mix, sample_rate: 22050 },
//! };
//!
//! let result = transcribe(&input, &TranscriptionConfig::default())?;
//! println!("Key: {}", result.estimated_global_key);
//! for note in &result.notes {
//!     println!("{:.2}s {} ({})", note.note.start, note.solfege, note.key);
//! }
//! # Ok::<(), solfege_dsp::AnalysisError>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! Activations + Beats → Grid → Key Sequence → Scale Bias → Motif Correction → Notes → Solfège
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod analysis;
pub mod array;
pub mod config;
pub mod error;
pub mod features;
pub mod input;
pub mod io;
pub mod preprocessing;

// Re-export main types
pub use analysis::metadata::TranscriptionMetadata;
pub use analysis::result::{
    Key, KeyEstimate, KeySequenceEntry, Mode, NoteEvent, SolfegeNote, TranscriptionResult,
};
pub use config::TranscriptionConfig;
pub use error::AnalysisError;
pub use input::{BeatTrack, KeySource, TranscriptionInput};

use analysis::solfege::{attach_solfege, key_sequence_entries};
use features::grid::{quantize_to_grid, Aggregation};
use features::key::{apply_scale_bias, estimate_key_sequence, estimate_key_sequence_from_chroma};
use features::motif::{apply_motif_correction, extract_motifs};
use features::notes::assign_notes;
use preprocessing::spf::SpfSource;

/// Main transcription function
///
/// Runs every stage in order: grid quantization (onsets and pitches in
/// parallel), key sequence estimation, scale bias, motif detection and
/// correction, note assignment and solfège labeling.
///
/// # Arguments
///
/// * `input` - Activations, frame period, beats and key audio
/// * `config` - Transcription configuration parameters
///
/// # Returns
///
/// `TranscriptionResult` with the global key, key per grid slot, labeled
/// notes and processing metadata
///
/// # Errors
///
/// - `AnalysisError::InvalidInput` for an invalid configuration or empty activations
/// - `AnalysisError::InputShapeMismatch` if onset and pitch activations differ in shape
/// - `AnalysisError::TempoDetectionFailure` if the beat tracker produced no usable tempo
///
/// Degenerate motif input is not an error: the run continues without motifs
/// and records a warning in the metadata.
pub fn transcribe(
    input: &TranscriptionInput,
    config: &TranscriptionConfig,
) -> Result<TranscriptionResult, AnalysisError> {
    use std::time::Instant;
    let start_time = Instant::now();

    config.validate()?;
    let tempo_bpm = input.beats.tempo()?;

    if input.onsets.shape() != input.pitches.shape() {
        return Err(AnalysisError::InputShapeMismatch(format!(
            "onset activations {:?} vs pitch activations {:?}",
            input.onsets.shape(),
            input.pitches.shape()
        )));
    }
    if input.pitches.is_empty() {
        return Err(AnalysisError::InvalidInput(
            "Empty activation frames".to_string(),
        ));
    }

    let spf = input.spf.spf;
    let beat_times = &input.beats.beat_times;
    let duration_seconds = input.pitches.rows() as f64 * spf;
    // Beats past the last frame never reach the grid
    let beat_count = beat_times.partition_point(|&t| t <= duration_seconds);
    let subdivisions = config.grid.subdivisions;
    let mut warnings = Vec::new();

    log::debug!(
        "Starting transcription: {} frames, spf {:.6} ({:?}), {} beats at {:.1} BPM",
        input.pitches.rows(),
        spf,
        input.spf.source,
        beat_times.len(),
        tempo_bpm
    );

    if input.spf.source == SpfSource::Theoretical {
        warnings.push("Seconds per frame not calibrated; using theoretical value".to_string());
    }
    if beat_times.is_empty() {
        log::warn!("No beats detected; using a single whole-track grid");
        warnings.push("No beats detected; grid covers the whole track".to_string());
    }

    // Step 1: Beat-grid quantization
    let (onset_grid, pitch_grid) = rayon::join(
        || quantize_to_grid(&input.onsets, beat_times, spf, subdivisions, Aggregation::Max),
        || {
            quantize_to_grid(
                &input.pitches,
                beat_times,
                spf,
                subdivisions,
                Aggregation::CenterWeighted,
            )
        },
    );
    let onset_grid = onset_grid?;
    let pitch_grid = pitch_grid?;
    log::debug!("Grid: {} slots x {} pitches", pitch_grid.len(), pitch_grid.values.cols());

    // Step 2: Key sequence
    let (raw_keys, global_key) = match &input.key_source {
        KeySource::Waveform {
            samples,
            sample_rate,
        } => estimate_key_sequence(samples, *sample_rate, beat_times, config)?,
        KeySource::Chroma { frames, spf } => {
            estimate_key_sequence_from_chroma(frames, *spf, beat_times, config)?
        }
    };
    let key_sequence = align_key_sequence(&raw_keys, pitch_grid.len());
    log::debug!("Global key: {}", global_key.label);

    // Step 3: Scale bias
    let (biased_notes, biased_onsets) = apply_scale_bias(
        &pitch_grid.values,
        &onset_grid.values,
        &key_sequence,
        &config.scale,
    )?;

    // Step 4: Motif detection and correction
    let motifs = match extract_motifs(&biased_notes, &config.motif) {
        Ok(motifs) => motifs,
        Err(e) if !e.is_fatal() => {
            log::debug!("Continuing without motifs: {}", e);
            warnings.push(e.to_string());
            Vec::new()
        }
        Err(e) => return Err(e),
    };
    let corrected = apply_motif_correction(
        &biased_notes,
        &motifs,
        config.motif.self_weight,
        config.motif.motif_weight,
    );

    // Step 5: Note assignment
    let assignment = assign_notes(&biased_onsets, &corrected, &pitch_grid.times, &config.notes)?;

    // Step 6: Solfège
    let notes = attach_solfege(&assignment.notes, &key_sequence, &pitch_grid.times);
    let key_entries = key_sequence_entries(&key_sequence, &pitch_grid.times);

    let processing_time_ms = start_time.elapsed().as_secs_f32() * 1000.0;
    log::debug!(
        "Transcription complete: {} notes, {} motifs in {:.1} ms",
        notes.len(),
        motifs.len(),
        processing_time_ms
    );

    Ok(TranscriptionResult {
        estimated_global_key: global_key.label.clone(),
        global_key,
        key_sequence: key_entries,
        note_count: notes.len(),
        notes,
        metadata: TranscriptionMetadata {
            duration_seconds,
            seconds_per_frame: spf,
            spf_source: input.spf.source,
            tempo_bpm,
            beat_count,
            grid_slots: pitch_grid.len(),
            motif_count: motifs.len(),
            processing_time_ms,
            warnings,
            ..TranscriptionMetadata::default()
        },
    })
}

/// Repeat the last key or truncate so there is one key per grid slot
fn align_key_sequence(keys: &[usize], len: usize) -> Vec<usize> {
    match keys.last() {
        Some(&last) => keys
            .iter()
            .copied()
            .chain(std::iter::repeat(last))
            .take(len)
            .collect(),
        None => Vec::new(),
    }
}
