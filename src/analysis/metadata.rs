//! Transcription metadata structures

use crate::preprocessing::spf::SpfSource;
use serde::{Deserialize, Serialize};

/// Transcription metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptionMetadata {
    /// Duration covered by the activation frames, in seconds
    pub duration_seconds: f64,

    /// Seconds per activation frame
    pub seconds_per_frame: f64,

    /// Where the seconds-per-frame value came from
    pub spf_source: SpfSource,

    /// Tempo reported by the beat tracker, in BPM
    pub tempo_bpm: f32,

    /// Number of beats used for the grid
    pub beat_count: usize,

    /// Number of grid slots
    pub grid_slots: usize,

    /// Number of accepted motif segments
    pub motif_count: usize,

    /// Processing time in milliseconds
    pub processing_time_ms: f32,

    /// Algorithm version
    pub algorithm_version: String,

    /// Non-fatal conditions encountered while processing
    pub warnings: Vec<String>,
}

impl Default for TranscriptionMetadata {
    fn default() -> Self {
        Self {
            duration_seconds: 0.0,
            seconds_per_frame: 0.0,
            spf_source: SpfSource::Theoretical,
            tempo_bpm: 0.0,
            beat_count: 0,
            grid_slots: 0,
            motif_count: 0,
            processing_time_ms: 0.0,
            algorithm_version: env!("CARGO_PKG_VERSION").to_string(),
            warnings: vec![],
        }
    }
}
