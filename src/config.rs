//! Configuration parameters for transcription
//!
//! Every stage receives its parameters explicitly; there is no global state.
//! `Default` carries the reference constants.

use crate::error::AnalysisError;

/// MIDI number of pitch bin 0 (A0) in the 88-bin activation layout
pub const MIDI_OFFSET: i32 = 21;

/// Number of pitch bins produced by the transcription model
pub const N_PITCHES: usize = 88;

/// Beat-grid parameters
#[derive(Debug, Clone)]
pub struct GridConfig {
    /// Sub-intervals per beat (default: 4)
    pub subdivisions: usize,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self { subdivisions: 4 }
    }
}

/// STFT, HPSS and chroma parameters used by the key estimator
#[derive(Debug, Clone)]
pub struct ChromaConfig {
    /// FFT size (default: 2048)
    pub n_fft: usize,

    /// Hop size in samples (default: 256)
    pub hop_length: usize,

    /// Lowest MIDI note mapped into chroma (default: 24, C1)
    pub fmin_midi: f32,

    /// Number of octaves above `fmin_midi` (default: 7)
    pub n_octaves: usize,

    /// Median filter length for HPSS, in frames and bins (default: 31)
    pub hpss_kernel: usize,

    /// HPSS soft-mask margin (default: 1.0)
    pub hpss_margin: f32,
}

impl Default for ChromaConfig {
    fn default() -> Self {
        Self {
            n_fft: 2048,
            hop_length: 256,
            fmin_midi: 24.0,
            n_octaves: 7,
            hpss_kernel: 31,
            hpss_margin: 1.0,
        }
    }
}

/// Key transition probabilities (before row normalization)
#[derive(Debug, Clone)]
pub struct KeyHmmParams {
    /// Self transition (default: 0.90)
    pub stable_prob: f64,

    /// Relative major/minor (default: 0.05)
    pub relative_prob: f64,

    /// Dominant and subdominant, same mode (default: 0.01)
    pub fifth_prob: f64,

    /// Parallel major/minor (default: 0.003)
    pub parallel_prob: f64,

    /// Every other transition (default: 0.001)
    pub floor_prob: f64,

    /// Initial probability of non-global keys (default: 0.1)
    pub init_prob: f64,

    /// Initial probability of the global key (default: 0.30)
    pub init_global_prob: f64,
}

impl Default for KeyHmmParams {
    fn default() -> Self {
        Self {
            stable_prob: 0.90,
            relative_prob: 0.05,
            fifth_prob: 0.01,
            parallel_prob: 0.003,
            floor_prob: 0.001,
            init_prob: 0.1,
            init_global_prob: 0.30,
        }
    }
}

/// Key estimation parameters
#[derive(Debug, Clone)]
pub struct KeyConfig {
    /// Gaussian sigma (grid slots) for chroma smoothing (default: 4.0)
    pub filter_sigma: f32,

    /// Major reference profile (Krumhansl-Schmuckler)
    pub major_profile: [f32; 12],

    /// Minor reference profile (Krumhansl-Schmuckler)
    pub minor_profile: [f32; 12],

    /// HMM transition and prior parameters
    pub hmm: KeyHmmParams,
}

impl Default for KeyConfig {
    fn default() -> Self {
        Self {
            filter_sigma: 4.0,
            major_profile: [
                6.35, 2.23, 3.48, 2.33, 4.38, 4.09, 2.52, 5.19, 2.39, 3.66, 2.29, 2.88,
            ],
            minor_profile: [
                6.33, 2.68, 3.52, 5.38, 2.60, 3.53, 2.54, 4.75, 3.98, 2.69, 3.34, 3.17,
            ],
            hmm: KeyHmmParams::default(),
        }
    }
}

/// Scale-mask weights
#[derive(Debug, Clone)]
pub struct ScaleBiasConfig {
    /// Diatonic notes (default: 1.2)
    pub in_scale_weight: f32,

    /// Raised 6th/7th degrees in minor keys (default: 0.9)
    pub melodic_minor_weight: f32,

    /// Everything else (default: 0.6)
    pub out_of_scale_weight: f32,
}

impl Default for ScaleBiasConfig {
    fn default() -> Self {
        Self {
            in_scale_weight: 1.2,
            melodic_minor_weight: 0.9,
            out_of_scale_weight: 0.6,
        }
    }
}

/// Motif detection and correction parameters
#[derive(Debug, Clone)]
pub struct MotifConfig {
    /// Lowest pitch bin of the vocal range, inclusive (default: 15, C2)
    pub lowest_pitch: usize,

    /// Highest pitch bin of the vocal range, inclusive (default: 67, E6)
    pub highest_pitch: usize,

    /// Gaussian sigma across pitch bins (default: 0.8)
    pub pitch_sigma: f32,

    /// Uniform smoothing window across slots (default: 2)
    pub time_window: usize,

    /// Per-slot gate relative to the slot peak (default: 0.6)
    pub local_gate: f32,

    /// Slot gate relative to the mean peak (default: 0.7)
    pub frame_gate: f32,

    /// Minimum diagonal offset between matches (default: 3)
    pub width: usize,

    /// Nearest neighbours kept per slot; `None` derives it from the length
    pub neighbors: Option<usize>,

    /// Gaussian sigma along diagonals (default: 1.2)
    pub diagonal_sigma: f32,

    /// Percentile of positive affinities used as threshold (default: 90.0)
    pub threshold_percentile: f32,

    /// Minimum run length in slots (default: 8)
    pub min_length: usize,

    /// Candidates considered before greedy selection (default: 100)
    pub max_candidates: usize,

    /// Maximum accepted segments (default: 30)
    pub max_segments: usize,

    /// Weight of the original probabilities in the blend (default: 0.6)
    pub self_weight: f32,

    /// Weight of the motif partner average in the blend (default: 0.4)
    pub motif_weight: f32,
}

impl Default for MotifConfig {
    fn default() -> Self {
        Self {
            lowest_pitch: 15,
            highest_pitch: 67,
            pitch_sigma: 0.8,
            time_window: 2,
            local_gate: 0.6,
            frame_gate: 0.7,
            width: 3,
            neighbors: None,
            diagonal_sigma: 1.2,
            threshold_percentile: 90.0,
            min_length: 8,
            max_candidates: 100,
            max_segments: 30,
            self_weight: 0.6,
            motif_weight: 0.4,
        }
    }
}

/// Note assignment parameters
#[derive(Debug, Clone)]
pub struct NoteConfig {
    /// Minimum onset activation that starts a new note (default: 0.50)
    pub onset_threshold: f32,

    /// Minimum pitch activation that sustains a note (default: 0.40)
    pub pitch_threshold: f32,

    /// Velocity of emitted notes (default: 50)
    pub velocity: u8,
}

impl Default for NoteConfig {
    fn default() -> Self {
        Self {
            onset_threshold: 0.50,
            pitch_threshold: 0.40,
            velocity: 50,
        }
    }
}

/// Transcription configuration parameters
#[derive(Debug, Clone, Default)]
pub struct TranscriptionConfig {
    /// Beat grid
    pub grid: GridConfig,

    /// Chroma extraction
    pub chroma: ChromaConfig,

    /// Key estimation
    pub key: KeyConfig,

    /// Scale bias
    pub scale: ScaleBiasConfig,

    /// Motif detection and correction
    pub motif: MotifConfig,

    /// Note assignment
    pub notes: NoteConfig,
}

impl TranscriptionConfig {
    /// Check parameter ranges before running the pipeline.
    pub fn validate(&self) -> Result<(), AnalysisError> {
        if self.grid.subdivisions == 0 {
            return Err(AnalysisError::InvalidInput(
                "subdivisions must be >= 1".to_string(),
            ));
        }

        let c = &self.chroma;
        if c.n_fft < 2 || c.hop_length == 0 || c.hop_length > c.n_fft {
            return Err(AnalysisError::InvalidInput(format!(
                "Invalid STFT parameters: n_fft={}, hop_length={}",
                c.n_fft, c.hop_length
            )));
        }
        if c.hpss_kernel == 0 || c.n_octaves == 0 || c.hpss_margin <= 0.0 {
            return Err(AnalysisError::InvalidInput(
                "hpss_kernel, n_octaves and hpss_margin must be positive".to_string(),
            ));
        }

        if self.key.filter_sigma < 0.0 {
            return Err(AnalysisError::InvalidInput(format!(
                "filter_sigma must be >= 0, got {}",
                self.key.filter_sigma
            )));
        }
        let h = &self.key.hmm;
        let probs = [
            h.stable_prob,
            h.relative_prob,
            h.fifth_prob,
            h.parallel_prob,
            h.floor_prob,
            h.init_prob,
            h.init_global_prob,
        ];
        if probs.iter().any(|p| !p.is_finite() || *p < 0.0) || h.floor_prob <= 0.0 {
            return Err(AnalysisError::InvalidInput(
                "HMM probabilities must be finite and non-negative, floor > 0".to_string(),
            ));
        }

        let m = &self.motif;
        if m.lowest_pitch > m.highest_pitch || m.highest_pitch >= N_PITCHES {
            return Err(AnalysisError::InvalidInput(format!(
                "Invalid vocal range: [{}, {}]",
                m.lowest_pitch, m.highest_pitch
            )));
        }
        if m.width == 0 || m.min_length == 0 || m.time_window == 0 {
            return Err(AnalysisError::InvalidInput(
                "width, min_length and time_window must be >= 1".to_string(),
            ));
        }
        if !(0.0..=100.0).contains(&m.threshold_percentile) {
            return Err(AnalysisError::InvalidInput(format!(
                "threshold_percentile must be in [0, 100], got {}",
                m.threshold_percentile
            )));
        }

        let n = &self.notes;
        if !(0.0..=1.0).contains(&n.onset_threshold) || !(0.0..=1.0).contains(&n.pitch_threshold) {
            return Err(AnalysisError::InvalidInput(
                "note thresholds must be in [0, 1]".to_string(),
            ));
        }

        Ok(())
    }
}
