//! Pipeline inputs supplied by external collaborators
//!
//! The transcription model, beat tracker and audio front end run outside this
//! crate; their outputs are gathered here.

use crate::array::FrameArray;
use crate::error::AnalysisError;
use crate::preprocessing::spf::SpfCalibration;

/// Beat tracker output
#[derive(Debug, Clone, PartialEq)]
pub struct BeatTrack {
    /// Global tempo in BPM, `None` if the tracker found none
    pub tempo_bpm: Option<f32>,

    /// Beat timestamps in seconds
    pub beat_times: Vec<f64>,
}

impl BeatTrack {
    /// Usable tempo
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::TempoDetectionFailure` if the tempo is missing,
    /// not finite or not positive
    pub fn tempo(&self) -> Result<f32, AnalysisError> {
        match self.tempo_bpm {
            Some(bpm) if bpm.is_finite() && bpm > 0.0 => Ok(bpm),
            Some(bpm) => Err(AnalysisError::TempoDetectionFailure(format!(
                "invalid tempo {} BPM",
                bpm
            ))),
            None => Err(AnalysisError::TempoDetectionFailure(
                "beat tracker reported no tempo".to_string(),
            )),
        }
    }
}

/// Audio used for key estimation
#[derive(Debug, Clone, PartialEq)]
pub enum KeySource {
    /// Mono waveform of the original mix, tuning-corrected
    Waveform {
        /// Samples
        samples: Vec<f32>,
        /// Sample rate in Hz
        sample_rate: u32,
    },

    /// Precomputed chroma `(frames, 12)`
    Chroma {
        /// Chroma frames
        frames: FrameArray,
        /// Seconds per chroma frame
        spf: f64,
    },
}

/// Everything [`transcribe`](crate::transcribe) needs
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptionInput {
    /// Frame-rate onset activations `(frames, 88)`
    pub onsets: FrameArray,

    /// Frame-rate pitch activations `(frames, 88)`
    pub pitches: FrameArray,

    /// Seconds per activation frame
    pub spf: SpfCalibration,

    /// Beat tracker output
    pub beats: BeatTrack,

    /// Audio for key estimation
    pub key_source: KeySource,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tempo_validation() {
        let mut beats = BeatTrack {
            tempo_bpm: Some(120.0),
            beat_times: vec![],
        };
        assert_eq!(beats.tempo().unwrap(), 120.0);

        for bad in [None, Some(0.0), Some(-90.0), Some(f32::NAN)] {
            beats.tempo_bpm = bad;
            assert!(matches!(
                beats.tempo(),
                Err(AnalysisError::TempoDetectionFailure(_))
            ));
        }
    }
}
