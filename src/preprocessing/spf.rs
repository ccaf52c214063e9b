//! Seconds-per-frame calibration
//!
//! The transcription model reports activations at a nominal hop, but its own
//! note list is timestamped in seconds. Matching the last reported note to
//! the last frame where its onset fires gives the effective frame period.

use crate::array::FrameArray;
use crate::config::MIDI_OFFSET;
use crate::error::AnalysisError;
use serde::{Deserialize, Serialize};

/// Onset activation a frame must exceed to count as the reference onset
pub const CALIBRATION_ONSET_THRESHOLD: f32 = 0.5;

/// Where a seconds-per-frame value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpfSource {
    /// Measured from a reference note
    Calibrated,
    /// Nominal `hop / sample_rate`
    Theoretical,
}

/// Seconds per activation frame and its provenance
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpfCalibration {
    /// Seconds per frame
    pub spf: f64,

    /// Provenance
    pub source: SpfSource,
}

impl SpfCalibration {
    /// Nominal value `hop_length / sample_rate`
    pub fn theoretical(hop_length: usize, sample_rate: u32) -> Result<Self, AnalysisError> {
        if hop_length == 0 || sample_rate == 0 {
            return Err(AnalysisError::InvalidInput(format!(
                "Invalid hop/sample rate: {}/{}",
                hop_length, sample_rate
            )));
        }
        Ok(Self {
            spf: hop_length as f64 / sample_rate as f64,
            source: SpfSource::Theoretical,
        })
    }

    /// A caller-measured value
    pub fn calibrated(spf: f64) -> Self {
        Self {
            spf,
            source: SpfSource::Calibrated,
        }
    }
}

/// Reference note reported by the transcription model
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferenceNote {
    /// Start time in seconds
    pub start: f64,

    /// MIDI pitch
    pub pitch: u8,
}

/// Calibrate seconds-per-frame against the model's last note
///
/// Finds the last frame whose onset activation for `reference.pitch` exceeds
/// 0.5 and returns `reference.start / frame`. Falls back to `theoretical`
/// (logged at `warn`) when there is no reference note, the pitch is outside
/// the activation range, no onset frame exists, or the result is not a
/// positive finite number.
///
/// # Arguments
///
/// * `onsets` - Frame-rate onset activations `(frames, 88)`
/// * `reference` - Last note reported by the model, if any
/// * `theoretical` - Fallback calibration
pub fn calibrate_spf(
    onsets: &FrameArray,
    reference: Option<ReferenceNote>,
    theoretical: SpfCalibration,
) -> SpfCalibration {
    let fallback = |reason: &str| {
        log::warn!(
            "SPF calibration failed ({}), using theoretical {:.10} s/frame",
            reason,
            theoretical.spf
        );
        SpfCalibration {
            spf: theoretical.spf,
            source: SpfSource::Theoretical,
        }
    };

    let Some(note) = reference else {
        return fallback("no reference note");
    };
    let col = note.pitch as i32 - MIDI_OFFSET;
    if col < 0 || col as usize >= onsets.cols() {
        return fallback("reference pitch outside activation range");
    }

    let last_frame = onsets
        .column(col as usize)
        .iter()
        .rposition(|&v| v > CALIBRATION_ONSET_THRESHOLD);
    let Some(frame) = last_frame.filter(|&f| f > 0) else {
        return fallback("no onset frame for reference pitch");
    };

    let spf = note.start / frame as f64;
    if !spf.is_finite() || spf <= 0.0 {
        return fallback("non-positive measured value");
    }

    log::debug!("Auto-calibrated SPF: {:.10} s/frame (frame {})", spf, frame);
    SpfCalibration::calibrated(spf)
}
