//! Greedy monophonic note assignment
//!
//! Walks the grid once, keeping at most one sounding note. A note starts on
//! the first slot with a confident pitch and ends when the pitch disappears,
//! changes, or a new onset fires. While a note sounds its slot is rewritten
//! to a one-hot vector at the note's pitch.

use crate::analysis::result::NoteEvent;
use crate::array::{argmax, FrameArray};
use crate::config::{NoteConfig, MIDI_OFFSET};
use crate::error::AnalysisError;

/// Note assignment output
#[derive(Debug, Clone, PartialEq)]
pub struct NoteAssignment {
    /// Pitch grid with sounding slots replaced by one-hot rows
    pub assigned: FrameArray,

    /// Emitted notes in start order
    pub notes: Vec<NoteEvent>,
}

/// Segmentation state
#[derive(Debug, Clone, Copy, PartialEq)]
enum NoteState {
    Idle,
    Active { pitch: u8, start: f64 },
}

/// MIDI pitch of the strongest bin if it reaches `threshold`
fn detect(row: &[f32], threshold: f32) -> Option<u8> {
    argmax(row)
        .filter(|&(_, value)| value >= threshold)
        .map(|(idx, _)| (idx as i32 + MIDI_OFFSET).clamp(0, 127) as u8)
}

/// Segment grid activations into notes
///
/// # Arguments
///
/// * `onsets` - Onset grid `(slots, 88)`
/// * `notes` - Pitch grid `(slots, 88)`
/// * `times` - Start time of each slot in seconds
/// * `config` - Thresholds and velocity
///
/// # Returns
///
/// Rewritten pitch grid and the note list. A note still sounding at the end
/// closes one slot duration after the last slot time (or at the last slot
/// time when there is only one slot).
///
/// # Errors
///
/// Returns `AnalysisError::InputShapeMismatch` if `onsets` and `notes` differ
/// in shape or `times` has a different length than the grid
///
/// # Example
///
/// ```
/// use solfege_dsp::array::FrameArray;
/// use solfege_dsp::config::NoteConfig;
/// use solfege_dsp::features::notes::assign_notes;
///
/// let mut notes = FrameArray::zeros(3, 88);
/// for t in 0..3 {
///     notes.set(t, 39, 0.9); // MIDI 60
/// }
/// let onsets = FrameArray::zeros(3, 88);
/// let out = assign_notes(&onsets, &notes, &[0.0, 0.25, 0.5], &NoteConfig::default())?;
/// assert_eq!(out.notes.len(), 1);
/// assert_eq!(out.notes[0].pitch, 60);
/// assert_eq!(out.notes[0].end, 0.75);
/// # Ok::<(), solfege_dsp::AnalysisError>(())
/// ```
pub fn assign_notes(
    onsets: &FrameArray,
    notes: &FrameArray,
    times: &[f64],
    config: &NoteConfig,
) -> Result<NoteAssignment, AnalysisError> {
    if onsets.shape() != notes.shape() {
        return Err(AnalysisError::InputShapeMismatch(format!(
            "onsets {:?} and notes {:?} must have the same shape",
            onsets.shape(),
            notes.shape()
        )));
    }
    if notes.rows() != times.len() {
        return Err(AnalysisError::InputShapeMismatch(format!(
            "grid has {} slots but {} grid times",
            notes.rows(),
            times.len()
        )));
    }

    let mut assigned = notes.clone();
    let mut events = Vec::new();
    let mut state = NoteState::Idle;

    for (i, &time) in times.iter().enumerate() {
        let detected_onset = detect(onsets.row(i), config.onset_threshold);
        let detected_pitch = detect(notes.row(i), config.pitch_threshold);

        if let NoteState::Active { pitch, start } = state {
            if detected_pitch != Some(pitch) || detected_onset.is_some() {
                events.push(NoteEvent {
                    start,
                    end: time,
                    pitch,
                    velocity: config.velocity,
                });
                state = NoteState::Idle;
            }
        }

        if let (NoteState::Idle, Some(pitch)) = (state, detected_pitch) {
            state = NoteState::Active { pitch, start: time };
        }

        if let NoteState::Active { pitch, .. } = state {
            let row = assigned.row_mut(i);
            row.iter_mut().for_each(|v| *v = 0.0);
            let col = pitch as i32 - MIDI_OFFSET;
            if let Some(v) = usize::try_from(col).ok().and_then(|c| row.get_mut(c)) {
                *v = 1.0;
            }
        }
    }

    if let NoteState::Active { pitch, start } = state {
        let end = match times {
            [.., prev, last] => last + (last - prev),
            [last] => *last,
            [] => start,
        };
        events.push(NoteEvent {
            start,
            end,
            pitch,
            velocity: config.velocity,
        });
    }

    log::debug!(
        "Note assignment: {} slots -> {} notes",
        times.len(),
        events.len()
    );

    Ok(NoteAssignment {
        assigned,
        notes: events,
    })
}
