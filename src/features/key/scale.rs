//! Scale-consistency reweighting
//!
//! Multiplies every pitch column of a grid slot by a weight that depends on
//! the column's interval from the slot's key root: diatonic notes are
//! boosted, the raised 6th/7th of minor keys are mildly damped and everything
//! else is damped harder.

use crate::analysis::result::Key;
use crate::array::FrameArray;
use crate::config::{ScaleBiasConfig, MIDI_OFFSET};
use crate::error::AnalysisError;

/// Major scale intervals from the tonic
const MAJOR_SCALE: [u32; 7] = [0, 2, 4, 5, 7, 9, 11];

/// Natural minor scale intervals from the tonic
const MINOR_SCALE: [u32; 7] = [0, 2, 3, 5, 7, 8, 10];

/// Raised 6th and 7th degrees of the melodic/harmonic minor
const MINOR_ALTERED: [u32; 2] = [6, 11];

/// Per-pitch weight vector for one key
///
/// # Arguments
///
/// * `key_index` - Composite key index (0–23)
/// * `n_pitches` - Number of pitch columns
/// * `midi_offset` - MIDI number of column 0
/// * `weights` - Scale weights
///
/// # Errors
///
/// Returns `AnalysisError::InvalidInput` for a key index outside 0–23
///
/// # Example
///
/// ```
/// use solfege_dsp::config::ScaleBiasConfig;
/// use solfege_dsp::features::key::scale_mask;
///
/// // C major, column 39 = MIDI 60 (C4), column 40 = C#4
/// let mask = scale_mask(0, 88, 21, &ScaleBiasConfig::default())?;
/// assert_eq!(mask[39], 1.2);
/// assert_eq!(mask[40], 0.6);
/// # Ok::<(), solfege_dsp::AnalysisError>(())
/// ```
pub fn scale_mask(
    key_index: usize,
    n_pitches: usize,
    midi_offset: i32,
    weights: &ScaleBiasConfig,
) -> Result<Vec<f32>, AnalysisError> {
    let key = Key::from_index(key_index).ok_or_else(|| {
        AnalysisError::InvalidInput(format!("Key index out of range: {}", key_index))
    })?;
    let root = key.root() as i32;
    let (scale, altered): (&[u32], &[u32]) = match key {
        Key::Major(_) => (&MAJOR_SCALE, &[]),
        Key::Minor(_) => (&MINOR_SCALE, &MINOR_ALTERED),
    };

    Ok((0..n_pitches)
        .map(|i| {
            let midi = i as i32 + midi_offset;
            let interval = (midi.rem_euclid(12) - root).rem_euclid(12) as u32;
            if scale.contains(&interval) {
                weights.in_scale_weight
            } else if altered.contains(&interval) {
                weights.melodic_minor_weight
            } else {
                weights.out_of_scale_weight
            }
        })
        .collect())
}

/// Reweight pitch and onset grids by the key active in each slot
///
/// # Arguments
///
/// * `notes` - Pitch grid `(slots, 88)`
/// * `onsets` - Onset grid `(slots, 88)`
/// * `key_sequence` - Key index per slot; shorter sequences are extended with
///   their last key, longer ones truncated
/// * `weights` - Scale weights
///
/// # Returns
///
/// Biased `(notes, onsets)`; inputs are left untouched
///
/// # Errors
///
/// Returns `AnalysisError::InputShapeMismatch` if the grids differ in shape or
/// the key sequence is empty while the grid is not
pub fn apply_scale_bias(
    notes: &FrameArray,
    onsets: &FrameArray,
    key_sequence: &[usize],
    weights: &ScaleBiasConfig,
) -> Result<(FrameArray, FrameArray), AnalysisError> {
    if notes.shape() != onsets.shape() {
        return Err(AnalysisError::InputShapeMismatch(format!(
            "notes {:?} vs onsets {:?}",
            notes.shape(),
            onsets.shape()
        )));
    }
    let slots = notes.rows();
    if slots == 0 {
        return Ok((notes.clone(), onsets.clone()));
    }
    let Some(&last_key) = key_sequence.last() else {
        return Err(AnalysisError::InputShapeMismatch(
            "Empty key sequence for a non-empty grid".to_string(),
        ));
    };
    if key_sequence.len() != slots {
        log::debug!(
            "Aligning key sequence of {} to grid of {} slots",
            key_sequence.len(),
            slots
        );
    }

    // One mask per key actually used
    let mut masks: Vec<Option<Vec<f32>>> = vec![None; crate::analysis::result::N_KEYS];
    let mut biased_notes = notes.clone();
    let mut biased_onsets = onsets.clone();

    for t in 0..slots {
        let key_index = key_sequence.get(t).copied().unwrap_or(last_key);
        if key_index >= masks.len() {
            return Err(AnalysisError::InvalidInput(format!(
                "Key index out of range: {}",
                key_index
            )));
        }
        if masks[key_index].is_none() {
            masks[key_index] = Some(scale_mask(key_index, notes.cols(), MIDI_OFFSET, weights)?);
        }
        let Some(mask) = masks[key_index].as_deref() else {
            continue;
        };

        for (v, w) in biased_notes.row_mut(t).iter_mut().zip(mask) {
            *v *= w;
        }
        for (v, w) in biased_onsets.row_mut(t).iter_mut().zip(mask) {
            *v *= w;
        }
    }

    Ok((biased_notes, biased_onsets))
}
