//! Movable-do solfège labeling
//!
//! Each note is labeled relative to the key active at its onset. Minor keys
//! are sung from their relative major, so the tonic of A minor is "ラ".

use super::result::{Key, KeySequenceEntry, NoteEvent, SolfegeNote};

/// Movable-do syllables by semitone above the solfège root
pub const MOVABLE_DO: [&str; 12] = [
    "ド", "ド#", "レ", "レ#", "ミ", "ファ", "ファ#", "ソ", "ソ#", "ラ", "ラ#", "シ",
];

/// Syllable of a MIDI pitch relative to a root pitch class
///
/// ```
/// use solfege_dsp::analysis::solfege::pitch_to_movable_do;
///
/// assert_eq!(pitch_to_movable_do(60, 0), "ド");
/// assert_eq!(pitch_to_movable_do(64, 0), "ミ");
/// assert_eq!(pitch_to_movable_do(69, 0), "ラ");
/// ```
pub fn pitch_to_movable_do(pitch: u8, root_pc: u32) -> &'static str {
    let interval = (pitch as u32 % 12 + 12 - root_pc % 12) % 12;
    MOVABLE_DO[interval as usize]
}

/// Display label for a composite key index, e.g. 21 -> "A Minor"
pub fn key_index_to_label(index: usize) -> String {
    Key::from_index(index)
        .map(|k| k.label())
        .unwrap_or_else(|| format!("Unknown key {}", index))
}

/// Grid slot containing `time`: the last slot whose start is `<= time`
fn slot_at(grid_times: &[f64], time: f64) -> usize {
    grid_times
        .partition_point(|&t| t <= time)
        .saturating_sub(1)
}

/// Attach a syllable and key label to every note
///
/// # Arguments
///
/// * `notes` - Note events (any order)
/// * `key_sequence` - Key index per grid slot
/// * `grid_times` - Start time of each grid slot
///
/// # Returns
///
/// Labeled notes ordered by `(start, pitch)`. Notes before the first slot use
/// the first slot; notes at or after the last slot use the last one. With an
/// empty key sequence every note is labeled in C major.
pub fn attach_solfege(
    notes: &[NoteEvent],
    key_sequence: &[usize],
    grid_times: &[f64],
) -> Vec<SolfegeNote> {
    let mut ordered = notes.to_vec();
    ordered.sort_by(|a, b| {
        a.start
            .partial_cmp(&b.start)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.pitch.cmp(&b.pitch))
    });

    let last_slot = key_sequence.len().min(grid_times.len()).saturating_sub(1);
    ordered
        .into_iter()
        .map(|note| {
            let slot = slot_at(grid_times, note.start).min(last_slot);
            let key = key_sequence
                .get(slot)
                .and_then(|&k| Key::from_index(k))
                .unwrap_or(Key::Major(0));
            SolfegeNote {
                note,
                solfege: pitch_to_movable_do(note.pitch, key.solfege_root()).to_string(),
                key: key.label(),
            }
        })
        .collect()
}

/// One `(grid_time, key label)` entry per slot present in both inputs
pub fn key_sequence_entries(key_sequence: &[usize], grid_times: &[f64]) -> Vec<KeySequenceEntry> {
    grid_times
        .iter()
        .zip(key_sequence)
        .map(|(&grid_time, &k)| KeySequenceEntry {
            grid_time,
            key: key_index_to_label(k),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(start: f64, pitch: u8) -> NoteEvent {
        NoteEvent {
            start,
            end: start + 0.25,
            pitch,
            velocity: 50,
        }
    }

    #[test]
    fn test_movable_do_table() {
        assert_eq!(pitch_to_movable_do(60, 0), "ド");
        assert_eq!(pitch_to_movable_do(64, 0), "ミ");
        assert_eq!(pitch_to_movable_do(67, 7), "ド");
        assert_eq!(pitch_to_movable_do(61, 2), "シ");
        for pitch in 0..=127u8 {
            let syllable = pitch_to_movable_do(pitch, 5);
            assert!(MOVABLE_DO.contains(&syllable));
        }
    }

    #[test]
    fn test_key_labels() {
        assert_eq!(key_index_to_label(0), "C Major");
        assert_eq!(key_index_to_label(21), "A Minor");
        assert_eq!(key_index_to_label(13), "C# Minor");
    }

    #[test]
    fn test_minor_key_uses_relative_major() {
        let labeled = attach_solfege(&[note(0.0, 69), note(0.5, 60)], &[21], &[0.0]);
        assert_eq!(labeled[0].solfege, "ラ");
        assert_eq!(labeled[0].key, "A Minor");
        assert_eq!(labeled[1].solfege, "ド");
    }

    #[test]
    fn test_key_follows_note_onset() {
        let grid_times = [0.0, 1.0, 2.0, 3.0];
        let keys = [0, 0, 7, 7];
        let labeled = attach_solfege(
            &[note(2.5, 67), note(0.2, 67), note(1.0, 67), note(9.0, 67)],
            &keys,
            &grid_times,
        );

        let summary: Vec<(f64, &str, &str)> = labeled
            .iter()
            .map(|n| (n.note.start, n.solfege.as_str(), n.key.as_str()))
            .collect();
        assert_eq!(
            summary,
            vec![
                (0.2, "ソ", "C Major"),
                (1.0, "ソ", "C Major"),
                (2.5, "ド", "G Major"),
                (9.0, "ド", "G Major"),
            ]
        );
    }

    #[test]
    fn test_ordering_by_start_then_pitch() {
        let labeled = attach_solfege(&[note(1.0, 64), note(1.0, 60), note(0.5, 70)], &[0], &[0.0]);
        let order: Vec<u8> = labeled.iter().map(|n| n.note.pitch).collect();
        assert_eq!(order, vec![70, 60, 64]);
    }

    #[test]
    fn test_note_before_first_slot() {
        let labeled = attach_solfege(&[note(0.1, 62)], &[2, 0], &[0.5, 1.0]);
        assert_eq!(labeled[0].key, "D Major");
        assert_eq!(labeled[0].solfege, "ド");
    }

    #[test]
    fn test_key_sequence_entries() {
        let entries = key_sequence_entries(&[0, 21, 21], &[0.0, 0.5]);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].key, "A Minor");
        assert_eq!(entries[1].grid_time, 0.5);
    }
}
