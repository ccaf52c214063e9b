//! Transcription result types

use super::metadata::TranscriptionMetadata;
use serde::{Deserialize, Serialize};

/// Pitch class names, sharps only
pub const KEY_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Number of key states (12 major + 12 minor)
pub const N_KEYS: usize = 24;

/// Key mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Major
    Major,
    /// Minor
    Minor,
}

/// Musical key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    /// Major key (0 = C, 1 = C#, ..., 11 = B)
    Major(u32),
    /// Minor key (0 = C, 1 = C#, ..., 11 = B)
    Minor(u32),
}

impl Key {
    /// Key for a composite index: 0–11 major, 12–23 minor
    ///
    /// # Example
    ///
    /// ```
    /// use solfege_dsp::analysis::result::Key;
    ///
    /// assert_eq!(Key::from_index(0), Some(Key::Major(0)));
    /// assert_eq!(Key::from_index(21), Some(Key::Minor(9)));
    /// assert_eq!(Key::from_index(24), None);
    /// ```
    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0..=11 => Some(Key::Major(index as u32)),
            12..=23 => Some(Key::Minor((index - 12) as u32)),
            _ => None,
        }
    }

    /// Composite index: 0–11 major, 12–23 minor
    pub fn index(&self) -> usize {
        match self {
            Key::Major(r) => (*r % 12) as usize,
            Key::Minor(r) => 12 + (*r % 12) as usize,
        }
    }

    /// Root pitch class (0–11)
    pub fn root(&self) -> u32 {
        match self {
            Key::Major(r) | Key::Minor(r) => *r % 12,
        }
    }

    /// Major or minor
    pub fn mode(&self) -> Mode {
        match self {
            Key::Major(_) => Mode::Major,
            Key::Minor(_) => Mode::Minor,
        }
    }

    /// Display label, e.g. "C Major", "A Minor"
    pub fn label(&self) -> String {
        let root = KEY_NAMES[self.root() as usize];
        match self {
            Key::Major(_) => format!("{} Major", root),
            Key::Minor(_) => format!("{} Minor", root),
        }
    }

    /// Relative key: C major <-> A minor
    pub fn relative(&self) -> Key {
        match self {
            Key::Major(r) => Key::Minor((r + 9) % 12),
            Key::Minor(r) => Key::Major((r + 3) % 12),
        }
    }

    /// Parallel key: C major <-> C minor
    pub fn parallel(&self) -> Key {
        match self {
            Key::Major(r) => Key::Minor(*r % 12),
            Key::Minor(r) => Key::Major(*r % 12),
        }
    }

    /// Dominant key, same mode (a fifth up)
    pub fn dominant(&self) -> Key {
        self.transpose(7)
    }

    /// Subdominant key, same mode (a fourth up)
    pub fn subdominant(&self) -> Key {
        self.transpose(5)
    }

    fn transpose(&self, semitones: u32) -> Key {
        match self {
            Key::Major(r) => Key::Major((r + semitones) % 12),
            Key::Minor(r) => Key::Minor((r + semitones) % 12),
        }
    }

    /// Tonic used for movable-do labels.
    ///
    /// Minor keys are sung relative to their relative major, so A minor
    /// labels its tonic "ラ" and shares C major's "ド".
    ///
    /// ```
    /// use solfege_dsp::analysis::result::Key;
    ///
    /// assert_eq!(Key::Minor(9).solfege_root(), 0);
    /// assert_eq!(Key::Major(0).solfege_root(), 0);
    /// ```
    pub fn solfege_root(&self) -> u32 {
        match self {
            Key::Major(r) => *r % 12,
            Key::Minor(r) => (*r + 3) % 12,
        }
    }
}

/// Key estimate as reported to callers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEstimate {
    /// Root pitch class (0–11)
    pub root_pc: u32,

    /// Major or minor
    pub mode: Mode,

    /// Composite index (0–23)
    pub key_index: usize,

    /// Display label, e.g. "C Major"
    pub label: String,
}

impl KeyEstimate {
    /// The estimated key
    pub fn key(&self) -> Key {
        match self.mode {
            Mode::Major => Key::Major(self.root_pc),
            Mode::Minor => Key::Minor(self.root_pc),
        }
    }
}

impl From<Key> for KeyEstimate {
    fn from(key: Key) -> Self {
        Self {
            root_pc: key.root(),
            mode: key.mode(),
            key_index: key.index(),
            label: key.label(),
        }
    }
}

/// Monophonic note produced by note assignment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NoteEvent {
    /// Start time in seconds
    pub start: f64,

    /// End time in seconds
    pub end: f64,

    /// MIDI note number
    pub pitch: u8,

    /// MIDI velocity
    pub velocity: u8,
}

/// Note with its movable-do syllable and active key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolfegeNote {
    /// The underlying note
    #[serde(flatten)]
    pub note: NoteEvent,

    /// Movable-do syllable, e.g. "ド"
    pub solfege: String,

    /// Label of the key active at the note onset
    pub key: String,
}

/// One grid slot of the key sequence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeySequenceEntry {
    /// Slot start time in seconds
    pub grid_time: f64,

    /// Key label
    pub key: String,
}

/// Complete transcription result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptionResult {
    /// Label of the global key
    pub estimated_global_key: String,

    /// Global key estimate
    pub global_key: KeyEstimate,

    /// Key per grid slot
    pub key_sequence: Vec<KeySequenceEntry>,

    /// Number of notes
    pub note_count: usize,

    /// Labeled notes ordered by (start, pitch)
    pub notes: Vec<SolfegeNote>,

    /// Processing metadata
    pub metadata: TranscriptionMetadata,
}
