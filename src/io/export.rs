//! JSON export of transcription results

use crate::analysis::result::TranscriptionResult;
use crate::error::AnalysisError;
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// The solfège artifact: global key, key per slot and labeled notes
#[derive(Debug, Serialize)]
struct SolfegeArtifact<'a> {
    estimated_global_key: &'a str,
    key_sequence: &'a [crate::analysis::result::KeySequenceEntry],
    note_count: usize,
    notes: &'a [crate::analysis::result::SolfegeNote],
}

impl<'a> From<&'a TranscriptionResult> for SolfegeArtifact<'a> {
    fn from(result: &'a TranscriptionResult) -> Self {
        Self {
            estimated_global_key: &result.estimated_global_key,
            key_sequence: &result.key_sequence,
            note_count: result.note_count,
            notes: &result.notes,
        }
    }
}

/// Pretty-printed solfège JSON; syllables stay UTF-8
pub fn to_json_string(result: &TranscriptionResult) -> Result<String, AnalysisError> {
    serde_json::to_string_pretty(&SolfegeArtifact::from(result))
        .map_err(|e| AnalysisError::ProcessingError(format!("JSON serialization failed: {}", e)))
}

/// Write the solfège JSON artifact to `path`
///
/// # Errors
///
/// Returns `AnalysisError::ProcessingError` if the file cannot be created or
/// serialization fails
pub fn write_json(result: &TranscriptionResult, path: &Path) -> Result<(), AnalysisError> {
    let file = File::create(path).map_err(|e| {
        AnalysisError::ProcessingError(format!("Cannot create {}: {}", path.display(), e))
    })?;
    serde_json::to_writer_pretty(BufWriter::new(file), &SolfegeArtifact::from(result))
        .map_err(|e| AnalysisError::ProcessingError(format!("JSON export failed: {}", e)))?;
    log::debug!("Wrote {} notes to {}", result.note_count, path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::metadata::TranscriptionMetadata;
    use crate::analysis::result::{Key, KeyEstimate, KeySequenceEntry, NoteEvent, SolfegeNote};

    fn sample_result() -> TranscriptionResult {
        let note = SolfegeNote {
            note: NoteEvent {
                start: 0.0,
                end: 0.5,
                pitch: 69,
                velocity: 50,
            },
            solfege: "ラ".to_string(),
            key: "A Minor".to_string(),
        };
        TranscriptionResult {
            estimated_global_key: "A Minor".to_string(),
            global_key: KeyEstimate::from(Key::Minor(9)),
            key_sequence: vec![KeySequenceEntry {
                grid_time: 0.0,
                key: "A Minor".to_string(),
            }],
            note_count: 1,
            notes: vec![note],
            metadata: TranscriptionMetadata::default(),
        }
    }

    #[test]
    fn test_json_field_names() {
        let json = to_json_string(&sample_result()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["estimated_global_key"], "A Minor");
        assert_eq!(value["note_count"], 1);
        assert_eq!(value["key_sequence"][0]["grid_time"], 0.0);
        assert_eq!(value["notes"][0]["pitch"], 69);
        assert_eq!(value["notes"][0]["solfege"], "ラ");
        assert!(value.get("metadata").is_none());
    }

    #[test]
    fn test_syllables_written_as_utf8() {
        let json = to_json_string(&sample_result()).unwrap();
        assert!(json.contains("ラ"));
        assert!(!json.contains("\\u"));
    }

    #[test]
    fn test_write_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("solfege.json");
        write_json(&sample_result(), &path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"note_count\": 1"));
    }
}
