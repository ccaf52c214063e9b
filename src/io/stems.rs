//! Separated stem discovery and loading
//!
//! The separation collaborator writes `vocals`, `drums`, `bass` and `other`
//! stems (`.mp3` or `.wav`) somewhere below an output directory, usually in
//! a folder named after the input track.

use super::decoder::decode_audio;
use crate::error::AnalysisError;
use crate::preprocessing::channel_mixer::{mix_tracks, truncate_to_shortest};
use std::fs;
use std::path::{Path, PathBuf};

/// Stem names in loading order
pub const STEM_NAMES: [&str; 4] = ["vocals", "drums", "bass", "other"];

/// Accepted stem file extensions, in preference order
const STEM_EXTENSIONS: [&str; 2] = ["mp3", "wav"];

/// Paths of the four separated stems
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StemPaths {
    /// Vocal stem
    pub vocals: PathBuf,
    /// Drum stem
    pub drums: PathBuf,
    /// Bass stem
    pub bass: PathBuf,
    /// Everything else
    pub other: PathBuf,
}

impl StemPaths {
    /// Search `root` recursively for the four stems
    ///
    /// When several candidates exist for a stem, one whose parent path
    /// contains `track_hint` wins; otherwise the first candidate found.
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::EmptySeparationOutput` naming the first stem
    /// with no candidate file
    pub fn locate(root: &Path, track_hint: Option<&str>) -> Result<Self, AnalysisError> {
        let mut files = Vec::new();
        collect_files(root, &mut files);
        files.sort();

        let find = |stem: &str| -> Result<PathBuf, AnalysisError> {
            let candidates: Vec<&PathBuf> = STEM_EXTENSIONS
                .iter()
                .flat_map(|ext| {
                    let name = format!("{}.{}", stem, ext);
                    files
                        .iter()
                        .filter(move |p| p.file_name().and_then(|n| n.to_str()) == Some(name.as_str()))
                })
                .collect();

            let preferred = track_hint.and_then(|hint| {
                candidates.iter().find(|p| {
                    p.parent()
                        .map(|parent| parent.to_string_lossy().contains(hint))
                        .unwrap_or(false)
                })
            });
            preferred
                .or(candidates.first())
                .map(|p| (*p).clone())
                .ok_or_else(|| {
                    AnalysisError::EmptySeparationOutput(format!(
                        "{} stem not found under {}",
                        stem,
                        root.display()
                    ))
                })
        };

        Ok(Self {
            vocals: find("vocals")?,
            drums: find("drums")?,
            bass: find("bass")?,
            other: find("other")?,
        })
    }
}

fn collect_files(dir: &Path, out: &mut Vec<PathBuf>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_files(&path, out);
        } else {
            out.push(path);
        }
    }
}

/// Decoded stems, truncated to a common length
#[derive(Debug, Clone)]
pub struct LoadedStems {
    /// Vocal track
    pub vocals: Vec<f32>,

    /// `bass + drums + other`
    pub instrumental: Vec<f32>,

    /// Sample rate shared by all stems
    pub sample_rate: u32,
}

/// Decode the four stems and build the instrumental mix
///
/// # Errors
///
/// Returns `AnalysisError::DecodingError` if a stem cannot be decoded and
/// `AnalysisError::InvalidInput` if the stems disagree on sample rate
pub fn load_stems(paths: &StemPaths) -> Result<LoadedStems, AnalysisError> {
    let (vocals, sample_rate) = decode_audio(&paths.vocals)?;
    let mut tracks = vec![vocals];
    for path in [&paths.drums, &paths.bass, &paths.other] {
        let (samples, sr) = decode_audio(path)?;
        if sr != sample_rate {
            return Err(AnalysisError::InvalidInput(format!(
                "Stem {} has sample rate {}, expected {}",
                path.display(),
                sr,
                sample_rate
            )));
        }
        tracks.push(samples);
    }

    let len = truncate_to_shortest(&mut tracks);
    let instrumental = mix_tracks(&[&tracks[1], &tracks[2], &tracks[3]]);
    log::debug!(
        "Loaded stems: {} samples at {} Hz ({:.2}s)",
        len,
        sample_rate,
        len as f64 / sample_rate as f64
    );

    let vocals = tracks.swap_remove(0);
    Ok(LoadedStems {
        vocals,
        instrumental,
        sample_rate,
    })
}
