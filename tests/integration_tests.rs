//! Integration tests for the transcription pipeline

use solfege_dsp::array::FrameArray;
use solfege_dsp::io::{decode_audio, load_stems, to_json_string, StemPaths};
use solfege_dsp::preprocessing::resample::correct_tuning;
use solfege_dsp::preprocessing::spf::{SpfCalibration, SpfSource};
use solfege_dsp::{
    transcribe, AnalysisError, BeatTrack, KeySource, TranscriptionConfig, TranscriptionInput,
};
use std::path::Path;

/// Seconds per activation frame used by the synthetic fixtures
const SPF: f64 = 0.01;

/// One C major scale, one note per beat
const SCALE: [u8; 8] = [60, 62, 64, 65, 67, 69, 71, 72];

/// Frame-rate activations for `melody` at 120 BPM (50 frames per note)
fn melody_activations(melody: &[u8]) -> (FrameArray, FrameArray) {
    let frames_per_note = 50;
    let total = melody.len() * frames_per_note;
    let mut onsets = FrameArray::zeros(total, 88);
    let mut pitches = FrameArray::zeros(total, 88);

    for (n, &pitch) in melody.iter().enumerate() {
        let bin = pitch as usize - 21;
        for f in 0..frames_per_note {
            let frame = n * frames_per_note + f;
            pitches.set(frame, bin, 0.8);
            pitches.set(frame, bin + 1, 0.1);
            if f < 3 {
                onsets.set(frame, bin, 0.9);
            }
        }
    }
    (onsets, pitches)
}

/// Constant C major triad chroma covering `seconds`
fn c_major_chroma(seconds: f64) -> KeySource {
    let spf = 0.05;
    let frames = (seconds / spf).round() as usize;
    let mut row = vec![0.05f32; 12];
    for pc in [0, 4, 7] {
        row[pc] = 1.0;
    }
    KeySource::Chroma {
        frames: FrameArray::from_rows(&vec![row; frames]).unwrap(),
        spf,
    }
}

fn synthetic_input(melody: &[u8], beat_times: Vec<f64>) -> TranscriptionInput {
    let (onsets, pitches) = melody_activations(melody);
    let seconds = pitches.rows() as f64 * SPF;
    TranscriptionInput {
        onsets,
        pitches,
        spf: SpfCalibration::calibrated(SPF),
        beats: BeatTrack {
            tempo_bpm: Some(120.0),
            beat_times,
        },
        key_source: c_major_chroma(seconds),
    }
}

fn beats_every_half_second(count: usize) -> Vec<f64> {
    (1..=count).map(|k| k as f64 * 0.5).collect()
}

/// Write a mono 16-bit WAV with a constant sample value
fn write_wav(path: &Path, value: f32, samples: usize, sample_rate: u32) {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec).unwrap();
    for _ in 0..samples {
        writer.write_sample((value * 32767.0) as i16).unwrap();
    }
    writer.finalize().unwrap();
}

#[test]
fn test_repeated_scale_transcription() {
    let melody: Vec<u8> = SCALE.iter().chain(SCALE.iter()).copied().collect();
    let input = synthetic_input(&melody, beats_every_half_second(16));
    let result = transcribe(&input, &TranscriptionConfig::default()).unwrap();

    assert_eq!(result.estimated_global_key, "C Major");
    assert_eq!(result.metadata.grid_slots, 64);
    assert_eq!(result.key_sequence.len(), 64);
    assert!(result.key_sequence.iter().all(|e| e.key == "C Major"));

    assert_eq!(result.note_count, 16);
    let pitches: Vec<u8> = result.notes.iter().map(|n| n.note.pitch).collect();
    assert_eq!(pitches, melody);

    let syllables: Vec<&str> = result.notes.iter().take(8).map(|n| n.solfege.as_str()).collect();
    assert_eq!(syllables, vec!["ド", "レ", "ミ", "ファ", "ソ", "ラ", "シ", "ド"]);

    for (i, note) in result.notes.iter().enumerate() {
        assert!((note.note.start - i as f64 * 0.5).abs() < 1e-9);
        assert!(note.note.end > note.note.start);
        assert_eq!(note.note.velocity, 50);
    }
    for pair in result.notes.windows(2) {
        assert!(pair[0].note.end <= pair[1].note.start + 1e-9);
    }

    assert_eq!(result.metadata.spf_source, SpfSource::Calibrated);
    assert!(result.metadata.processing_time_ms >= 0.0);
}

#[test]
fn test_beats_past_end_are_not_counted() {
    let input = synthetic_input(&SCALE, beats_every_half_second(12));
    let result = transcribe(&input, &TranscriptionConfig::default()).unwrap();

    // 4 seconds of activations: beats at 4.5s and later are dropped
    assert_eq!(result.metadata.beat_count, 8);
    assert_eq!(result.metadata.grid_slots, 32);
    assert_eq!(result.note_count, 8);
}

#[test]
fn test_missing_tempo_is_fatal() {
    let mut input = synthetic_input(&SCALE, beats_every_half_second(8));
    input.beats.tempo_bpm = None;
    assert!(matches!(
        transcribe(&input, &TranscriptionConfig::default()),
        Err(AnalysisError::TempoDetectionFailure(_))
    ));
}

#[test]
fn test_zero_beats_degrades_to_single_grid() {
    let input = synthetic_input(&SCALE, vec![]);
    let result = transcribe(&input, &TranscriptionConfig::default()).unwrap();

    assert_eq!(result.metadata.grid_slots, 4);
    assert_eq!(result.metadata.beat_count, 0);
    assert_eq!(result.metadata.motif_count, 0);
    assert!(!result.metadata.warnings.is_empty());
    assert!(result.note_count >= 1);
}

#[test]
fn test_activation_shape_mismatch() {
    let mut input = synthetic_input(&SCALE, beats_every_half_second(8));
    input.onsets = FrameArray::zeros(10, 88);
    assert!(matches!(
        transcribe(&input, &TranscriptionConfig::default()),
        Err(AnalysisError::InputShapeMismatch(_))
    ));
}

#[test]
fn test_uncalibrated_spf_is_flagged() {
    let mut input = synthetic_input(&SCALE, beats_every_half_second(8));
    input.spf = SpfCalibration {
        spf: SPF,
        source: SpfSource::Theoretical,
    };
    let result = transcribe(&input, &TranscriptionConfig::default()).unwrap();
    assert_eq!(result.metadata.spf_source, SpfSource::Theoretical);
    assert!(result
        .metadata
        .warnings
        .iter()
        .any(|w| w.contains("Seconds per frame")));
}

#[test]
fn test_waveform_key_source() {
    let sample_rate = 22050u32;
    let seconds = 4.0;
    let instrumental: Vec<f32> = (0..(seconds * sample_rate as f64) as usize)
        .map(|i| {
            let t = i as f32 / sample_rate as f32;
            [261.63f32, 329.63, 392.0]
                .iter()
                .map(|f| (2.0 * std::f32::consts::PI * f * t).sin())
                .sum::<f32>()
                / 3.0
        })
        .collect();

    let mut input = synthetic_input(&SCALE, beats_every_half_second(8));
    input.key_source = KeySource::Waveform {
        samples: instrumental,
        sample_rate,
    };
    let result = transcribe(&input, &TranscriptionConfig::default()).unwrap();
    assert_eq!(result.estimated_global_key, "C Major");
    assert_eq!(result.notes[0].solfege, "ド");
}

#[test]
fn test_key_from_decoded_mix() {
    let sample_rate = 22050u32;
    let dir = tempfile::tempdir().unwrap();
    let mix_path = dir.path().join("mix.wav");

    let spec = hound::WavSpec {
        channels: 2,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(&mix_path, spec).unwrap();
    for i in 0..(4 * sample_rate as usize) {
        let t = i as f32 / sample_rate as f32;
        let v: f32 = [261.63f32, 329.63, 392.0]
            .iter()
            .map(|f| (2.0 * std::f32::consts::PI * f * t).sin())
            .sum::<f32>()
            / 4.0;
        let s = (v * 32767.0) as i16;
        writer.write_sample(s).unwrap();
        writer.write_sample(s).unwrap();
    }
    writer.finalize().unwrap();

    let (mix, decoded_rate) = decode_audio(&mix_path).unwrap();
    assert_eq!(decoded_rate, sample_rate);
    let mix = correct_tuning(&mix, 0.0).unwrap();

    let mut input = synthetic_input(&SCALE, beats_every_half_second(8));
    input.key_source = KeySource::Waveform {
        samples: mix,
        sample_rate: decoded_rate,
    };
    let result = transcribe(&input, &TranscriptionConfig::default()).unwrap();
    assert_eq!(result.estimated_global_key, "C Major");
    assert_eq!(result.notes[4].solfege, "ソ");
}

#[test]
fn test_json_artifact() {
    let input = synthetic_input(&SCALE, beats_every_half_second(8));
    let result = transcribe(&input, &TranscriptionConfig::default()).unwrap();
    let json = to_json_string(&result).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["estimated_global_key"], "C Major");
    assert_eq!(value["note_count"], 8);
    assert_eq!(value["notes"].as_array().unwrap().len(), 8);
    assert_eq!(value["notes"][2]["solfege"], "ミ");
    assert!(value["key_sequence"][0]["grid_time"].is_number());
    assert!(json.contains("ファ"));
}

#[test]
fn test_load_stems_from_wav() {
    let dir = tempfile::tempdir().unwrap();
    let track_dir = dir.path().join("htdemucs").join("song");
    std::fs::create_dir_all(&track_dir).unwrap();
    write_wav(&track_dir.join("vocals.wav"), 0.5, 1000, 22050);
    write_wav(&track_dir.join("drums.wav"), 0.1, 900, 22050);
    write_wav(&track_dir.join("bass.wav"), 0.1, 1100, 22050);
    write_wav(&track_dir.join("other.wav"), 0.1, 1000, 22050);

    let paths = StemPaths::locate(dir.path(), Some("song")).unwrap();
    let stems = load_stems(&paths).unwrap();

    assert_eq!(stems.sample_rate, 22050);
    assert_eq!(stems.vocals.len(), 900);
    assert_eq!(stems.instrumental.len(), 900);
    assert!(stems.vocals.iter().all(|&v| (v - 0.5).abs() < 1e-3));
    assert!(stems.instrumental.iter().all(|&v| (v - 0.3).abs() < 1e-3));
}

#[test]
fn test_missing_stem_surfaces_error() {
    let dir = tempfile::tempdir().unwrap();
    for stem in ["vocals", "drums", "bass"] {
        write_wav(&dir.path().join(format!("{}.wav", stem)), 0.0, 10, 22050);
    }
    let err = StemPaths::locate(dir.path(), None).unwrap_err();
    assert!(matches!(err, AnalysisError::EmptySeparationOutput(_)));
    assert!(err.is_fatal());
}
