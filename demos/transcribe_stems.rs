//! Example: Transcribe separated stems into solfège
//!
//! Usage:
//!   cargo run --release --example transcribe_stems -- [--track NAME] [--out PATH] <mix_audio> <stems_dir> <activations.json>
//!
//! Notes:
//! - `mix_audio` is the original full mix; the key is estimated from it after tuning correction.
//! - `stems_dir` is searched recursively for vocals/drums/bass/other (.mp3 or .wav).
//! - `activations.json` holds the transcription model and beat tracker output:
//!   `{"onsets": [[..88]], "notes": [[..88]], "last_note": {"start": 12.3, "pitch": 64},
//!     "tempo_bpm": 120.0, "beat_times": [..], "tuning_offset": 0.0}`

use serde::Deserialize;
use solfege_dsp::array::FrameArray;
use solfege_dsp::io::{decode_audio, load_stems, to_json_string, write_json, StemPaths};
use solfege_dsp::preprocessing::resample::correct_tuning;
use solfege_dsp::preprocessing::spf::{calibrate_spf, ReferenceNote, SpfCalibration};
use solfege_dsp::{transcribe, BeatTrack, KeySource, TranscriptionConfig, TranscriptionInput};
use std::env;
use std::path::{Path, PathBuf};

/// Model hop length in samples at 22.05 kHz
const MODEL_HOP: usize = 256;
const MODEL_SAMPLE_RATE: u32 = 22050;

#[derive(Deserialize)]
struct LastNote {
    start: f64,
    pitch: u8,
}

#[derive(Deserialize)]
struct Activations {
    onsets: Vec<Vec<f32>>,
    notes: Vec<Vec<f32>>,
    #[serde(default)]
    last_note: Option<LastNote>,
    #[serde(default)]
    tempo_bpm: Option<f32>,
    #[serde(default)]
    beat_times: Vec<f64>,
    #[serde(default)]
    tuning_offset: f64,
}

fn load_activations(path: &Path) -> Result<Activations, Box<dyn std::error::Error>> {
    let text = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut args: Vec<String> = env::args().skip(1).collect();
    let mut track: Option<String> = None;
    let mut out: Option<PathBuf> = None;
    let mut positional: Vec<String> = Vec::new();

    while let Some(a) = args.first().cloned() {
        args.remove(0);
        match a.as_str() {
            "--track" => {
                track = Some(args.first().ok_or("--track requires a value")?.clone());
                args.remove(0);
            }
            "--out" => {
                out = Some(PathBuf::from(args.first().ok_or("--out requires a value")?));
                args.remove(0);
            }
            "--help" | "-h" => {
                eprintln!(
                    "Usage: transcribe_stems [--track NAME] [--out PATH] <mix_audio> <stems_dir> <activations.json>\n\
                     \n\
                     --track NAME   Prefer stems under a directory containing NAME\n\
                     --out PATH     Write the JSON artifact to PATH instead of stdout\n"
                );
                return Ok(());
            }
            _ => positional.push(a),
        }
    }

    let [mix_path, stems_dir, activations_path] = positional.as_slice() else {
        eprintln!("ERROR: Provide the mix, a stems directory and an activations file. Use --help for usage.");
        std::process::exit(2);
    };

    let paths = StemPaths::locate(Path::new(stems_dir), track.as_deref())?;
    let stems = load_stems(&paths)?;
    eprintln!(
        "Stems: {} ({:.1}s at {} Hz)",
        paths.vocals.display(),
        stems.vocals.len() as f64 / stems.sample_rate as f64,
        stems.sample_rate
    );

    let activations = load_activations(Path::new(activations_path))?;
    let onsets = FrameArray::from_rows(&activations.onsets)?;
    let pitches = FrameArray::from_rows(&activations.notes)?;

    let theoretical = SpfCalibration::theoretical(MODEL_HOP, MODEL_SAMPLE_RATE)?;
    let reference = activations.last_note.map(|n| ReferenceNote {
        start: n.start,
        pitch: n.pitch,
    });
    let spf = calibrate_spf(&onsets, reference, theoretical);
    eprintln!("Seconds per frame: {:.6} ({:?})", spf.spf, spf.source);

    let (mix, mix_sample_rate) = decode_audio(Path::new(mix_path))?;
    let mix = correct_tuning(&mix, activations.tuning_offset)?;

    let input = TranscriptionInput {
        onsets,
        pitches,
        spf,
        beats: BeatTrack {
            tempo_bpm: activations.tempo_bpm,
            beat_times: activations.beat_times,
        },
        key_source: KeySource::Waveform {
            samples: mix,
            sample_rate: mix_sample_rate,
        },
    };

    let result = transcribe(&input, &TranscriptionConfig::default())?;
    eprintln!(
        "Key: {}  Notes: {}  Motifs: {}  time={:.2}ms",
        result.estimated_global_key,
        result.note_count,
        result.metadata.motif_count,
        result.metadata.processing_time_ms
    );

    match out {
        Some(path) => write_json(&result, &path)?,
        None => println!("{}", to_json_string(&result)?),
    }

    Ok(())
}
