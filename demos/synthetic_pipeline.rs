//! Example: Run the full pipeline on synthetic activations
//!
//! Usage:
//!   cargo run --release --example synthetic_pipeline -- [--json]
//!
//! Builds model-like activations for a short melody sung twice over a C major
//! accompaniment, then prints the labeled notes.

use solfege_dsp::array::FrameArray;
use solfege_dsp::io::to_json_string;
use solfege_dsp::preprocessing::spf::SpfCalibration;
use solfege_dsp::{transcribe, BeatTrack, KeySource, TranscriptionConfig, TranscriptionInput};
use std::env;

const SAMPLE_RATE: u32 = 22050;
const HOP: usize = 256;
const PHRASE: [u8; 8] = [67, 64, 64, 65, 62, 62, 60, 64];

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let json = env::args().any(|a| a == "--json");

    let cal = SpfCalibration::theoretical(HOP, SAMPLE_RATE)?;
    let beat_seconds = 0.5;
    let frames_per_beat = (beat_seconds / cal.spf).round() as usize;

    let melody: Vec<u8> = PHRASE.iter().chain(PHRASE.iter()).copied().collect();
    let total_frames = melody.len() * frames_per_beat;
    let mut onsets = FrameArray::zeros(total_frames, 88);
    let mut pitches = FrameArray::zeros(total_frames, 88);
    for (n, &pitch) in melody.iter().enumerate() {
        let bin = (pitch - 21) as usize;
        for f in 0..frames_per_beat {
            let frame = n * frames_per_beat + f;
            pitches.set(frame, bin, 0.7);
            // A little chromatic leakage for the scale bias to clean up
            pitches.set(frame, bin + 1, 0.35);
            if f < 2 {
                onsets.set(frame, bin, 0.8);
            }
        }
    }

    let duration = total_frames as f64 * cal.spf;
    let accompaniment: Vec<f32> = (0..(duration * SAMPLE_RATE as f64) as usize)
        .map(|i| {
            let t = i as f32 / SAMPLE_RATE as f32;
            [130.81f32, 164.81, 196.0]
                .iter()
                .map(|f| (2.0 * std::f32::consts::PI * f * t).sin() * 0.3)
                .sum()
        })
        .collect();

    let beat_times: Vec<f64> = (1..=melody.len())
        .map(|k| k as f64 * beat_seconds)
        .filter(|&t| t <= duration)
        .collect();

    let input = TranscriptionInput {
        onsets,
        pitches,
        spf: cal,
        beats: BeatTrack {
            tempo_bpm: Some(120.0),
            beat_times,
        },
        key_source: KeySource::Waveform {
            samples: accompaniment,
            sample_rate: SAMPLE_RATE,
        },
    };

    let result = transcribe(&input, &TranscriptionConfig::default())?;

    if json {
        println!("{}", to_json_string(&result)?);
        return Ok(());
    }

    println!("Transcription Results:");
    println!("  Key: {}", result.estimated_global_key);
    println!("  Grid slots: {}", result.metadata.grid_slots);
    println!("  Motifs: {}", result.metadata.motif_count);
    println!("  Notes: {}", result.note_count);
    for note in &result.notes {
        println!(
            "    {:6.3}s - {:6.3}s  MIDI {:3}  {}",
            note.note.start, note.note.end, note.note.pitch, note.solfege
        );
    }
    for warning in &result.metadata.warnings {
        println!("  Warning: {}", warning);
    }
    println!("  Processing time: {:.2} ms", result.metadata.processing_time_ms);

    Ok(())
}
