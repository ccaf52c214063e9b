//! Performance benchmarks for the transcription pipeline

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use solfege_dsp::array::FrameArray;
use solfege_dsp::config::MotifConfig;
use solfege_dsp::features::grid::{quantize_to_grid, Aggregation};
use solfege_dsp::features::motif::extract_motifs;
use solfege_dsp::preprocessing::spf::SpfCalibration;
use solfege_dsp::{transcribe, BeatTrack, KeySource, TranscriptionConfig, TranscriptionInput};

const SPF: f64 = 0.01;

/// 60 seconds of a looping eight-note phrase, one note per half second
fn synthetic_input() -> TranscriptionInput {
    let phrase = [60usize, 62, 64, 65, 67, 65, 64, 62];
    let frames = 6000;
    let mut onsets = FrameArray::zeros(frames, 88);
    let mut pitches = FrameArray::zeros(frames, 88);
    for f in 0..frames {
        let n = f / 50;
        let bin = phrase[n % phrase.len()] - 21;
        pitches.set(f, bin, 0.8);
        if f % 50 < 3 {
            onsets.set(f, bin, 0.9);
        }
    }

    let mut chroma_row = vec![0.05f32; 12];
    for pc in [0, 4, 7] {
        chroma_row[pc] = 1.0;
    }
    let chroma = FrameArray::from_rows(&vec![chroma_row; 1200]).unwrap_or_else(|_| FrameArray::zeros(0, 12));

    TranscriptionInput {
        onsets,
        pitches,
        spf: SpfCalibration::calibrated(SPF),
        beats: BeatTrack {
            tempo_bpm: Some(120.0),
            beat_times: (1..=120).map(|k| k as f64 * 0.5).collect(),
        },
        key_source: KeySource::Chroma {
            frames: chroma,
            spf: 0.05,
        },
    }
}

fn bench_transcribe(c: &mut Criterion) {
    let input = synthetic_input();
    let config = TranscriptionConfig::default();

    c.bench_function("transcribe_60s", |b| {
        b.iter(|| {
            let _ = transcribe(black_box(&input), black_box(&config));
        });
    });
}

fn bench_grid(c: &mut Criterion) {
    let input = synthetic_input();

    c.bench_function("quantize_center_weighted_60s", |b| {
        b.iter(|| {
            let _ = quantize_to_grid(
                black_box(&input.pitches),
                black_box(&input.beats.beat_times),
                SPF,
                4,
                Aggregation::CenterWeighted,
            );
        });
    });
}

fn bench_motifs(c: &mut Criterion) {
    let input = synthetic_input();
    let grid = quantize_to_grid(
        &input.pitches,
        &input.beats.beat_times,
        SPF,
        4,
        Aggregation::CenterWeighted,
    );
    let Ok(grid) = grid else {
        return;
    };
    let config = MotifConfig::default();

    c.bench_function("extract_motifs_480_slots", |b| {
        b.iter(|| {
            let _ = extract_motifs(black_box(&grid.values), black_box(&config));
        });
    });
}

criterion_group!(benches, bench_transcribe, bench_grid, bench_motifs);
criterion_main!(benches);
