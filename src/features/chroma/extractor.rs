//! Chroma vector extraction
//!
//! Converts a (harmonic) magnitude spectrogram to 12-element chroma vectors.
//! Each FFT bin inside the configured octave range is assigned to its nearest
//! semitone and contributes its energy (`mag²`) to that pitch class.

use super::hpss::hpss_decompose;
use super::stft::magnitude_spectrogram;
use crate::array::FrameArray;
use crate::config::ChromaConfig;
use crate::error::AnalysisError;

/// Extract chroma vectors from audio samples
///
/// Percussive energy is suppressed with HPSS before the chroma projection.
///
/// # Arguments
///
/// * `samples` - Mono audio samples
/// * `sample_rate` - Sample rate in Hz
/// * `config` - STFT / HPSS / chroma parameters
///
/// # Returns
///
/// Chroma array `(frames, 12)`, each frame max-normalized; frame `t` is
/// centered at `t * hop_length / sample_rate` seconds
pub fn extract_chroma(
    samples: &[f32],
    sample_rate: u32,
    config: &ChromaConfig,
) -> Result<FrameArray, AnalysisError> {
    log::debug!("Extracting chroma: {} samples at {} Hz", samples.len(), sample_rate);

    if sample_rate == 0 {
        return Err(AnalysisError::InvalidInput(
            "Invalid sample rate".to_string(),
        ));
    }

    let spectrogram = magnitude_spectrogram(samples, config.n_fft, config.hop_length)?;
    let (harmonic, _percussive) =
        hpss_decompose(&spectrogram, config.hpss_kernel, config.hpss_margin)?;

    Ok(spectrogram_to_chroma(&harmonic, sample_rate, config))
}

/// Project a magnitude spectrogram `(frames, n_fft/2 + 1)` onto 12 pitch classes.
pub fn spectrogram_to_chroma(
    magnitudes: &FrameArray,
    sample_rate: u32,
    config: &ChromaConfig,
) -> FrameArray {
    let bin_pc = bin_pitch_classes(magnitudes.cols(), sample_rate, config);
    let mut chroma = FrameArray::zeros(magnitudes.rows(), 12);

    for t in 0..magnitudes.rows() {
        let row = magnitudes.row(t);
        let out = chroma.row_mut(t);
        for (mag, pc) in row.iter().zip(bin_pc.iter()) {
            if let Some(pc) = pc {
                out[*pc] += mag * mag;
            }
        }
        let peak = out.iter().copied().fold(0.0f32, f32::max);
        if peak > 0.0 {
            out.iter_mut().for_each(|v| *v /= peak);
        }
    }

    chroma
}

/// Pitch class of each FFT bin, `None` outside the octave range.
fn bin_pitch_classes(n_bins: usize, sample_rate: u32, config: &ChromaConfig) -> Vec<Option<usize>> {
    let n_fft = (n_bins.saturating_sub(1) * 2).max(1);
    let lo = config.fmin_midi - 0.5;
    let hi = config.fmin_midi + 12.0 * config.n_octaves as f32 - 0.5;

    (0..n_bins)
        .map(|k| {
            if k == 0 {
                return None;
            }
            let freq = k as f32 * sample_rate as f32 / n_fft as f32;
            let midi = 69.0 + 12.0 * (freq / 440.0).log2();
            if midi < lo || midi >= hi {
                None
            } else {
                Some((midi.round() as i64).rem_euclid(12) as usize)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tone(freqs: &[f32], sr: u32, seconds: f32) -> Vec<f32> {
        let n = (sr as f32 * seconds) as usize;
        (0..n)
            .map(|i| {
                freqs
                    .iter()
                    .map(|f| (2.0 * std::f32::consts::PI * f * i as f32 / sr as f32).sin())
                    .sum::<f32>()
                    / freqs.len() as f32
            })
            .collect()
    }

    #[test]
    fn test_a440_maps_to_pitch_class_a() {
        let config = ChromaConfig::default();
        let samples = tone(&[440.0], 22050, 1.0);
        let chroma = extract_chroma(&samples, 22050, &config).unwrap();
        assert_eq!(chroma.cols(), 12);
        let mid = chroma.row(chroma.rows() / 2);
        let (pc, value) = crate::array::argmax(mid).unwrap();
        assert_eq!(pc, 9);
        assert!((value - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_c_major_triad() {
        let config = ChromaConfig::default();
        let samples = tone(&[261.63, 329.63, 392.0], 22050, 1.0);
        let chroma = extract_chroma(&samples, 22050, &config).unwrap();
        let mid = chroma.row(chroma.rows() / 2);
        for pc in [0, 4, 7] {
            assert!(mid[pc] > 0.3, "pitch class {} too weak: {:?}", pc, mid);
        }
        assert!(mid[1] < 0.2 && mid[6] < 0.2);
    }

    #[test]
    fn test_silence_is_zero() {
        let config = ChromaConfig::default();
        let chroma = extract_chroma(&vec![0.0; 4096], 22050, &config).unwrap();
        assert!(chroma.as_slice().iter().all(|&v| v == 0.0));
    }
}
