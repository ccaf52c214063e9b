//! Short-time Fourier transform magnitudes
//!
//! Frames are centered: the signal is zero-padded by `n_fft / 2` on both sides,
//! so frame `t` is centered on sample `t * hop_length`.

use crate::array::FrameArray;
use crate::error::AnalysisError;
use rustfft::num_complex::Complex;
use rustfft::FftPlanner;

/// Periodic Hann window of length `n`
pub fn hann_window(n: usize) -> Vec<f32> {
    (0..n)
        .map(|i| 0.5 - 0.5 * (2.0 * std::f32::consts::PI * i as f32 / n as f32).cos())
        .collect()
}

/// Compute the magnitude spectrogram
///
/// # Arguments
///
/// * `samples` - Mono audio samples
/// * `n_fft` - FFT size
/// * `hop_length` - Hop between frames in samples
///
/// # Returns
///
/// Magnitudes `(frames, n_fft / 2 + 1)` with `frames = 1 + len / hop_length`
///
/// # Errors
///
/// Returns `AnalysisError::InvalidInput` for empty input or zero sizes
pub fn magnitude_spectrogram(
    samples: &[f32],
    n_fft: usize,
    hop_length: usize,
) -> Result<FrameArray, AnalysisError> {
    if samples.is_empty() {
        return Err(AnalysisError::InvalidInput(
            "Empty audio samples".to_string(),
        ));
    }
    if n_fft < 2 || hop_length == 0 {
        return Err(AnalysisError::InvalidInput(format!(
            "Invalid STFT parameters: n_fft={}, hop_length={}",
            n_fft, hop_length
        )));
    }

    let n_bins = n_fft / 2 + 1;
    let n_frames = 1 + samples.len() / hop_length;
    let pad = (n_fft / 2) as i64;
    let window = hann_window(n_fft);

    log::debug!(
        "Computing STFT: {} samples, n_fft={}, hop={}, {} frames",
        samples.len(),
        n_fft,
        hop_length,
        n_frames
    );

    let mut planner = FftPlanner::<f32>::new();
    let fft = planner.plan_fft_forward(n_fft);
    let mut buffer = vec![Complex::new(0.0f32, 0.0); n_fft];
    let mut magnitudes = FrameArray::zeros(n_frames, n_bins);

    for t in 0..n_frames {
        let origin = (t * hop_length) as i64 - pad;
        for (i, slot) in buffer.iter_mut().enumerate() {
            let idx = origin + i as i64;
            let x = if idx >= 0 && (idx as usize) < samples.len() {
                samples[idx as usize]
            } else {
                0.0
            };
            *slot = Complex::new(x * window[i], 0.0);
        }
        fft.process(&mut buffer);

        let row = magnitudes.row_mut(t);
        for (k, out) in row.iter_mut().enumerate() {
            *out = buffer[k].norm();
        }
    }

    Ok(magnitudes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_count_and_bins() {
        let samples = vec![0.0f32; 1000];
        let spec = magnitude_spectrogram(&samples, 256, 100).unwrap();
        assert_eq!(spec.shape(), (11, 129));
    }

    #[test]
    fn test_sine_peaks_at_its_bin() {
        let sr = 8000.0;
        let n_fft = 512;
        // bin 32 -> 32 * 8000 / 512 = 500 Hz
        let samples: Vec<f32> = (0..4000)
            .map(|i| (2.0 * std::f32::consts::PI * 500.0 * i as f32 / sr).sin())
            .collect();
        let spec = magnitude_spectrogram(&samples, n_fft, 128).unwrap();
        let mid = spec.row(spec.rows() / 2);
        let (peak, _) = crate::array::argmax(mid).unwrap();
        assert_eq!(peak, 32);
    }

    #[test]
    fn test_empty_input_rejected() {
        assert!(magnitude_spectrogram(&[], 512, 128).is_err());
    }
}
