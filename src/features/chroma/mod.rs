//! Chroma extraction modules
//!
//! Extract pitch-class distribution (12 semitones) from audio:
//! - STFT magnitudes
//! - Harmonic-percussive separation
//! - Chroma vector computation
//! - Normalization strategies
//! - Temporal smoothing

pub mod extractor;
pub mod hpss;
pub mod normalization;
pub mod smoothing;
pub mod stft;

pub use extractor::extract_chroma;
pub use hpss::hpss_decompose;
pub use normalization::center_and_normalize;
pub use smoothing::smooth_chroma;
