//! Preprocessing modules
//!
//! Utilities for preparing model outputs and audio for the pipeline:
//! - Channel mixing (multi-channel to mono, stem mixing)
//! - Tuning correction by resampling
//! - Seconds-per-frame calibration

pub mod channel_mixer;
pub mod resample;
pub mod spf;
