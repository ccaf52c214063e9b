//! Feature extraction modules
//!
//! This module contains all grid-level algorithms:
//! - Smoothing filters
//! - Beat-grid quantization
//! - Chroma extraction
//! - Key tracking and scale bias
//! - Motif detection and correction
//! - Note assignment

pub mod chroma;
pub mod filters;
pub mod grid;
pub mod key;
pub mod motif;
pub mod notes;
