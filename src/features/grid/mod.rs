//! Beat-grid quantization
//!
//! Resamples frame-indexed arrays onto a beat-subdivided time grid:
//! - Aggregation functions (mean, max, center-weighted)
//! - Real-time-aligned grid construction

pub mod aggregation;
pub mod quantize;

pub use aggregation::Aggregation;
pub use quantize::{quantize_to_grid, QuantizedGrid};
