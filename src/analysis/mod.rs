//! Analysis and result aggregation modules
//!
//! Turns note events and the key sequence into the final transcription:
//! - Movable-do solfège labeling
//! - Result types
//! - Metadata

pub mod metadata;
pub mod result;
pub mod solfege;
