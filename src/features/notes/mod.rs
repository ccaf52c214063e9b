//! Note segmentation
//!
//! Turns corrected grid activations into discrete monophonic notes.

pub mod assignment;

pub use assignment::{assign_notes, NoteAssignment};
