//! Key estimation modules
//!
//! Track the musical key over the beat grid:
//! - Krumhansl-Schmuckler templates (24 keys)
//! - Key transition model
//! - HMM Viterbi decoding
//! - Key sequence estimation
//! - Scale-consistency reweighting

pub mod hmm;
pub mod scale;
pub mod sequence;
pub mod templates;
pub mod transitions;

pub use hmm::viterbi;
pub use scale::{apply_scale_bias, scale_mask};
pub use sequence::{estimate_key_sequence, estimate_key_sequence_from_chroma, KeySequence};
pub use templates::KeyTemplates;
pub use transitions::{build_transition_matrix, initial_distribution};
