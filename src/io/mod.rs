//! Audio I/O modules
//!
//! Stem discovery and decoding using Symphonia, and JSON export.

pub mod decoder;
pub mod export;
pub mod stems;

pub use decoder::decode_audio;
pub use export::{to_json_string, write_json};
pub use stems::{load_stems, LoadedStems, StemPaths};
