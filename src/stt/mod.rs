//! Speech-to-text engine modules

pub mod engine;
pub mod transcriber;

pub use engine::WhisperEngine;
pub use transcriber::{MockTranscriber, Transcriber, TranscriptionResult};
