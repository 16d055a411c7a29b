//! Live Dictation Pipeline
//!
//! A Rust crate for continuous microphone dictation: audio is captured in
//! fixed-size frames, assembled into fixed-duration chunks, silence-gated,
//! peak-normalized, encoded as PCM WAV, transcribed by a Whisper engine, and
//! accumulated into a transcript that is persisted to a timestamped log file
//! at session end.
//!
//! # Architecture
//!
//! - `audio`: frame capture, chunk assembly, silence gating, normalization,
//!   and PCM container encoding
//! - `stt`: the transcription interface and its Whisper implementation
//! - `transcript`: deduplication, accumulation, and log persistence
//! - `pipeline`: the producer/consumer controller tying it all together
//! - `config`: configuration structures
//! - `error`: error types
//!
//! # Example
//!
//! ```no_run
//! use voxlog::{Config, FrameSource, Pipeline, WhisperEngine};
//!
//! let config = Config::default();
//! let engine = WhisperEngine::new(config.stt.clone()).unwrap();
//!
//! let audio = config.audio.clone();
//! let pipeline = Pipeline::new(config, &engine);
//! let summary = pipeline
//!     .run(move |running| FrameSource::open(&audio, running))
//!     .unwrap();
//! println!("{}", summary.transcript);
//! ```

pub mod audio;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod stt;
pub mod transcript;

// Re-exports for convenience
pub use audio::{
    decode_chunk, encode_chunk, list_input_devices, normalize, AudioChunk, AudioFrame,
    ChunkAssembler, EncodedChunk, FrameRead, FrameSource, SilenceGate, WavFileSource,
};
pub use config::{
    AudioConfig, ChunkingConfig, Config, SessionConfig, SttConfig, TimeoutPolicy,
};
pub use error::{AudioError, ConfigError, Result, SttEngineError, VoxlogError};
pub use pipeline::{Pipeline, SessionStats, SessionSummary};
pub use stt::{MockTranscriber, Transcriber, TranscriptionResult, WhisperEngine};
pub use transcript::{write_session_log, Accumulator, Deduplicator, TranscriptSegment};
