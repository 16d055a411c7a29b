//! Transcript accumulation, deduplication, and log persistence

pub mod accumulator;
pub mod dedup;
pub mod log;

pub use accumulator::{Accumulator, TranscriptSegment};
pub use dedup::Deduplicator;
pub use log::write_session_log;
