//! The capture-to-transcript pipeline
//!
//! Exactly two units of execution: a producer thread that owns the frame
//! source and assembles chunks, and the consumer loop that gates, normalizes,
//! encodes, transcribes, deduplicates, and accumulates. The bounded chunk
//! queue between them is the only shared data.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{bounded, RecvTimeoutError};
use tracing::{debug, info, warn};

use crate::audio::capture::FrameRead;
use crate::audio::chunk::{normalize, AudioChunk, ChunkAssembler, SilenceGate};
use crate::audio::encode::encode_chunk;
use crate::config::{Config, TimeoutPolicy};
use crate::error::{ConfigError, Result, VoxlogError};
use crate::stt::transcriber::Transcriber;
use crate::transcript::{write_session_log, Accumulator, Deduplicator};

/// Counters reported at session end
#[derive(Debug, Default, Clone)]
pub struct SessionStats {
    pub chunks_captured: u64,
    pub chunks_rejected: u64,
    pub transcription_errors: u64,
    pub empty_results: u64,
    pub duplicates_suppressed: u64,
    pub segments_accepted: u64,
}

impl SessionStats {
    fn log_summary(&self, elapsed: Duration) {
        info!(
            "Session complete: {} chunks captured, {} silent, {} accepted, {} duplicates, {} empty, {} errors, duration: {:.1}s",
            self.chunks_captured,
            self.chunks_rejected,
            self.segments_accepted,
            self.duplicates_suppressed,
            self.empty_results,
            self.transcription_errors,
            elapsed.as_secs_f32()
        );
    }
}

/// Outcome of a completed session
#[derive(Debug)]
pub struct SessionSummary {
    pub stats: SessionStats,
    pub transcript: String,
    pub log_path: Option<PathBuf>,
}

/// Owns the capture thread and the consume loop.
///
/// The session runs until the cancellation flag is cleared or the frame
/// source ends; on every termination path the transcript snapshot is flushed
/// to the session log and the producer (and with it the device handle) is
/// joined before returning.
pub struct Pipeline<'a> {
    config: Config,
    transcriber: &'a dyn Transcriber,
    running: Arc<AtomicBool>,
}

impl<'a> Pipeline<'a> {
    pub fn new(config: Config, transcriber: &'a dyn Transcriber) -> Self {
        Self {
            config,
            transcriber,
            running: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Flag used to cancel the session from another thread (signal handler).
    /// Clearing it stops the producer and ends the consume loop.
    pub fn cancel_handle(&self) -> Arc<AtomicBool> {
        self.running.clone()
    }

    /// Run the session to completion.
    ///
    /// `make_source` is invoked on the producer thread, so the device handle
    /// never leaves it. The flag passed to the factory is the cancellation
    /// flag; a source should yield `None` once it is cleared.
    pub fn run<R, F>(&self, make_source: F) -> Result<SessionSummary>
    where
        R: FrameRead,
        F: FnOnce(Arc<AtomicBool>) -> Result<R> + Send + 'static,
    {
        let frames_per_chunk = self.config.chunking.frames_per_chunk(&self.config.audio);
        if frames_per_chunk == 0 {
            return Err(ConfigError::InvalidValue {
                field: "chunking.chunk_seconds".to_string(),
                value: self.config.chunking.chunk_seconds.to_string(),
            }
            .into());
        }

        let sample_rate = self.config.audio.sample_rate;
        let (chunk_tx, chunk_rx) = bounded::<AudioChunk>(self.config.session.queue_depth);
        let (ready_tx, ready_rx) = bounded::<()>(1);
        let running = self.running.clone();

        let producer = thread::Builder::new()
            .name("voxlog-capture".to_string())
            .spawn(move || -> Result<()> {
                let mut source = make_source(running.clone())?;
                let assembler = ChunkAssembler::new(sample_rate, frames_per_chunk);
                let _ = ready_tx.send(());

                while running.load(Ordering::SeqCst) {
                    match assembler.assemble(&mut source)? {
                        // Backpressure: block until the consumer drains the
                        // queue. Capture-side overruns drop frames instead.
                        Some(chunk) => {
                            if chunk_tx.send(chunk).is_err() {
                                break;
                            }
                        }
                        None => break,
                    }
                }
                Ok(())
            })?;

        // The ready sender is dropped without a message when the source
        // fails to open; that error is fatal before capture begins.
        if ready_rx.recv().is_err() {
            return match join_producer(producer)? {
                Err(e) => Err(e),
                Ok(()) => Err(VoxlogError::Channel(
                    "capture thread exited before start".to_string(),
                )),
            };
        }

        info!(
            "Capturing: {:.1}s chunks at {} Hz, volume threshold {:.0}",
            self.config.chunking.chunk_seconds, sample_rate, self.config.chunking.volume_threshold
        );

        let gate = SilenceGate::new(self.config.chunking.volume_threshold);
        let mut dedup = Deduplicator::new();
        let mut accumulator = Accumulator::new();
        let mut stats = SessionStats::default();
        let started = Instant::now();
        let timeout = Duration::from_secs(self.config.session.queue_timeout_seconds);

        loop {
            if !self.running.load(Ordering::SeqCst) {
                break;
            }

            let chunk = match chunk_rx.recv_timeout(timeout) {
                Ok(chunk) => chunk,
                Err(RecvTimeoutError::Timeout) => {
                    warn!("No audio captured for {}s", timeout.as_secs());
                    match self.config.session.on_queue_timeout {
                        TimeoutPolicy::Warn => continue,
                        TimeoutPolicy::Stop => break,
                    }
                }
                Err(RecvTimeoutError::Disconnected) => break,
            };

            stats.chunks_captured += 1;

            if !gate.accept(&chunk) {
                stats.chunks_rejected += 1;
                debug!(
                    "Chunk below volume threshold (mean |amplitude| {:.2}), skipped",
                    chunk.mean_abs_amplitude
                );
                continue;
            }

            let encoded = match encode_chunk(&normalize(chunk)) {
                Ok(encoded) => encoded,
                Err(e) => {
                    stats.transcription_errors += 1;
                    warn!("Failed to encode chunk: {}", e);
                    continue;
                }
            };

            match self.transcriber.transcribe(&encoded) {
                Ok(result) => {
                    if result.text.trim().is_empty() {
                        stats.empty_results += 1;
                    } else if let Some(text) = dedup.filter(&result.text) {
                        accumulator.append(text.clone());
                        stats.segments_accepted += 1;
                        if self.config.session.echo_transcript {
                            println!("{}", text);
                        }
                    } else {
                        stats.duplicates_suppressed += 1;
                        debug!("Duplicate transcription suppressed");
                    }
                }
                Err(e) => {
                    stats.transcription_errors += 1;
                    warn!("Transcription failed, chunk skipped: {}", e);
                }
            }
        }

        // Stop the producer and unblock it if it is waiting on a full queue,
        // then collect its result so a device failure surfaces.
        self.running.store(false, Ordering::SeqCst);
        drop(chunk_rx);
        let producer_result = join_producer(producer)?;

        let transcript = accumulator.snapshot();
        let log_path = match &self.config.session.log_dir {
            Some(dir) => Some(write_session_log(dir, &transcript)?),
            None => None,
        };

        stats.log_summary(started.elapsed());
        producer_result?;

        Ok(SessionSummary {
            stats,
            transcript,
            log_path,
        })
    }
}

fn join_producer(handle: thread::JoinHandle<Result<()>>) -> Result<Result<()>> {
    handle
        .join()
        .map_err(|_| VoxlogError::Channel("capture thread panicked".to_string()))
}
