//! Chunk assembly, silence gating, and peak normalization

use tracing::debug;

use crate::audio::capture::FrameRead;
use crate::error::Result;

/// A fixed-duration window of mono audio treated as one transcription unit.
///
/// Length is always a whole number of frames; duration is implied by the
/// sample count and rate.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioChunk {
    pub sample_rate: u32,
    pub samples: Vec<i16>,
    pub mean_abs_amplitude: f32,
}

impl AudioChunk {
    /// Build a chunk from raw samples, computing the mean absolute amplitude.
    pub fn from_samples(sample_rate: u32, samples: Vec<i16>) -> Self {
        let mean_abs_amplitude = mean_abs(&samples);
        Self {
            sample_rate,
            samples,
            mean_abs_amplitude,
        }
    }

    /// Duration in seconds
    pub fn duration_secs(&self) -> f32 {
        self.samples.len() as f32 / self.sample_rate as f32
    }
}

fn mean_abs(samples: &[i16]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let total: u64 = samples
        .iter()
        .map(|&s| (s as i32).unsigned_abs() as u64)
        .sum();
    total as f32 / samples.len() as f32
}

/// Aggregates a fixed number of frames into one chunk.
pub struct ChunkAssembler {
    sample_rate: u32,
    frames_per_chunk: usize,
}

impl ChunkAssembler {
    pub fn new(sample_rate: u32, frames_per_chunk: usize) -> Self {
        Self {
            sample_rate,
            frames_per_chunk,
        }
    }

    /// Read exactly `frames_per_chunk` frames from the source, concatenating
    /// in arrival order. The amplitude mean is the total absolute sum over
    /// the total sample count, so frames of unequal length carry their
    /// proper weight.
    ///
    /// Returns `Ok(None)` when the source ends mid-chunk; the partial chunk
    /// is discarded rather than emitted short.
    pub fn assemble<R: FrameRead>(&self, source: &mut R) -> Result<Option<AudioChunk>> {
        let mut samples: Vec<i16> = Vec::new();
        let mut abs_sum: u64 = 0;

        for _ in 0..self.frames_per_chunk {
            let frame = match source.read_frame()? {
                Some(frame) => frame,
                None => return Ok(None),
            };
            for &s in &frame {
                abs_sum += (s as i32).unsigned_abs() as u64;
            }
            samples.extend_from_slice(&frame);
        }

        let mean_abs_amplitude = if samples.is_empty() {
            0.0
        } else {
            abs_sum as f32 / samples.len() as f32
        };

        debug!(
            "Assembled chunk: {} samples, mean |amplitude| {:.2}",
            samples.len(),
            mean_abs_amplitude
        );

        Ok(Some(AudioChunk {
            sample_rate: self.sample_rate,
            samples,
            mean_abs_amplitude,
        }))
    }
}

/// Per-chunk silence rejection by mean absolute amplitude
pub struct SilenceGate {
    threshold: f32,
}

impl SilenceGate {
    pub fn new(threshold: f32) -> Self {
        Self { threshold }
    }

    /// A chunk passes when its mean absolute amplitude reaches the threshold.
    /// An all-zero chunk never passes, whatever the threshold.
    pub fn accept(&self, chunk: &AudioChunk) -> bool {
        chunk.mean_abs_amplitude > 0.0 && chunk.mean_abs_amplitude >= self.threshold
    }
}

/// Rescale samples so the peak reaches i16 full scale, preserving sign and
/// relative ratios. A chunk with zero peak is returned unchanged.
pub fn normalize(chunk: AudioChunk) -> AudioChunk {
    let peak = chunk
        .samples
        .iter()
        .map(|&s| (s as i32).unsigned_abs())
        .max()
        .unwrap_or(0);

    if peak == 0 {
        return chunk;
    }

    let samples: Vec<i16> = chunk
        .samples
        .iter()
        .map(|&s| {
            let scaled = s as i64 * i16::MAX as i64 / peak as i64;
            scaled.clamp(i16::MIN as i64, i16::MAX as i64) as i16
        })
        .collect();

    AudioChunk::from_samples(chunk.sample_rate, samples)
}
