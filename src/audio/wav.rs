//! WAV file frame source for batch transcription

use std::path::Path;

use crate::audio::capture::{AudioFrame, FrameRead};
use crate::error::{AudioError, Result};

/// Frame source that replays a WAV file through the pipeline.
///
/// Stereo input is downmixed to mono; the file's own sample rate is kept.
/// End of file ends the session gracefully, the batch-style counterpart of a
/// live capture being cancelled.
pub struct WavFileSource {
    samples: Vec<i16>,
    position: usize,
    frame_size: usize,
    sample_rate: u32,
}

impl WavFileSource {
    pub fn open(path: &Path, frame_size: usize) -> Result<Self> {
        let mut reader = hound::WavReader::open(path)
            .map_err(|e| AudioError::Encode(format!("failed to open WAV file: {}", e)))?;

        let spec = reader.spec();
        let raw: Vec<i16> = match spec.sample_format {
            hound::SampleFormat::Int => reader
                .samples::<i16>()
                .collect::<std::result::Result<Vec<_>, _>>()
                .map_err(|e| AudioError::Encode(format!("failed to read WAV samples: {}", e)))?,
            hound::SampleFormat::Float => reader
                .samples::<f32>()
                .collect::<std::result::Result<Vec<_>, _>>()
                .map_err(|e| AudioError::Encode(format!("failed to read WAV samples: {}", e)))?
                .into_iter()
                .map(|s| (s.clamp(-1.0, 1.0) * 32767.0) as i16)
                .collect(),
        };

        let samples = if spec.channels > 1 {
            let channels = spec.channels as usize;
            raw.chunks_exact(channels)
                .map(|slot| {
                    let sum: i32 = slot.iter().map(|&s| s as i32).sum();
                    (sum / channels as i32) as i16
                })
                .collect()
        } else {
            raw
        };

        Ok(Self {
            samples,
            position: 0,
            frame_size,
            sample_rate: spec.sample_rate,
        })
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Total duration of the file in seconds
    pub fn duration_secs(&self) -> f32 {
        self.samples.len() as f32 / self.sample_rate as f32
    }
}

impl FrameRead for WavFileSource {
    fn read_frame(&mut self) -> Result<Option<AudioFrame>> {
        // A partial tail would make the final chunk short; drop it.
        if self.position + self.frame_size > self.samples.len() {
            return Ok(None);
        }

        let frame = self.samples[self.position..self.position + self.frame_size].to_vec();
        self.position += self.frame_size;
        Ok(Some(frame))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_wav(path: &Path, sample_rate: u32, channels: u16, samples: &[i16]) {
        let spec = hound::WavSpec {
            channels,
            sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(path, spec).unwrap();
        for &s in samples {
            writer.write_sample(s).unwrap();
        }
        writer.finalize().unwrap();
    }

    #[test]
    fn test_reads_mono_frames_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mono.wav");
        write_wav(&path, 16000, 1, &[1, 2, 3, 4, 5, 6]);

        let mut source = WavFileSource::open(&path, 2).unwrap();
        assert_eq!(source.sample_rate(), 16000);
        assert_eq!(source.read_frame().unwrap(), Some(vec![1, 2]));
        assert_eq!(source.read_frame().unwrap(), Some(vec![3, 4]));
        assert_eq!(source.read_frame().unwrap(), Some(vec![5, 6]));
        assert_eq!(source.read_frame().unwrap(), None);
    }

    #[test]
    fn test_downmixes_stereo() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stereo.wav");
        // Pairs: (100, 200) -> 150, (-300, 300) -> 0
        write_wav(&path, 16000, 2, &[100, 200, -300, 300]);

        let mut source = WavFileSource::open(&path, 2).unwrap();
        assert_eq!(source.read_frame().unwrap(), Some(vec![150, 0]));
    }

    #[test]
    fn test_drops_partial_tail() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tail.wav");
        write_wav(&path, 16000, 1, &[1, 2, 3, 4, 5]);

        let mut source = WavFileSource::open(&path, 2).unwrap();
        assert!(source.read_frame().unwrap().is_some());
        assert!(source.read_frame().unwrap().is_some());
        // One sample left: not a full frame
        assert_eq!(source.read_frame().unwrap(), None);
    }

    #[test]
    fn test_rejects_non_wav_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("garbage.wav");
        std::fs::File::create(&path)
            .unwrap()
            .write_all(b"not a wav")
            .unwrap();

        assert!(WavFileSource::open(&path, 2).is_err());
    }
}
