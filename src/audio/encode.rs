//! PCM container encoding for the transcription hand-off

use std::io::Cursor;

use crate::audio::chunk::AudioChunk;
use crate::error::{AudioError, Result};

/// A chunk serialized as a mono 16-bit little-endian PCM WAV container.
/// Produced once, consumed once by the transcription call.
#[derive(Debug, Clone)]
pub struct EncodedChunk {
    pub sample_rate: u32,
    pub bytes: Vec<u8>,
}

/// Serialize a chunk into the container shape the recognition engine expects.
/// Pure function: no device or model dependency.
pub fn encode_chunk(chunk: &AudioChunk) -> Result<EncodedChunk> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: chunk.sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    let mut writer = hound::WavWriter::new(&mut cursor, spec)
        .map_err(|e| AudioError::Encode(e.to_string()))?;
    for &sample in &chunk.samples {
        writer
            .write_sample(sample)
            .map_err(|e| AudioError::Encode(e.to_string()))?;
    }
    writer
        .finalize()
        .map_err(|e| AudioError::Encode(e.to_string()))?;

    Ok(EncodedChunk {
        sample_rate: chunk.sample_rate,
        bytes: cursor.into_inner(),
    })
}

/// Recover a chunk from a WAV container. Sample values round-trip
/// bit-exactly through `encode_chunk`.
pub fn decode_chunk(bytes: &[u8]) -> Result<AudioChunk> {
    let mut reader = hound::WavReader::new(Cursor::new(bytes))
        .map_err(|e| AudioError::Encode(e.to_string()))?;

    let spec = reader.spec();
    if spec.channels != 1 || spec.bits_per_sample != 16 {
        return Err(AudioError::Encode(format!(
            "expected mono 16-bit PCM, got {} channels at {} bits",
            spec.channels, spec.bits_per_sample
        ))
        .into());
    }

    let samples = reader
        .samples::<i16>()
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| AudioError::Encode(e.to_string()))?;

    Ok(AudioChunk::from_samples(spec.sample_rate, samples))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let chunk = AudioChunk::from_samples(16000, vec![0, 1, -1, 32767, -32768, 12345]);
        let encoded = encode_chunk(&chunk).unwrap();
        let decoded = decode_chunk(&encoded.bytes).unwrap();

        assert_eq!(decoded, chunk);
    }

    #[test]
    fn test_round_trip_preserves_rate() {
        let chunk = AudioChunk::from_samples(44100, vec![100; 441]);
        let encoded = encode_chunk(&chunk).unwrap();

        assert_eq!(encoded.sample_rate, 44100);
        assert_eq!(decode_chunk(&encoded.bytes).unwrap().sample_rate, 44100);
    }

    #[test]
    fn test_container_is_canonical_wav() {
        let chunk = AudioChunk::from_samples(16000, vec![1, 2, 3]);
        let encoded = encode_chunk(&chunk).unwrap();

        assert_eq!(&encoded.bytes[0..4], b"RIFF");
        assert_eq!(&encoded.bytes[8..12], b"WAVE");
        // Body is the samples in little-endian order
        assert_eq!(&encoded.bytes[encoded.bytes.len() - 6..], &[1, 0, 2, 0, 3, 0]);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(decode_chunk(&[0u8, 1, 2, 3, 4, 5]).is_err());
        assert!(decode_chunk(&[]).is_err());
    }
}
