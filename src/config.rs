//! Configuration structures for the voxlog pipeline

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::ConfigError;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub audio: AudioConfig,
    pub chunking: ChunkingConfig,
    pub stt: SttConfig,
    pub session: SessionConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            audio: AudioConfig::default(),
            chunking: ChunkingConfig::default(),
            stt: SttConfig::default(),
            session: SessionConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: &PathBuf) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|_| ConfigError::FileNotFound(path.display().to_string()))?;

        let config: Config =
            toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints the types alone cannot express
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.audio.sample_rate == 0 {
            return Err(ConfigError::InvalidValue {
                field: "audio.sample_rate".to_string(),
                value: "0".to_string(),
            });
        }
        if self.audio.frame_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "audio.frame_size".to_string(),
                value: "0".to_string(),
            });
        }
        if self.chunking.chunk_seconds <= 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "chunking.chunk_seconds".to_string(),
                value: self.chunking.chunk_seconds.to_string(),
            });
        }
        if self.chunking.frames_per_chunk(&self.audio) == 0 {
            return Err(ConfigError::InvalidValue {
                field: "chunking.chunk_seconds".to_string(),
                value: format!(
                    "{} (shorter than one {}-sample frame)",
                    self.chunking.chunk_seconds, self.audio.frame_size
                ),
            });
        }
        if self.session.queue_depth == 0 {
            return Err(ConfigError::InvalidValue {
                field: "session.queue_depth".to_string(),
                value: "0".to_string(),
            });
        }
        Ok(())
    }
}

/// Audio capture configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// Capture sample rate (Hz)
    pub sample_rate: u32,
    /// Number of input channels requested from the device (downmixed to mono)
    pub channels: u16,
    /// Samples per frame (one device read)
    pub frame_size: u32,
    /// Audio device name (None = default device)
    pub device: Option<String>,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sample_rate: 16000,
            channels: 1,
            frame_size: 1024,
            device: None,
        }
    }
}

/// Chunk assembly and silence gating configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    /// Duration of one transcription chunk (seconds)
    pub chunk_seconds: f32,
    /// Mean absolute amplitude below which a chunk is discarded as silence
    pub volume_threshold: f32,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_seconds: 3.0,
            volume_threshold: 200.0,
        }
    }
}

impl ChunkingConfig {
    /// Number of whole frames that make up one chunk. Chunk duration is
    /// implied by this count and the frame size, never stored.
    pub fn frames_per_chunk(&self, audio: &AudioConfig) -> usize {
        (audio.sample_rate as f32 / audio.frame_size as f32 * self.chunk_seconds) as usize
    }

    /// Exact chunk length in samples
    pub fn samples_per_chunk(&self, audio: &AudioConfig) -> usize {
        self.frames_per_chunk(audio) * audio.frame_size as usize
    }
}

/// STT engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SttConfig {
    /// Path to the Whisper model file
    pub model_path: PathBuf,
    /// Language for transcription
    pub language: String,
    /// Number of threads for inference
    pub threads: u32,
    /// Enable translation to English
    pub translate: bool,
}

impl Default for SttConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("./models/ggml-base.en.bin"),
            language: "en".to_string(),
            threads: 4,
            translate: false,
        }
    }
}

/// Session behavior configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Directory for the session log file (None = no log written)
    pub log_dir: Option<PathBuf>,
    /// Echo accepted transcript segments to stdout
    pub echo_transcript: bool,
    /// Consumer-side bounded wait for the next chunk (seconds)
    pub queue_timeout_seconds: u64,
    /// What to do when the wait expires without a chunk
    pub on_queue_timeout: TimeoutPolicy,
    /// Capacity of the chunk hand-off queue; the producer blocks when full
    pub queue_depth: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            log_dir: Some(PathBuf::from(".")),
            echo_transcript: true,
            queue_timeout_seconds: 15,
            on_queue_timeout: TimeoutPolicy::Warn,
            queue_depth: 8,
        }
    }
}

/// Policy for a queue wait that expires without audio
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeoutPolicy {
    /// Report and keep waiting (live dictation)
    Warn,
    /// End the session gracefully (batch-style deployments)
    Stop,
}

impl std::fmt::Display for TimeoutPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimeoutPolicy::Warn => write!(f, "warn"),
            TimeoutPolicy::Stop => write!(f, "stop"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.audio.sample_rate, 16000);
        assert_eq!(config.audio.channels, 1);
        assert_eq!(config.chunking.volume_threshold, 200.0);
        assert_eq!(config.session.on_queue_timeout, TimeoutPolicy::Warn);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_config() {
        let toml_str = r#"
            [audio]
            sample_rate = 44100
            frame_size = 2048

            [chunking]
            chunk_seconds = 2.0
            volume_threshold = 150.0

            [session]
            queue_timeout_seconds = 30
            on_queue_timeout = "stop"
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.audio.sample_rate, 44100);
        assert_eq!(config.audio.frame_size, 2048);
        assert_eq!(config.chunking.chunk_seconds, 2.0);
        assert_eq!(config.chunking.volume_threshold, 150.0);
        assert_eq!(config.session.queue_timeout_seconds, 30);
        assert_eq!(config.session.on_queue_timeout, TimeoutPolicy::Stop);
    }

    #[test]
    fn test_frames_per_chunk() {
        let audio = AudioConfig {
            sample_rate: 16000,
            frame_size: 1024,
            ..Default::default()
        };
        let chunking = ChunkingConfig {
            chunk_seconds: 3.0,
            ..Default::default()
        };

        // 16000 / 1024 * 3.0 = 46.875, truncated
        assert_eq!(chunking.frames_per_chunk(&audio), 46);
        assert_eq!(chunking.samples_per_chunk(&audio), 46 * 1024);
    }

    #[test]
    fn test_validate_rejects_zero_duration() {
        let config = Config {
            chunking: ChunkingConfig {
                chunk_seconds: 0.0,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_subframe_chunk() {
        // 0.01 s at 16 kHz is 160 samples, less than one 1024-sample frame
        let config = Config {
            chunking: ChunkingConfig {
                chunk_seconds: 0.01,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
