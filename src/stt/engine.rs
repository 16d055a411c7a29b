//! Whisper-based transcription engine

use tracing::{debug, info};
use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

use crate::audio::encode::{decode_chunk, EncodedChunk};
use crate::config::SttConfig;
use crate::error::{Result, SttEngineError};
use crate::stt::transcriber::{Transcriber, TranscriptionResult};

/// Sample rate Whisper inference expects
const WHISPER_SAMPLE_RATE: u32 = 16000;

/// Whisper-backed implementation of the transcription interface
pub struct WhisperEngine {
    ctx: WhisperContext,
    config: SttConfig,
}

impl WhisperEngine {
    /// Load the model named in the configuration
    pub fn new(config: SttConfig) -> Result<Self> {
        let model_path = &config.model_path;

        if !model_path.exists() {
            return Err(
                SttEngineError::ModelNotFound(model_path.display().to_string()).into(),
            );
        }

        info!("Loading Whisper model from: {}", model_path.display());

        let ctx_params = WhisperContextParameters::default();
        let ctx = WhisperContext::new_with_params(
            model_path.to_str().unwrap_or_default(),
            ctx_params,
        )
        .map_err(|e| SttEngineError::ModelLoad(e.to_string()))?;

        info!("Whisper model loaded successfully");

        Ok(Self { ctx, config })
    }

    /// Get the language configured for transcription
    pub fn language(&self) -> &str {
        &self.config.language
    }
}

impl Transcriber for WhisperEngine {
    fn transcribe(&self, chunk: &EncodedChunk) -> Result<TranscriptionResult> {
        if chunk.sample_rate != WHISPER_SAMPLE_RATE {
            return Err(SttEngineError::InvalidAudioData(format!(
                "engine expects {} Hz input, got {} Hz",
                WHISPER_SAMPLE_RATE, chunk.sample_rate
            ))
            .into());
        }

        let decoded = decode_chunk(&chunk.bytes)?;
        if decoded.samples.is_empty() {
            return Err(SttEngineError::InvalidAudioData("empty audio buffer".to_string()).into());
        }

        debug!(
            "Transcribing {} samples ({:.2}s)",
            decoded.samples.len(),
            decoded.duration_secs()
        );

        let samples: Vec<f32> = decoded
            .samples
            .iter()
            .map(|&s| s as f32 / 32768.0)
            .collect();

        let mut params = FullParams::new(SamplingStrategy::Greedy { best_of: 1 });
        params.set_n_threads(self.config.threads as i32);
        params.set_language(Some(&self.config.language));
        params.set_translate(self.config.translate);
        params.set_print_special(false);
        params.set_print_progress(false);
        params.set_print_realtime(false);
        params.set_print_timestamps(false);
        params.set_single_segment(false);
        params.set_no_context(true);

        let mut state = self
            .ctx
            .create_state()
            .map_err(|e| SttEngineError::Transcription(e.to_string()))?;

        state
            .full(params, &samples)
            .map_err(|e| SttEngineError::Transcription(e.to_string()))?;

        let num_segments = state
            .full_n_segments()
            .map_err(|e| SttEngineError::Transcription(e.to_string()))?;

        let mut text = String::new();
        for i in 0..num_segments {
            let segment = state
                .full_get_segment_text(i)
                .map_err(|e| SttEngineError::Transcription(e.to_string()))?;
            if !text.is_empty() {
                text.push(' ');
            }
            text.push_str(segment.trim());
        }
        let text = text.trim().to_string();

        debug!("Transcription complete: {} chars", text.len());

        Ok(TranscriptionResult { text })
    }
}

// Safety: WhisperContext is thread-safe for inference
unsafe impl Send for WhisperEngine {}
unsafe impl Sync for WhisperEngine {}
