//! Transcription interface to the recognition engine

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use crate::audio::encode::EncodedChunk;
use crate::error::{Result, SttEngineError};

/// Result of transcribing one encoded chunk
#[derive(Debug, Clone)]
pub struct TranscriptionResult {
    /// Concatenated recognized text, possibly empty
    pub text: String,
}

/// Interface to the external speech-recognition engine.
///
/// Calls are synchronous and blocking and may take seconds; no session state
/// persists between them. A failed call surfaces as `SttEngineError` and the
/// pipeline skips the chunk rather than aborting.
pub trait Transcriber: Send + Sync {
    fn transcribe(&self, chunk: &EncodedChunk) -> Result<TranscriptionResult>;
}

/// Scriptable transcriber for tests: queued responses, optional per-call
/// latency, optional unconditional failure.
pub struct MockTranscriber {
    responses: Mutex<VecDeque<String>>,
    default_response: String,
    latencies: Mutex<VecDeque<Duration>>,
    fail: bool,
    calls: AtomicUsize,
}

impl MockTranscriber {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            default_response: String::new(),
            latencies: Mutex::new(VecDeque::new()),
            fail: false,
            calls: AtomicUsize::new(0),
        }
    }

    /// Respond with `text` once the queued responses run out
    pub fn with_response(mut self, text: &str) -> Self {
        self.default_response = text.to_string();
        self
    }

    /// Queue one response per expected call, consumed in order
    pub fn with_responses<I, S>(self, responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        {
            let mut queue = self.responses.lock().unwrap();
            queue.extend(responses.into_iter().map(Into::into));
        }
        self
    }

    /// Sleep for the next queued duration before answering each call
    pub fn with_latencies<I>(self, latencies: I) -> Self
    where
        I: IntoIterator<Item = Duration>,
    {
        {
            let mut queue = self.latencies.lock().unwrap();
            queue.extend(latencies);
        }
        self
    }

    /// Fail every call
    pub fn with_failure(mut self) -> Self {
        self.fail = true;
        self
    }

    /// Number of transcribe calls made so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for MockTranscriber {
    fn default() -> Self {
        Self::new()
    }
}

impl Transcriber for MockTranscriber {
    fn transcribe(&self, _chunk: &EncodedChunk) -> Result<TranscriptionResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let latency = self.latencies.lock().unwrap().pop_front();
        if let Some(latency) = latency {
            std::thread::sleep(latency);
        }

        if self.fail {
            return Err(
                SttEngineError::Transcription("mock transcription failure".to_string()).into(),
            );
        }

        let text = self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.default_response.clone());
        Ok(TranscriptionResult { text })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::chunk::AudioChunk;
    use crate::audio::encode::encode_chunk;

    fn make_chunk() -> EncodedChunk {
        encode_chunk(&AudioChunk::from_samples(16000, vec![100; 160])).unwrap()
    }

    #[test]
    fn test_mock_returns_queued_responses_in_order() {
        let transcriber = MockTranscriber::new().with_responses(["one", "two"]);

        let chunk = make_chunk();
        assert_eq!(transcriber.transcribe(&chunk).unwrap().text, "one");
        assert_eq!(transcriber.transcribe(&chunk).unwrap().text, "two");
        assert_eq!(transcriber.calls(), 2);
    }

    #[test]
    fn test_mock_falls_back_to_default_response() {
        let transcriber = MockTranscriber::new().with_response("fallback");

        assert_eq!(transcriber.transcribe(&make_chunk()).unwrap().text, "fallback");
    }

    #[test]
    fn test_mock_failure() {
        let transcriber = MockTranscriber::new().with_failure();

        assert!(transcriber.transcribe(&make_chunk()).is_err());
        assert_eq!(transcriber.calls(), 1);
    }

    #[test]
    fn test_trait_is_object_safe() {
        let transcriber: Box<dyn Transcriber> =
            Box::new(MockTranscriber::new().with_response("boxed"));

        assert_eq!(transcriber.transcribe(&make_chunk()).unwrap().text, "boxed");
    }
}
