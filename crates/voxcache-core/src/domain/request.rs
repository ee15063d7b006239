//! Synthesis request shape.

use serde::{Deserialize, Serialize};

/// Emotional tone hint produced by a sentiment analyser.
///
/// The cache layer ignores it; backends that support expressive speech use it
/// on a cache miss.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BotSentiment {
    /// Emotion label (e.g. `"cheerful"`).
    pub emotion: Option<String>,

    /// Intensity in `0.0..=1.0`.
    pub degree: f32,
}

/// One text-to-speech request.
///
/// The voice configuration is not part of the request: it is whatever the
/// serving synthesizer reports from `synthesizer_config()` at call time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynthesisRequest {
    /// Text to speak.
    pub text: String,

    /// Desired output chunk size in bytes.
    pub chunk_size: usize,

    /// Optional sentiment hint, passed through to the backend.
    #[serde(default)]
    pub sentiment: Option<BotSentiment>,
}

impl SynthesisRequest {
    pub fn new(text: impl Into<String>, chunk_size: usize) -> Self {
        Self {
            text: text.into(),
            chunk_size,
            sentiment: None,
        }
    }

    #[must_use]
    pub fn with_sentiment(mut self, sentiment: BotSentiment) -> Self {
        self.sentiment = Some(sentiment);
        self
    }
}
