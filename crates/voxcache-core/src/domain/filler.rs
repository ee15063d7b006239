//! Filler audio played while the agent is thinking.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// A short pre-rendered clip ("um", "let me check", typing noise).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FillerAudio {
    /// Text the clip speaks (empty for non-speech noise).
    pub text: String,

    /// Raw audio in the synthesizer's output encoding.
    pub audio: Bytes,

    /// Whether the clip may be cut off by user speech.
    pub is_interruptible: bool,

    /// Playback granularity.
    pub seconds_per_chunk: u32,
}

/// Which filler clips a synthesizer should prepare.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FillerAudioConfig {
    /// Silence (seconds) after which filler audio kicks in.
    pub silence_threshold_seconds: f32,

    /// Prepare spoken phrase fillers.
    pub use_phrases: bool,

    /// Prepare the typing noise filler.
    pub use_typing_noise: bool,
}

impl Default for FillerAudioConfig {
    fn default() -> Self {
        Self {
            silence_threshold_seconds: 0.5,
            use_phrases: true,
            use_typing_noise: false,
        }
    }
}
