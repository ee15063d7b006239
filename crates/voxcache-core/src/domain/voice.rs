//! Voice configuration: which backend, which voice, which audio format.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Synthesis backend family.
///
/// The serialized tag (e.g. `"synthesizer_azure"`) is part of every cache key,
/// so renaming a variant's tag invalidates all entries written under it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BackendKind {
    #[serde(rename = "synthesizer_azure")]
    Azure,
    #[serde(rename = "synthesizer_google")]
    Google,
    #[serde(rename = "synthesizer_eleven_labs")]
    ElevenLabs,
    #[serde(rename = "synthesizer_play_ht")]
    PlayHt,
    #[serde(rename = "synthesizer_coqui")]
    Coqui,
    #[serde(rename = "synthesizer_rime")]
    Rime,
    #[serde(rename = "synthesizer_tone")]
    Tone,
}

impl BackendKind {
    /// Stable wire tag for this backend.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Azure => "synthesizer_azure",
            Self::Google => "synthesizer_google",
            Self::ElevenLabs => "synthesizer_eleven_labs",
            Self::PlayHt => "synthesizer_play_ht",
            Self::Coqui => "synthesizer_coqui",
            Self::Rime => "synthesizer_rime",
            Self::Tone => "synthesizer_tone",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw audio sample encoding produced by a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AudioEncoding {
    /// 16-bit signed little-endian PCM.
    Linear16,
    /// 8-bit G.711 mu-law.
    Mulaw,
}

impl AudioEncoding {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Linear16 => "linear16",
            Self::Mulaw => "mulaw",
        }
    }

    /// Bytes per sample for a single channel.
    pub const fn sample_width(self) -> usize {
        match self {
            Self::Linear16 => 2,
            Self::Mulaw => 1,
        }
    }
}

impl fmt::Display for AudioEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Number of audio bytes a backend emits per second of speech.
pub const fn chunk_size_per_second(encoding: AudioEncoding, sampling_rate: u32) -> usize {
    encoding.sample_width() * sampling_rate as usize
}

/// Configuration identifying a synthesis voice and its output format.
///
/// Immutable for the lifetime of a request. Serialization is deterministic:
/// fields serialize in declaration order and `options` is a [`BTreeMap`], so
/// equal configs always produce byte-identical JSON. Cache keys depend on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoiceConfig {
    /// Backend family.
    #[serde(rename = "type")]
    pub backend: BackendKind,

    /// Named voice (Azure, Google, Tone).
    #[serde(default)]
    pub voice_name: Option<String>,

    /// Opaque voice identifier (ElevenLabs, PlayHT, Coqui).
    #[serde(default)]
    pub voice_id: Option<String>,

    /// Output sample encoding.
    pub audio_encoding: AudioEncoding,

    /// Output sampling rate in Hz.
    pub sampling_rate: u32,

    /// Whether each emitted chunk is framed as a standalone WAV file.
    #[serde(default)]
    pub should_encode_as_wav: bool,

    /// Backend-specific knobs (speed, pitch, model, ...).
    #[serde(default)]
    pub options: BTreeMap<String, serde_json::Value>,
}

impl VoiceConfig {
    /// Minimal config for a backend, LINEAR16 at `sampling_rate`.
    pub fn new(backend: BackendKind, sampling_rate: u32) -> Self {
        Self {
            backend,
            voice_name: None,
            voice_id: None,
            audio_encoding: AudioEncoding::Linear16,
            sampling_rate,
            should_encode_as_wav: false,
            options: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_voice_name(mut self, name: impl Into<String>) -> Self {
        self.voice_name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_voice_id(mut self, id: impl Into<String>) -> Self {
        self.voice_id = Some(id.into());
        self
    }

    #[must_use]
    pub const fn with_encoding(mut self, encoding: AudioEncoding) -> Self {
        self.audio_encoding = encoding;
        self
    }

    #[must_use]
    pub const fn with_wav_framing(mut self, enabled: bool) -> Self {
        self.should_encode_as_wav = enabled;
        self
    }

    #[must_use]
    pub fn with_option(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.options.insert(key.into(), value);
        self
    }

    /// Voice identity used in cache keys.
    ///
    /// Reads the field the backend family actually uses for voice selection
    /// and falls back to the backend tag when it is unset.
    pub fn voice_identity(&self) -> &str {
        let voice = match self.backend {
            BackendKind::Azure | BackendKind::Google | BackendKind::Tone => {
                self.voice_name.as_deref()
            }
            BackendKind::ElevenLabs | BackendKind::PlayHt | BackendKind::Coqui => {
                self.voice_id.as_deref()
            }
            BackendKind::Rime => None,
        };
        match voice {
            Some(v) if !v.is_empty() => v,
            _ => self.backend.as_str(),
        }
    }

    /// Canonical JSON form of this config.
    pub fn canonical_json(&self) -> String {
        // Serializing a struct of plain fields and a BTreeMap cannot fail.
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Bytes of audio per second of speech for this config.
    pub const fn bytes_per_second(&self) -> usize {
        chunk_size_per_second(self.audio_encoding, self.sampling_rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_voice_identity_per_backend() {
        let azure = VoiceConfig::new(BackendKind::Azure, 16_000).with_voice_name("en-US-Jenny");
        assert_eq!(azure.voice_identity(), "en-US-Jenny");

        let eleven = VoiceConfig::new(BackendKind::ElevenLabs, 16_000).with_voice_id("abc123");
        assert_eq!(eleven.voice_identity(), "abc123");

        // voice_id is not what Azure selects on
        let azure_id = VoiceConfig::new(BackendKind::Azure, 16_000).with_voice_id("ignored");
        assert_eq!(azure_id.voice_identity(), "synthesizer_azure");

        let rime = VoiceConfig::new(BackendKind::Rime, 8_000).with_voice_name("ignored");
        assert_eq!(rime.voice_identity(), "synthesizer_rime");
    }

    #[test]
    fn test_empty_voice_falls_back_to_tag() {
        let google = VoiceConfig::new(BackendKind::Google, 24_000).with_voice_name("");
        assert_eq!(google.voice_identity(), "synthesizer_google");
    }

    #[test]
    fn test_canonical_json_is_stable() {
        let a = VoiceConfig::new(BackendKind::Coqui, 22_050)
            .with_option("speed", serde_json::json!(1.2))
            .with_option("model", serde_json::json!("xtts"));
        let b = VoiceConfig::new(BackendKind::Coqui, 22_050)
            .with_option("model", serde_json::json!("xtts"))
            .with_option("speed", serde_json::json!(1.2));

        assert_eq!(a.canonical_json(), b.canonical_json());
        assert!(a.canonical_json().starts_with(r#"{"type":"synthesizer_coqui""#));
        let model_at = a.canonical_json().find("model").unwrap();
        let speed_at = a.canonical_json().find("speed").unwrap();
        assert!(model_at < speed_at);
    }

    #[test]
    fn test_config_round_trips_through_json() {
        let config = VoiceConfig::new(BackendKind::PlayHt, 8_000)
            .with_voice_id("larry")
            .with_encoding(AudioEncoding::Mulaw);
        let parsed: VoiceConfig = serde_json::from_str(&config.canonical_json()).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_chunk_size_per_second() {
        assert_eq!(chunk_size_per_second(AudioEncoding::Linear16, 16_000), 32_000);
        assert_eq!(chunk_size_per_second(AudioEncoding::Mulaw, 8_000), 8_000);
    }
}
