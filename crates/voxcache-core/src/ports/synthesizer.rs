//! Synthesizer port: the contract every speech backend fulfils.
//!
//! The cache layer implements this same trait, so a cached synthesizer is a
//! drop-in replacement for the backend it wraps.

use async_trait::async_trait;
use bytes::Bytes;

use super::SynthesisError;
use crate::domain::{FillerAudio, FillerAudioConfig, SynthesisRequest, SynthesisResult, VoiceConfig};

/// Backend-agnostic streaming text-to-speech engine.
///
/// Implementations must be `Send + Sync` so one instance can serve many
/// concurrent requests. `synthesizer_config` may change between calls (e.g.
/// a voice switch), but a returned config is a snapshot.
#[async_trait]
pub trait Synthesizer: Send + Sync {
    /// Current voice configuration.
    fn synthesizer_config(&self) -> VoiceConfig;

    /// Start synthesizing `request.text`.
    ///
    /// Returns once the stream is ready to be polled; audio is produced
    /// lazily as the caller pulls chunks.
    async fn create_speech(
        &self,
        request: &SynthesisRequest,
    ) -> Result<SynthesisResult, SynthesisError>;

    /// Build a result that streams a pre-recorded WAV file.
    fn create_synthesis_result_from_wav(
        &self,
        wav: Bytes,
        text: &str,
        chunk_size: usize,
    ) -> Result<SynthesisResult, SynthesisError>;

    /// Filler clips prepared by [`set_filler_audios`](Self::set_filler_audios).
    fn filler_audios(&self) -> Vec<FillerAudio> {
        Vec::new()
    }

    /// Prepare filler clips for `config`.
    async fn set_filler_audios(&self, _config: &FillerAudioConfig) -> Result<(), SynthesisError> {
        Ok(())
    }

    /// Render the spoken phrase fillers.
    async fn phrase_filler_audios(&self) -> Result<Vec<FillerAudio>, SynthesisError> {
        Ok(Vec::new())
    }

    /// Typing noise clip, if the backend ships one.
    fn typing_noise_filler_audio(&self) -> Option<FillerAudio> {
        None
    }

    /// Warm up connections or models. Returns `false` if the backend cannot
    /// serve requests.
    async fn ready(&self) -> bool {
        true
    }

    /// Estimate the text spoken after `seconds`, given the total audio size.
    fn message_cutoff_from_total_response_length(
        &self,
        text: &str,
        seconds: u32,
        size_of_output: usize,
    ) -> String {
        let bytes_per_second = self.synthesizer_config().bytes_per_second();
        cutoff_by_output_length(text, seconds, size_of_output, bytes_per_second)
    }

    /// Estimate the text spoken after `seconds` at `words_per_minute`.
    fn message_cutoff_from_voice_speed(
        &self,
        text: &str,
        seconds: u32,
        words_per_minute: u32,
    ) -> String {
        cutoff_by_voice_speed(text, seconds, words_per_minute)
    }
}

/// Prefix of `text` spoken after `seconds`, assuming characters are spread
/// evenly over `size_of_output` bytes of audio.
///
/// With no audio at all the whole text is considered spoken.
pub fn cutoff_by_output_length(
    text: &str,
    seconds: u32,
    size_of_output: usize,
    bytes_per_second: usize,
) -> String {
    if size_of_output == 0 {
        return text.to_string();
    }
    let chars = text.chars().count();
    let played = u128::from(seconds) * bytes_per_second as u128;
    let spoken = (played * chars as u128 / size_of_output as u128).min(chars as u128);
    // spoken <= chars, so the cast back cannot truncate
    #[allow(clippy::cast_possible_truncation)]
    let spoken = spoken as usize;
    text.chars().take(spoken).collect()
}

/// First words of `text` spoken after `seconds` at `words_per_minute`.
pub fn cutoff_by_voice_speed(text: &str, seconds: u32, words_per_minute: u32) -> String {
    let words = u64::from(words_per_minute) * u64::from(seconds) / 60;
    let words = usize::try_from(words).unwrap_or(usize::MAX);
    text.split(' ').take(words).collect::<Vec<_>>().join(" ")
}
