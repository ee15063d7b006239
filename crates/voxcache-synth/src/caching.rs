//! Read-through audio cache in front of any [`Synthesizer`].

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::runtime::Handle;
use tracing::{debug, info, warn};
use voxcache_core::{
    AudioStore, CacheSettings, CoreError, CutoffEstimator, FillerAudio, FillerAudioConfig,
    StoreError, StripScope, SynthesisError, SynthesisRequest, SynthesisResult, Synthesizer, VoiceConfig,
    validate_settings,
};

use crate::key::{CacheKey, derive_key};
use crate::replay::{ChunkTransform, replay};
use crate::stats::{CacheStats, CacheStatsSnapshot};
use crate::tee::{HeaderStrip, StreamEnd, StreamTee, TeeCompletion};
use crate::wav::WAV_HEADER_LEN;

/// Write policy of a [`CachingSynthesizer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachePolicy {
    /// Which chunks of a WAV-framed stream carry a header to strip.
    pub header_strip_scope: StripScope,

    /// Write the bytes produced so far when a consumer abandons a stream.
    pub cache_partial_streams: bool,
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self {
            header_strip_scope: StripScope::EveryChunk,
            cache_partial_streams: true,
        }
    }
}

impl From<&CacheSettings> for CachePolicy {
    fn from(settings: &CacheSettings) -> Self {
        Self {
            header_strip_scope: settings.header_strip_scope,
            cache_partial_streams: settings.cache_partial_streams,
        }
    }
}

/// Decorator that serves repeated requests from an [`AudioStore`].
///
/// On a hit the cached audio is replayed without calling the backend. On a
/// miss the backend's stream is forwarded unchanged while its raw bytes are
/// recorded; once the consumer drains or drops the stream, the recording is
/// written to the store on a detached task. Store failures never fail a
/// request: lookups degrade to misses and writes are dropped.
///
/// Everything else delegates to the wrapped synthesizer.
pub struct CachingSynthesizer<S> {
    inner: Arc<S>,
    store: Arc<dyn AudioStore>,
    policy: CachePolicy,
    stats: Arc<CacheStats>,
}

impl<S> CachingSynthesizer<S>
where
    S: Synthesizer + 'static,
{
    /// Wrap `inner` with the default [`CachePolicy`].
    pub fn new(inner: S, store: Arc<dyn AudioStore>) -> Self {
        Self::with_shared(Arc::new(inner), store)
    }

    /// Wrap a synthesizer the caller keeps a handle to (e.g. to switch voices).
    pub fn with_shared(inner: Arc<S>, store: Arc<dyn AudioStore>) -> Self {
        info!(store = store.backend_type(), "Audio cache enabled");
        Self {
            inner,
            store,
            policy: CachePolicy::default(),
            stats: Arc::new(CacheStats::default()),
        }
    }

    /// Build from settings, connecting the configured store.
    ///
    /// Fails if the settings are invalid or the store cannot be reached.
    pub async fn from_settings(inner: S, settings: &CacheSettings) -> Result<Self, CoreError> {
        validate_settings(settings)?;
        let store = voxcache_store::connect_store(settings).await?;
        Ok(Self::new(inner, store).with_policy(CachePolicy::from(settings)))
    }

    #[must_use]
    pub fn with_policy(mut self, policy: CachePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn store(&self) -> &Arc<dyn AudioStore> {
        &self.store
    }

    pub const fn policy(&self) -> CachePolicy {
        self.policy
    }

    pub fn stats(&self) -> CacheStatsSnapshot {
        self.stats.snapshot()
    }

    /// Key `text` would be cached under with the current voice.
    pub fn cache_key(&self, text: &str) -> CacheKey {
        derive_key(text, &self.inner.synthesizer_config())
    }

    /// Whether `text` is cached for the current voice.
    pub async fn is_cached(&self, text: &str) -> Result<bool, StoreError> {
        self.store.exists(self.cache_key(text).as_str()).await
    }

    /// Serve `request` from the cache, or synthesize it and populate the cache.
    pub async fn synthesize(
        &self,
        request: &SynthesisRequest,
    ) -> Result<SynthesisResult, SynthesisError> {
        let config = self.inner.synthesizer_config();
        let key = derive_key(&request.text, &config);

        if let Some(cached) = self.lookup(&key).await {
            debug!(key = %key, bytes = cached.len(), "Audio cache hit");
            self.stats.record_hit();
            return Ok(self.replay_cached(request, &config, cached));
        }

        debug!(key = %key, "Audio cache miss");
        self.stats.record_miss();

        let live = self.inner.create_speech(request).await?;
        let strip = header_strip(&config, self.policy.header_strip_scope);
        let on_complete = self.write_back(request.text.clone());
        let chunks = StreamTee::new(live.chunks, strip, on_complete);

        Ok(SynthesisResult::new(Box::pin(chunks), live.cutoff))
    }

    /// Cached bytes for `key`. Store errors count as a miss.
    async fn lookup(&self, key: &CacheKey) -> Option<Bytes> {
        match self.store.exists(key.as_str()).await {
            Ok(true) => {}
            Ok(false) => return None,
            Err(e) => {
                warn!(key = %key, error = %e, "Audio cache lookup failed, synthesizing");
                self.stats.record_degraded_lookup();
                return None;
            }
        }

        match self.store.get(key.as_str()).await {
            Ok(Some(bytes)) => Some(bytes),
            Ok(None) => {
                warn!(key = %key, "Audio cache entry vanished between exists and get");
                self.stats.record_degraded_lookup();
                None
            }
            Err(e) => {
                warn!(key = %key, error = %e, "Audio cache read failed, synthesizing");
                self.stats.record_degraded_lookup();
                None
            }
        }
    }

    fn replay_cached(
        &self,
        request: &SynthesisRequest,
        config: &VoiceConfig,
        cached: Bytes,
    ) -> SynthesisResult {
        let entry_len = cached.len();
        let chunks = replay(cached, request.chunk_size, ChunkTransform::for_config(config));

        let inner = Arc::clone(&self.inner);
        let text = request.text.clone();
        let cutoff: CutoffEstimator = Arc::new(move |seconds| {
            inner.message_cutoff_from_total_response_length(&text, seconds, entry_len)
        });

        SynthesisResult::new(chunks.into_stream(), cutoff)
    }

    /// Completion callback that persists a teed stream.
    fn write_back(&self, text: String) -> impl FnOnce(TeeCompletion) + Send + 'static + use<S> {
        let inner = Arc::clone(&self.inner);
        let store = Arc::clone(&self.store);
        let stats = Arc::clone(&self.stats);
        let cache_partial = self.policy.cache_partial_streams;
        let runtime = Handle::try_current().ok();

        move |completion: TeeCompletion| {
            if completion.end == StreamEnd::Closed && !cache_partial {
                debug!(
                    bytes = completion.bytes.len(),
                    "Stream abandoned, partial audio not cached"
                );
                stats.record_skipped_partial_write();
                return;
            }

            // Keyed by the voice at completion time, which may differ from the
            // one the lookup used if the voice was switched mid-stream.
            let key = derive_key(&text, &inner.synthesizer_config());

            let Some(runtime) = runtime else {
                warn!(key = %key, "No tokio runtime, audio not cached");
                stats.record_write_failure();
                return;
            };

            runtime.spawn(async move {
                let bytes = completion.bytes.len();
                match store.set(key.as_str(), completion.bytes).await {
                    Ok(()) => {
                        info!(
                            key = %key,
                            bytes,
                            chunks = completion.chunks,
                            partial = completion.end == StreamEnd::Closed,
                            "Cached synthesized audio"
                        );
                        stats.record_write();
                    }
                    Err(e) => {
                        warn!(key = %key, error = %e, "Audio cache write failed");
                        stats.record_write_failure();
                    }
                }
            });
        }
    }
}

/// Header strip matching the framing `config` produces.
fn header_strip(config: &VoiceConfig, scope: StripScope) -> HeaderStrip {
    if config.should_encode_as_wav {
        HeaderStrip {
            bytes: WAV_HEADER_LEN,
            scope,
        }
    } else {
        HeaderStrip::NONE
    }
}

#[async_trait]
impl<S> Synthesizer for CachingSynthesizer<S>
where
    S: Synthesizer + 'static,
{
    fn synthesizer_config(&self) -> VoiceConfig {
        self.inner.synthesizer_config()
    }

    async fn create_speech(
        &self,
        request: &SynthesisRequest,
    ) -> Result<SynthesisResult, SynthesisError> {
        self.synthesize(request).await
    }

    fn create_synthesis_result_from_wav(
        &self,
        wav: Bytes,
        text: &str,
        chunk_size: usize,
    ) -> Result<SynthesisResult, SynthesisError> {
        self.inner
            .create_synthesis_result_from_wav(wav, text, chunk_size)
    }

    fn filler_audios(&self) -> Vec<FillerAudio> {
        self.inner.filler_audios()
    }

    async fn set_filler_audios(&self, config: &FillerAudioConfig) -> Result<(), SynthesisError> {
        self.inner.set_filler_audios(config).await
    }

    async fn phrase_filler_audios(&self) -> Result<Vec<FillerAudio>, SynthesisError> {
        self.inner.phrase_filler_audios().await
    }

    fn typing_noise_filler_audio(&self) -> Option<FillerAudio> {
        self.inner.typing_noise_filler_audio()
    }

    async fn ready(&self) -> bool {
        self.inner.ready().await
    }

    fn message_cutoff_from_total_response_length(
        &self,
        text: &str,
        seconds: u32,
        size_of_output: usize,
    ) -> String {
        self.inner
            .message_cutoff_from_total_response_length(text, seconds, size_of_output)
    }

    fn message_cutoff_from_voice_speed(
        &self,
        text: &str,
        seconds: u32,
        words_per_minute: u32,
    ) -> String {
        self.inner
            .message_cutoff_from_voice_speed(text, seconds, words_per_minute)
    }
}

impl<S> std::fmt::Debug for CachingSynthesizer<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachingSynthesizer")
            .field("store", &self.store.backend_type())
            .field("policy", &self.policy)
            .field("stats", &self.stats.snapshot())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use voxcache_core::BackendKind;

    #[test]
    fn test_header_strip_follows_wav_flag() {
        let plain = VoiceConfig::new(BackendKind::Tone, 16_000);
        assert_eq!(header_strip(&plain, StripScope::EveryChunk), HeaderStrip::NONE);

        let framed = plain.with_wav_framing(true);
        assert_eq!(
            header_strip(&framed, StripScope::FirstChunk),
            HeaderStrip::first_chunk(WAV_HEADER_LEN)
        );
    }

    #[test]
    fn test_policy_from_settings() {
        let settings = CacheSettings {
            header_strip_scope: StripScope::FirstChunk,
            cache_partial_streams: false,
            ..CacheSettings::in_memory()
        };
        let policy = CachePolicy::from(&settings);
        assert_eq!(policy.header_strip_scope, StripScope::FirstChunk);
        assert!(!policy.cache_partial_streams);

        assert_eq!(CachePolicy::default(), CachePolicy::from(&CacheSettings::default()));
    }
}
