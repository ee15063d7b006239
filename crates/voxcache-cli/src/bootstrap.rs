//! CLI bootstrap - the composition root.
//!
//! The only place where the backend, the store and the cache are wired
//! together. Command handlers receive the composed [`CliContext`].

use voxcache_core::{BackendKind, CacheSettings, VoiceConfig};
use voxcache_synth::{CachingSynthesizer, ToneSynthesizer};

use crate::error::CliError;
use crate::parser::VoiceArgs;

/// Bootstrap configuration for the CLI.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Cache layer settings (store, policy, default chunk size).
    pub settings: CacheSettings,
    /// Voice of the tone backend.
    pub voice: VoiceConfig,
}

impl CliConfig {
    /// Settings from the environment, voice from the command line.
    pub fn from_env(voice: &VoiceArgs) -> Result<Self, CliError> {
        let settings =
            CacheSettings::from_env().map_err(|e| CliError::Config(e.to_string()))?;
        Ok(Self::new(settings, voice))
    }

    pub fn new(settings: CacheSettings, voice: &VoiceArgs) -> Self {
        let mut config = VoiceConfig::new(BackendKind::Tone, voice.sampling_rate)
            .with_wav_framing(voice.wav_chunks);
        config.voice_name.clone_from(&voice.voice);
        Self {
            settings,
            voice: config,
        }
    }
}

/// Fully composed application context for CLI commands.
pub struct CliContext {
    /// Tone backend behind the audio cache.
    pub synth: CachingSynthesizer<ToneSynthesizer>,
    /// Settings the cache was built from.
    pub settings: CacheSettings,
}

impl CliContext {
    pub const fn synth(&self) -> &CachingSynthesizer<ToneSynthesizer> {
        &self.synth
    }

    /// Chunk size to use when a command does not specify one.
    pub const fn default_chunk_size(&self) -> usize {
        self.settings.default_chunk_size
    }
}

/// Bootstrap the CLI application.
///
/// Connects the configured store before returning, so an unreachable or
/// unconfigured store fails here rather than mid-command.
pub async fn bootstrap(config: CliConfig) -> Result<CliContext, CliError> {
    let backend = ToneSynthesizer::new(config.voice);
    let synth = CachingSynthesizer::from_settings(backend, &config.settings).await?;

    tracing::debug!(
        store = synth.store().backend_type(),
        chunk_size = config.settings.default_chunk_size,
        "CLI context ready"
    );

    Ok(CliContext {
        synth,
        settings: config.settings,
    })
}

#[cfg(test)]
pub(crate) async fn memory_context(voice: &VoiceArgs) -> CliContext {
    bootstrap(CliConfig::new(CacheSettings::in_memory(), voice))
        .await
        .unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;
    use voxcache_core::StoreBackend;

    fn args() -> VoiceArgs {
        VoiceArgs {
            voice: Some("alto".into()),
            sampling_rate: 8_000,
            wav_chunks: true,
        }
    }

    #[test]
    fn test_config_from_voice_args() {
        let config = CliConfig::new(CacheSettings::in_memory(), &args());
        assert_eq!(config.voice.backend, BackendKind::Tone);
        assert_eq!(config.voice.voice_name.as_deref(), Some("alto"));
        assert_eq!(config.voice.sampling_rate, 8_000);
        assert!(config.voice.should_encode_as_wav);
    }

    #[tokio::test]
    async fn test_bootstrap_fails_fast_without_redis_url() {
        let settings = CacheSettings {
            store: StoreBackend::Redis,
            redis_url: None,
            ..CacheSettings::default()
        };
        let err = bootstrap(CliConfig::new(settings, &args())).await.err().unwrap();
        assert!(matches!(err, CliError::Config(_)));
    }
}
