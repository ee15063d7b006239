//! Cache layer settings and validation.
//!
//! Settings are plain data. They can be deserialized from a config file or
//! read from the process environment with [`CacheSettings::from_env`].

use serde::{Deserialize, Serialize};

/// Chunk size used when a caller does not ask for one (bytes).
pub const DEFAULT_CHUNK_SIZE: usize = 8_192;

/// Environment variable selecting the store backend (`redis` or `memory`).
pub const ENV_STORE: &str = "VOXCACHE_STORE";
/// Environment variable holding the redis connection URL.
pub const ENV_REDIS_URL: &str = "REDIS_URL";
/// Environment variable selecting the header strip scope (`every_chunk` or `first_chunk`).
pub const ENV_STRIP_SCOPE: &str = "VOXCACHE_STRIP_SCOPE";
/// Environment variable toggling writes of abandoned streams.
pub const ENV_CACHE_PARTIAL: &str = "VOXCACHE_CACHE_PARTIAL";
/// Environment variable overriding the default chunk size.
pub const ENV_CHUNK_SIZE: &str = "VOXCACHE_CHUNK_SIZE";

/// Which store implementation backs the cache.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreBackend {
    /// Remote redis server at [`CacheSettings::redis_url`].
    #[default]
    Redis,
    /// Process-local map; entries die with the process.
    Memory,
}

/// Which chunks of a live stream lose their leading header bytes before
/// being accumulated for the cache.
///
/// WAV-framing backends prepend a header to every chunk they emit, so
/// `EveryChunk` is the default. `FirstChunk` suits backends that emit a
/// single container header at the start of the stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StripScope {
    #[default]
    EveryChunk,
    FirstChunk,
}

/// Cache layer settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    /// Store backend.
    pub store: StoreBackend,

    /// Redis connection URL (required when `store` is `redis`).
    pub redis_url: Option<String>,

    /// Header strip scope applied to live streams.
    pub header_strip_scope: StripScope,

    /// Whether a stream abandoned before its end is still written.
    ///
    /// When `true` the truncated audio is cached as if it were complete and
    /// later hits replay the truncated clip.
    pub cache_partial_streams: bool,

    /// Chunk size for callers that don't pick one.
    pub default_chunk_size: usize,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl CacheSettings {
    /// Settings with sensible defaults (redis store, no URL yet).
    #[must_use]
    pub const fn with_defaults() -> Self {
        Self {
            store: StoreBackend::Redis,
            redis_url: None,
            header_strip_scope: StripScope::EveryChunk,
            cache_partial_streams: true,
            default_chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    /// In-memory store settings, handy for tests and one-shot CLI runs.
    #[must_use]
    pub const fn in_memory() -> Self {
        let mut settings = Self::with_defaults();
        settings.store = StoreBackend::Memory;
        settings
    }

    /// Read settings from the process environment.
    pub fn from_env() -> Result<Self, SettingsError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read settings through an arbitrary variable lookup.
    ///
    /// Unset variables keep their defaults; set-but-malformed variables are
    /// errors rather than silently ignored.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, SettingsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Self::with_defaults();

        if let Some(store) = lookup(ENV_STORE) {
            settings.store = match store.trim().to_ascii_lowercase().as_str() {
                "redis" => StoreBackend::Redis,
                "memory" => StoreBackend::Memory,
                _ => return Err(SettingsError::InvalidValue { var: ENV_STORE, value: store }),
            };
        }

        settings.redis_url = lookup(ENV_REDIS_URL)
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty());

        if let Some(scope) = lookup(ENV_STRIP_SCOPE) {
            settings.header_strip_scope = match scope.trim().to_ascii_lowercase().as_str() {
                "every_chunk" | "every" => StripScope::EveryChunk,
                "first_chunk" | "first" => StripScope::FirstChunk,
                _ => {
                    return Err(SettingsError::InvalidValue { var: ENV_STRIP_SCOPE, value: scope });
                }
            };
        }

        if let Some(partial) = lookup(ENV_CACHE_PARTIAL) {
            settings.cache_partial_streams = match partial.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                _ => {
                    return Err(SettingsError::InvalidValue {
                        var: ENV_CACHE_PARTIAL,
                        value: partial,
                    });
                }
            };
        }

        if let Some(size) = lookup(ENV_CHUNK_SIZE) {
            settings.default_chunk_size = size
                .trim()
                .parse()
                .map_err(|_| SettingsError::InvalidValue { var: ENV_CHUNK_SIZE, value: size })?;
        }

        validate_settings(&settings)?;
        Ok(settings)
    }
}

/// Settings validation error.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("Invalid value for {var}: {value:?}")]
    InvalidValue { var: &'static str, value: String },

    #[error("Redis store selected but no redis URL configured (set REDIS_URL)")]
    MissingRedisUrl,

    #[error("Default chunk size must be at least 1 byte")]
    ZeroChunkSize,
}

/// Validate settings values.
pub fn validate_settings(settings: &CacheSettings) -> Result<(), SettingsError> {
    if settings.store == StoreBackend::Redis && settings.redis_url.is_none() {
        return Err(SettingsError::MissingRedisUrl);
    }
    if settings.default_chunk_size == 0 {
        return Err(SettingsError::ZeroChunkSize);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_default_settings() {
        let settings = CacheSettings::default();
        assert_eq!(settings.store, StoreBackend::Redis);
        assert_eq!(settings.header_strip_scope, StripScope::EveryChunk);
        assert!(settings.cache_partial_streams);
        assert_eq!(settings.default_chunk_size, DEFAULT_CHUNK_SIZE);
    }

    #[test]
    fn test_redis_without_url_is_rejected() {
        let result = CacheSettings::from_lookup(lookup_from(&[]));
        assert_eq!(result, Err(SettingsError::MissingRedisUrl));
    }

    #[test]
    fn test_from_lookup_reads_all_vars() {
        let settings = CacheSettings::from_lookup(lookup_from(&[
            (ENV_REDIS_URL, " redis://cache:6379/2 "),
            (ENV_STRIP_SCOPE, "first_chunk"),
            (ENV_CACHE_PARTIAL, "off"),
            (ENV_CHUNK_SIZE, "1024"),
        ]))
        .unwrap();

        assert_eq!(settings.store, StoreBackend::Redis);
        assert_eq!(settings.redis_url.as_deref(), Some("redis://cache:6379/2"));
        assert_eq!(settings.header_strip_scope, StripScope::FirstChunk);
        assert!(!settings.cache_partial_streams);
        assert_eq!(settings.default_chunk_size, 1024);
    }

    #[test]
    fn test_memory_store_needs_no_url() {
        let settings =
            CacheSettings::from_lookup(lookup_from(&[(ENV_STORE, "Memory")])).unwrap();
        assert_eq!(settings.store, StoreBackend::Memory);
        assert!(settings.redis_url.is_none());
    }

    #[test]
    fn test_malformed_values_are_errors() {
        let bad_store = CacheSettings::from_lookup(lookup_from(&[(ENV_STORE, "memcached")]));
        assert!(matches!(bad_store, Err(SettingsError::InvalidValue { var: ENV_STORE, .. })));

        let bad_size = CacheSettings::from_lookup(lookup_from(&[
            (ENV_STORE, "memory"),
            (ENV_CHUNK_SIZE, "big"),
        ]));
        assert!(matches!(bad_size, Err(SettingsError::InvalidValue { var: ENV_CHUNK_SIZE, .. })));

        let zero = CacheSettings::from_lookup(lookup_from(&[
            (ENV_STORE, "memory"),
            (ENV_CHUNK_SIZE, "0"),
        ]));
        assert_eq!(zero, Err(SettingsError::ZeroChunkSize));
    }

    #[test]
    fn test_settings_deserialize_with_defaults() {
        let settings: CacheSettings =
            serde_json::from_str(r#"{"store":"memory","cache_partial_streams":false}"#).unwrap();
        assert_eq!(settings.store, StoreBackend::Memory);
        assert!(!settings.cache_partial_streams);
        assert_eq!(settings.default_chunk_size, DEFAULT_CHUNK_SIZE);
    }
}
