//! Cache key derivation.
//!
//! A key reads as `{backend}_{voice}_{encoding}_{rate}/{text}_{hash}`, e.g.
//! `synthesizer_azure_en-US-Jenny_linear16_16000/hello-world-_3f2a9c1d`.
//! The left half groups entries by voice so a store can be inspected or
//! flushed per voice; the hash disambiguates texts sharing a 32-char prefix.

use std::fmt;

use voxcache_core::VoiceConfig;
use xxhash_rust::xxh3::xxh3_128;

/// Characters of normalized text kept in the readable part of a key.
pub const TEXT_PREFIX_CHARS: usize = 32;

/// Hex characters of the content hash kept in a key.
pub const HASH_PREFIX_LEN: usize = 8;

/// Store key for one (text, voice configuration) pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Fold `text` into its key form.
///
/// Lowercases and trims, then collapses every run of whitespace and
/// punctuation into a single `-`. Alphanumerics and `_` are kept.
///
/// This is lossy: `"Hello, World!"`, `"hello world!"` and `"hello... world?"`
/// all normalize to `hello-world-`.
pub fn normalize_text(text: &str) -> String {
    let lowered = text.to_lowercase();
    let mut out = String::with_capacity(lowered.len());
    let mut in_separator = false;

    for ch in lowered.trim().chars() {
        if ch.is_alphanumeric() || ch == '_' {
            out.push(ch);
            in_separator = false;
        } else if !in_separator {
            out.push('-');
            in_separator = true;
        }
    }
    out
}

/// Derive the cache key for `text` spoken with `config`.
///
/// Pure and deterministic: no I/O, and equal inputs always give equal keys.
///
/// The hash covers the full normalized text and the canonical JSON of
/// `config`, but only 32 bits of it survive in the key. Two different inputs
/// sharing a voice and a 32-char text prefix collide with probability about
/// 2^-32; a collision replays the wrong clip. That risk is accepted.
pub fn derive_key(text: &str, config: &VoiceConfig) -> CacheKey {
    let normalized = normalize_text(text);

    let mut hashed = normalized.clone();
    hashed.push_str(&config.canonical_json());
    let digest = format!("{:032x}", xxh3_128(hashed.as_bytes()));

    let prefix: String = normalized.chars().take(TEXT_PREFIX_CHARS).collect();

    CacheKey(format!(
        "{}_{}_{}_{}/{}_{}",
        config.backend,
        config.voice_identity(),
        config.audio_encoding,
        config.sampling_rate,
        prefix,
        &digest[..HASH_PREFIX_LEN],
    ))
}
