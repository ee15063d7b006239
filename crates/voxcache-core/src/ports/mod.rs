//! Port definitions (trait abstractions) for external systems.
//!
//! Ports define the interfaces that the cache layer expects from
//! infrastructure. They contain no implementation details and use only
//! domain types.
//!
//! # Design Rules
//!
//! - No redis or vendor SDK types in any signature
//! - Store values are opaque bytes; the store never interprets them
//! - Backends expose audio as a lazy [`ChunkStream`](crate::ChunkStream)

pub mod audio_store;
pub mod synthesizer;

use thiserror::Error;

pub use audio_store::AudioStore;
pub use synthesizer::{Synthesizer, cutoff_by_output_length, cutoff_by_voice_speed};

/// Errors raised by a synthesis backend.
///
/// These propagate to the caller unchanged; the cache layer never converts a
/// backend failure into a cache hit or swallows it.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SynthesisError {
    /// The backend rejected the request or failed while producing audio.
    #[error("Synthesis backend error: {0}")]
    Backend(String),

    /// Input audio could not be decoded (e.g. malformed WAV).
    #[error("Invalid audio: {0}")]
    InvalidAudio(String),

    /// The backend does not support the requested operation or format.
    #[error("Unsupported: {0}")]
    Unsupported(String),

    /// The backend is not ready to serve requests.
    #[error("Synthesizer not ready")]
    NotReady,
}

/// Errors raised by an [`AudioStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    /// No store was configured where one is required.
    #[error("Audio store not configured: {0}")]
    NotConfigured(String),

    /// The store could not be reached.
    #[error("Audio store connection failed: {0}")]
    Connection(String),

    /// The store returned an error for a command.
    #[error("Audio store error: {0}")]
    Backend(String),

    /// Store configuration is malformed (bad URL, bad scheme).
    #[error("Invalid store configuration: {0}")]
    InvalidConfig(String),
}

/// Core error type for semantic domain errors.
///
/// Adapters map this to their own error types (CLI exit codes, HTTP statuses).
#[derive(Debug, Error)]
pub enum CoreError {
    /// Synthesis operation failed.
    #[error(transparent)]
    Synthesis(#[from] SynthesisError),

    /// Store operation failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Settings validation error.
    #[error(transparent)]
    Settings(#[from] crate::settings::SettingsError),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Configuration(String),
}
