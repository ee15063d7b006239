//! CLI-specific error types and mappings.
//!
//! This module provides error types for the CLI adapter and mappings
//! from CoreError to exit codes and user-facing messages.

use thiserror::Error;
use voxcache_core::{CoreError, StoreError, SynthesisError};

/// CLI-specific error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Synthesis failed.
    #[error("{0}")]
    Synthesis(String),

    /// Argument parsing error.
    #[error("Invalid arguments: {0}")]
    Arguments(String),

    /// IO error (file not found, permission denied, etc.).
    #[error("IO error: {0}")]
    Io(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The audio store is unreachable or failed.
    #[error("Store error: {0}")]
    Store(String),
}

impl CliError {
    /// Map error to appropriate exit code.
    ///
    /// Exit codes follow Unix conventions:
    /// - 0: Success
    /// - 1: General error
    /// - 2: Misuse of shell command (invalid arguments)
    /// - 64-78: Reserved for specific error categories (see sysexits.h)
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Synthesis(_) => 1,
            Self::Arguments(_) => 2, // EX_USAGE
            Self::Store(_) => 69,    // EX_UNAVAILABLE
            Self::Io(_) => 74,       // EX_IOERR
            Self::Config(_) => 78,   // EX_CONFIG
        }
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Synthesis(e) => e.into(),
            CoreError::Store(e) => e.into(),
            CoreError::Settings(e) => Self::Config(e.to_string()),
            CoreError::Configuration(msg) => Self::Config(msg),
        }
    }
}

impl From<SynthesisError> for CliError {
    fn from(err: SynthesisError) -> Self {
        match err {
            SynthesisError::Unsupported(msg) => Self::Arguments(msg),
            other => Self::Synthesis(other.to_string()),
        }
    }
}

impl From<StoreError> for CliError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotConfigured(msg) | StoreError::InvalidConfig(msg) => Self::Config(msg),
            other => Self::Store(other.to_string()),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}
