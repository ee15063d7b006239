//! Main CLI parser and top-level argument handling.
//!
//! This module defines the root CLI structure with global options.

use clap::{Args, Parser};

use crate::commands::Commands;

/// Command-line interface for the voxcache audio cache.
#[derive(Parser)]
#[command(name = "voxcache")]
#[command(about = "Cache synthesized speech and replay it on repeat requests")]
#[command(version)]
pub struct Cli {
    #[command(flatten)]
    pub voice: VoiceArgs,

    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Voice selection shared by every command.
///
/// The voice is part of the cache key, so `key`, `check` and `speak` must be
/// given the same voice to agree on an entry.
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct VoiceArgs {
    /// Voice name for the tone backend
    #[arg(long, global = true, env = "VOXCACHE_VOICE")]
    pub voice: Option<String>,

    /// Output sampling rate in Hz
    #[arg(long, global = true, default_value_t = 16_000, env = "VOXCACHE_SAMPLING_RATE")]
    pub sampling_rate: u32,

    /// Frame every chunk as a standalone WAV file
    #[arg(long, global = true)]
    pub wav_chunks: bool,
}
