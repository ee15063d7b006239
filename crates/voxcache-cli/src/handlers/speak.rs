//! Speak command handler.
//!
//! Synthesizes through the cache, reassembles the chunks into one WAV file
//! and reports how the cache served the request.

use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use bytes::BytesMut;
use futures_util::StreamExt;
use voxcache_core::{SynthesisRequest, Synthesizer};
use voxcache_synth::{CacheStatsSnapshot, WAV_HEADER_LEN, encode_as_wav};

use crate::bootstrap::CliContext;
use crate::error::CliError;

/// Upper bound on waiting for a detached cache write before exiting.
const WRITE_SETTLE_TIMEOUT: Duration = Duration::from_secs(2);

/// Result of a speak run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeakOutcome {
    /// Size of the written WAV file.
    pub bytes_written: usize,
    /// Chunks received in the last round.
    pub chunks: usize,
    pub stats: CacheStatsSnapshot,
}

/// Execute the speak command.
pub async fn execute(
    ctx: &CliContext,
    text: &str,
    output: &Path,
    chunk_size: Option<usize>,
    repeat: u32,
) -> Result<()> {
    let outcome = speak(ctx, text, output, chunk_size, repeat).await?;

    println!(
        "Wrote {} bytes ({} chunks) to {}",
        outcome.bytes_written,
        outcome.chunks,
        output.display()
    );
    println!(
        "Cache: {} hit(s), {} miss(es), {} write(s), {} failed write(s)",
        outcome.stats.hits, outcome.stats.misses, outcome.stats.writes, outcome.stats.write_failures
    );
    Ok(())
}

/// Synthesize `text` `repeat` times and write the last rendition to `output`.
pub async fn speak(
    ctx: &CliContext,
    text: &str,
    output: &Path,
    chunk_size: Option<usize>,
    repeat: u32,
) -> Result<SpeakOutcome, CliError> {
    if repeat == 0 {
        return Err(CliError::Arguments("--repeat must be at least 1".into()));
    }
    let request = SynthesisRequest::new(text, chunk_size.unwrap_or(ctx.default_chunk_size()));
    let config = ctx.synth().synthesizer_config();
    let header_len = if config.should_encode_as_wav {
        WAV_HEADER_LEN
    } else {
        0
    };

    let mut pcm = BytesMut::new();
    let mut chunks = 0;
    for round in 1..=repeat {
        let before = ctx.synth().stats();
        let mut stream = ctx.synth().create_speech(&request).await?.chunks;

        pcm.clear();
        chunks = 0;
        while let Some(record) = stream.next().await {
            let record = record?;
            let skip = header_len.min(record.payload.len());
            pcm.extend_from_slice(&record.payload[skip..]);
            chunks += 1;
        }
        drop(stream);

        let missed = ctx.synth().stats().misses > before.misses;
        tracing::debug!(round, chunks, cached = !missed, "Synthesis round done");
        if missed {
            settle_write(ctx, &before).await;
        }
    }

    let wav = encode_as_wav(&pcm, config.sampling_rate);
    tokio::fs::write(output, &wav).await?;

    Ok(SpeakOutcome {
        bytes_written: wav.len(),
        chunks,
        stats: ctx.synth().stats(),
    })
}

/// Wait for the write-back of a missed request to finish.
///
/// The write runs on a detached task; returning from `main` first would drop
/// it.
async fn settle_write(ctx: &CliContext, before: &CacheStatsSnapshot) {
    let done = |now: CacheStatsSnapshot| {
        now.writes + now.write_failures > before.writes + before.write_failures
    };
    let waited = tokio::time::timeout(WRITE_SETTLE_TIMEOUT, async {
        while !done(ctx.synth().stats()) {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await;

    if waited.is_err() {
        tracing::warn!("Cache write still pending, exiting without it");
    }
}
