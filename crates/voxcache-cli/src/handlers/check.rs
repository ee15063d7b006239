//! Check command handler.
//!
//! Looks the text up without synthesizing anything.

use anyhow::Result;

use crate::bootstrap::CliContext;
use crate::error::CliError;

/// Report whether `text` is cached for the selected voice.
pub async fn execute(ctx: &CliContext, text: &str) -> Result<()> {
    let key = ctx.synth().cache_key(text);
    let cached = is_cached(ctx, text).await?;
    println!("{key}: {}", if cached { "cached" } else { "not cached" });
    Ok(())
}

pub async fn is_cached(ctx: &CliContext, text: &str) -> Result<bool, CliError> {
    Ok(ctx.synth().is_cached(text).await?)
}
