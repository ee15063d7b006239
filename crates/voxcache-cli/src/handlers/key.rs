//! Key command handler.

use anyhow::Result;

use crate::bootstrap::CliContext;

/// Print the cache key `text` maps to for the selected voice.
pub fn execute(ctx: &CliContext, text: &str) -> Result<()> {
    println!("{}", ctx.synth().cache_key(text));
    Ok(())
}
