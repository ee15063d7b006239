//! Command handlers.
//!
//! Handlers follow the canonical pattern:
//! - Signature: `pub async fn execute(ctx: &CliContext, ...) -> Result<()>`
//! - Thin wrappers that call the cache through [`CliContext`](crate::CliContext)
//!   and format output for the terminal

pub mod check;
pub mod key;
pub mod speak;
