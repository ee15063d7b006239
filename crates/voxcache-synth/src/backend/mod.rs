//! Built-in synthesizer backends.
//!
//! Vendor backends live outside this workspace and plug in through the
//! [`Synthesizer`](voxcache_core::Synthesizer) trait.

mod tone;

pub use tone::ToneSynthesizer;
