#![doc = include_str!(concat!(env!("OUT_DIR"), "/README_GENERATED.md"))]
#![deny(unused_crate_dependencies)]

pub mod backend;
pub mod caching;
pub mod key;
pub mod replay;
pub mod stats;
pub mod tee;
pub mod wav;

pub use backend::ToneSynthesizer;
pub use caching::{CachePolicy, CachingSynthesizer};
pub use key::{CacheKey, derive_key, normalize_text};
pub use replay::{ChunkTransform, ReplayChunks, replay};
pub use stats::{CacheStats, CacheStatsSnapshot};
pub use tee::{FinalMarker, HeaderStrip, StreamEnd, StreamTee, TeeCompletion};
pub use wav::{DecodedWav, WAV_HEADER_LEN, decode_wav, encode_as_wav};
