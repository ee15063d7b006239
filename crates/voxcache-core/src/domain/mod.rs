//! Audio synthesis domain types.
//!
//! Pure data shapes shared by backends, the cache layer and adapters.
//! Nothing in here performs I/O.

mod chunk;
mod filler;
mod request;
mod voice;

pub use chunk::{ChunkRecord, ChunkStream, CutoffEstimator, SynthesisResult};
pub use filler::{FillerAudio, FillerAudioConfig};
pub use request::{BotSentiment, SynthesisRequest};
pub use voice::{AudioEncoding, BackendKind, VoiceConfig, chunk_size_per_second};
