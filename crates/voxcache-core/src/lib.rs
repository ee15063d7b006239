#![doc = include_str!(concat!(env!("OUT_DIR"), "/README_GENERATED.md"))]
#![deny(unused_crate_dependencies)]

pub mod domain;
pub mod ports;
pub mod settings;

// Re-export commonly used types for convenience
pub use domain::{
    AudioEncoding, BackendKind, BotSentiment, ChunkRecord, ChunkStream, CutoffEstimator,
    FillerAudio, FillerAudioConfig, SynthesisRequest, SynthesisResult, VoiceConfig,
    chunk_size_per_second,
};
pub use ports::{AudioStore, CoreError, StoreError, SynthesisError, Synthesizer};
pub use settings::{
    CacheSettings, DEFAULT_CHUNK_SIZE, SettingsError, StoreBackend, StripScope, validate_settings,
};
