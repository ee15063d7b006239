//! Replay of a cached buffer as a chunk stream.

use bytes::Bytes;
use futures_util::stream;
use voxcache_core::{ChunkRecord, ChunkStream, SynthesisError, VoiceConfig};

use crate::wav::encode_as_wav;

/// Per-chunk framing applied on replay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkTransform {
    /// Emit raw slices.
    Identity,
    /// Wrap every slice in its own PCM16 mono WAV header.
    Wav { sampling_rate: u32 },
}

impl ChunkTransform {
    /// The framing a backend with `config` applies to its live chunks.
    pub const fn for_config(config: &VoiceConfig) -> Self {
        if config.should_encode_as_wav {
            Self::Wav {
                sampling_rate: config.sampling_rate,
            }
        } else {
            Self::Identity
        }
    }

    pub fn apply(self, slice: Bytes) -> Bytes {
        match self {
            Self::Identity => slice,
            Self::Wav { sampling_rate } => encode_as_wav(&slice, sampling_rate),
        }
    }
}

/// Iterator over the chunk records of a cached buffer.
///
/// Cloning restarts from the clone point; slicing is zero-copy.
#[derive(Debug, Clone)]
pub struct ReplayChunks {
    raw: Bytes,
    chunk_size: usize,
    offset: usize,
    transform: ChunkTransform,
}

impl ReplayChunks {
    /// Wrap as a [`ChunkStream`]. Replay never fails.
    pub fn into_stream(self) -> ChunkStream {
        Box::pin(stream::iter(self.map(Ok::<_, SynthesisError>)))
    }
}

impl Iterator for ReplayChunks {
    type Item = ChunkRecord;

    fn next(&mut self) -> Option<ChunkRecord> {
        if self.offset >= self.raw.len() {
            return None;
        }
        let end = self.offset.saturating_add(self.chunk_size).min(self.raw.len());
        let slice = self.raw.slice(self.offset..end);
        self.offset = end;

        Some(ChunkRecord::new(
            self.transform.apply(slice),
            end == self.raw.len(),
        ))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.raw.len() - self.offset).div_ceil(self.chunk_size);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for ReplayChunks {}

impl std::iter::FusedIterator for ReplayChunks {}

/// Split `raw` into records of `chunk_size` bytes (the last may be shorter).
///
/// Exactly the last record is final. An empty buffer yields no records; a
/// `chunk_size` of 0 yields the whole buffer as one record.
pub fn replay(raw: Bytes, chunk_size: usize, transform: ChunkTransform) -> ReplayChunks {
    let chunk_size = if chunk_size == 0 {
        raw.len().max(1)
    } else {
        chunk_size
    };
    ReplayChunks {
        raw,
        chunk_size,
        offset: 0,
        transform,
    }
}
