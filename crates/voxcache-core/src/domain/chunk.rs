//! Chunked synthesis output.

use std::fmt;
use std::pin::Pin;
use std::sync::Arc;

use bytes::Bytes;
use futures_util::Stream;

use crate::ports::SynthesisError;

/// One unit of streamed audio with an end-of-stream flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkRecord {
    /// Audio bytes, possibly container-framed.
    pub payload: Bytes,

    /// `true` only on the last record of a stream.
    pub is_final: bool,
}

impl ChunkRecord {
    pub fn new(payload: impl Into<Bytes>, is_final: bool) -> Self {
        Self {
            payload: payload.into(),
            is_final,
        }
    }
}

impl AsRef<[u8]> for ChunkRecord {
    fn as_ref(&self) -> &[u8] {
        &self.payload
    }
}

/// Lazily produced chunk sequence of a single synthesis.
///
/// Production suspends between polls; nothing is read ahead of the consumer.
pub type ChunkStream = Pin<Box<dyn Stream<Item = Result<ChunkRecord, SynthesisError>> + Send>>;

/// Maps "seconds of audio already played" to the prefix of text spoken so far.
pub type CutoffEstimator = Arc<dyn Fn(u32) -> String + Send + Sync>;

/// Output of one synthesis request.
///
/// Not reusable: the chunk stream is consumed once.
pub struct SynthesisResult {
    /// Audio body.
    pub chunks: ChunkStream,

    /// Text cutoff estimator, opaque to the cache layer.
    pub cutoff: CutoffEstimator,
}

impl SynthesisResult {
    pub fn new(chunks: ChunkStream, cutoff: CutoffEstimator) -> Self {
        Self { chunks, cutoff }
    }

    /// Estimate how much of the message was spoken after `seconds`.
    pub fn message_up_to(&self, seconds: u32) -> String {
        (self.cutoff)(seconds)
    }
}

impl fmt::Debug for SynthesisResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SynthesisResult")
            .field("chunks", &"<ChunkStream>")
            .field("cutoff", &"<CutoffEstimator>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::StreamExt;
    use futures_util::stream;

    #[tokio::test]
    async fn test_result_streams_records_in_order() {
        let records = vec![
            Ok(ChunkRecord::new(&b"ab"[..], false)),
            Ok(ChunkRecord::new(&b"c"[..], true)),
        ];
        let result = SynthesisResult::new(
            Box::pin(stream::iter(records)),
            Arc::new(|seconds| format!("{seconds}s")),
        );

        assert_eq!(result.message_up_to(3), "3s");

        let collected: Vec<_> = result.chunks.collect().await;
        let payloads: Vec<_> = collected
            .into_iter()
            .map(|r| r.unwrap().payload)
            .collect();
        assert_eq!(payloads, vec![Bytes::from_static(b"ab"), Bytes::from_static(b"c")]);
    }

    #[test]
    fn test_chunk_record_as_ref_exposes_payload() {
        let record = ChunkRecord::new(vec![1u8, 2, 3], true);
        assert_eq!(record.as_ref(), &[1, 2, 3]);
    }
}
