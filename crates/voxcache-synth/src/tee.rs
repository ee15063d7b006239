//! Pass-through stream decorator that records what it forwards.
//!
//! [`StreamTee`] forwards every item of its source unchanged while copying the
//! payload bytes into an owned buffer. When the stream ends, either because
//! the source is exhausted or because the consumer drops the tee early, the
//! buffer is handed to a one-shot completion callback.

use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::{Bytes, BytesMut};
use futures_util::Stream;
use futures_util::stream::FusedStream;
use voxcache_core::{ChunkRecord, StripScope};

/// Bytes to drop from the front of chunk payloads before recording them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderStrip {
    pub bytes: usize,
    pub scope: StripScope,
}

impl HeaderStrip {
    /// Record payloads untouched.
    pub const NONE: Self = Self {
        bytes: 0,
        scope: StripScope::EveryChunk,
    };

    pub const fn every_chunk(bytes: usize) -> Self {
        Self {
            bytes,
            scope: StripScope::EveryChunk,
        }
    }

    pub const fn first_chunk(bytes: usize) -> Self {
        Self {
            bytes,
            scope: StripScope::FirstChunk,
        }
    }

    /// Bytes to strip from the chunk at zero-based `index`.
    const fn strip_len(&self, index: usize) -> usize {
        match self.scope {
            StripScope::EveryChunk => self.bytes,
            StripScope::FirstChunk if index == 0 => self.bytes,
            StripScope::FirstChunk => 0,
        }
    }
}

impl Default for HeaderStrip {
    fn default() -> Self {
        Self::NONE
    }
}

/// Item that can mark the end of its stream.
///
/// A tee dropped after forwarding a final item reports
/// [`StreamEnd::Exhausted`]: the consumer saw everything the source had.
pub trait FinalMarker: AsRef<[u8]> {
    fn is_final(&self) -> bool {
        false
    }
}

impl FinalMarker for ChunkRecord {
    fn is_final(&self) -> bool {
        self.is_final
    }
}

impl FinalMarker for Bytes {}

impl FinalMarker for Vec<u8> {}

/// How a teed stream ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamEnd {
    /// The source returned `None`, or the consumer received a final item.
    Exhausted,
    /// The consumer dropped the stream before receiving the last item.
    Closed,
}

/// What a [`StreamTee`] recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeeCompletion {
    /// Concatenated payloads, header-strip applied.
    pub bytes: Bytes,
    /// Number of items forwarded.
    pub chunks: usize,
    pub end: StreamEnd,
}

/// Stream decorator that tees payload bytes into a buffer.
///
/// - Items are forwarded in source order; the tee never polls its source
///   ahead of its own consumer.
/// - `on_complete` fires at most once: with [`StreamEnd::Exhausted`] when the
///   source returns `None` or the tee is dropped after a final item, and with
///   [`StreamEnd::Closed`] when the tee is dropped before that.
/// - An `Err` item is forwarded and disarms the callback, so a failed stream
///   never completes.
pub struct StreamTee<S, F>
where
    F: FnOnce(TeeCompletion),
{
    source: S,
    buffer: BytesMut,
    strip: HeaderStrip,
    chunks: usize,
    on_complete: Option<F>,
    saw_final: bool,
    terminated: bool,
}

impl<S, F> StreamTee<S, F>
where
    F: FnOnce(TeeCompletion),
{
    pub fn new(source: S, strip: HeaderStrip, on_complete: F) -> Self {
        Self {
            source,
            buffer: BytesMut::new(),
            strip,
            chunks: 0,
            on_complete: Some(on_complete),
            saw_final: false,
            terminated: false,
        }
    }

    /// Bytes recorded so far.
    pub fn recorded_len(&self) -> usize {
        self.buffer.len()
    }

    /// Whether the completion callback can still fire.
    pub const fn is_armed(&self) -> bool {
        self.on_complete.is_some()
    }

    fn record<T: FinalMarker>(&mut self, item: &T) {
        if self.on_complete.is_some() {
            let payload = item.as_ref();
            let skip = self.strip.strip_len(self.chunks).min(payload.len());
            self.buffer.extend_from_slice(&payload[skip..]);
        }
        self.saw_final |= item.is_final();
        self.chunks += 1;
    }

    fn disarm(&mut self) {
        self.on_complete = None;
        self.buffer.clear();
    }

    fn complete(&mut self, end: StreamEnd) {
        if let Some(on_complete) = self.on_complete.take() {
            let bytes = std::mem::take(&mut self.buffer).freeze();
            on_complete(TeeCompletion {
                bytes,
                chunks: self.chunks,
                end,
            });
        }
    }
}

// The callback is never pinned; only the source is polled through a pin.
impl<S: Unpin, F: FnOnce(TeeCompletion)> Unpin for StreamTee<S, F> {}

impl<S, T, E, F> Stream for StreamTee<S, F>
where
    S: Stream<Item = Result<T, E>> + Unpin,
    T: FinalMarker,
    F: FnOnce(TeeCompletion),
{
    type Item = Result<T, E>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        if this.terminated {
            return Poll::Ready(None);
        }

        match Pin::new(&mut this.source).poll_next(cx) {
            Poll::Pending => Poll::Pending,
            Poll::Ready(Some(Ok(item))) => {
                this.record(&item);
                Poll::Ready(Some(Ok(item)))
            }
            Poll::Ready(Some(Err(err))) => {
                this.disarm();
                Poll::Ready(Some(Err(err)))
            }
            Poll::Ready(None) => {
                this.terminated = true;
                this.complete(StreamEnd::Exhausted);
                Poll::Ready(None)
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.terminated {
            (0, Some(0))
        } else {
            self.source.size_hint()
        }
    }
}

impl<S, T, E, F> FusedStream for StreamTee<S, F>
where
    S: Stream<Item = Result<T, E>> + Unpin,
    T: FinalMarker,
    F: FnOnce(TeeCompletion),
{
    fn is_terminated(&self) -> bool {
        self.terminated
    }
}

impl<S, F> Drop for StreamTee<S, F>
where
    F: FnOnce(TeeCompletion),
{
    fn drop(&mut self) {
        let end = if self.saw_final {
            StreamEnd::Exhausted
        } else {
            StreamEnd::Closed
        };
        self.complete(end);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::StreamExt;
    use futures_util::stream;
    use std::sync::{Arc, Mutex};
    use tokio_stream::wrappers::ReceiverStream;
    use tokio_test::{assert_pending, assert_ready, task};

    type Chunk = Result<Vec<u8>, String>;

    fn recorder() -> (
        Arc<Mutex<Vec<TeeCompletion>>>,
        impl FnOnce(TeeCompletion) + Send + 'static,
    ) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        (seen, move |c| sink.lock().unwrap().push(c))
    }

    fn source(chunks: &[&[u8]]) -> impl Stream<Item = Chunk> + Unpin {
        stream::iter(chunks.iter().map(|c| Ok(c.to_vec())).collect::<Vec<_>>())
    }

    #[tokio::test]
    async fn test_forwards_and_records_full_stream() {
        let (seen, on_complete) = recorder();
        let tee = StreamTee::new(source(&[b"abcd", b"ef"]), HeaderStrip::NONE, on_complete);

        let forwarded: Vec<_> = tee.map(Result::unwrap).collect().await;
        assert_eq!(forwarded, vec![b"abcd".to_vec(), b"ef".to_vec()]);

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].bytes, Bytes::from_static(b"abcdef"));
        assert_eq!(seen[0].chunks, 2);
        assert_eq!(seen[0].end, StreamEnd::Exhausted);
    }

    #[tokio::test]
    async fn test_completion_fires_once() {
        let (seen, on_complete) = recorder();
        let mut tee = StreamTee::new(source(&[b"x"]), HeaderStrip::NONE, on_complete);

        while tee.next().await.is_some() {}
        assert!(tee.is_terminated());
        assert!(tee.next().await.is_none());
        drop(tee);

        assert_eq!(seen.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_early_drop_reports_prefix() {
        let (seen, on_complete) = recorder();
        let mut tee = StreamTee::new(
            source(&[b"one", b"two", b"three"]),
            HeaderStrip::NONE,
            on_complete,
        );

        assert_eq!(tee.next().await.unwrap().unwrap(), b"one");
        assert_eq!(tee.recorded_len(), 3);
        drop(tee);

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].bytes, Bytes::from_static(b"one"));
        assert_eq!(seen[0].end, StreamEnd::Closed);
    }

    #[tokio::test]
    async fn test_drop_after_final_record_reports_exhausted() {
        let (seen, on_complete) = recorder();
        let records = vec![
            Ok::<_, String>(ChunkRecord::new(&b"ab"[..], false)),
            Ok(ChunkRecord::new(&b"cd"[..], true)),
        ];
        let mut tee = StreamTee::new(stream::iter(records), HeaderStrip::NONE, on_complete);

        while let Some(record) = tee.next().await {
            if record.unwrap().is_final {
                break;
            }
        }
        assert!(!tee.is_terminated());
        drop(tee);

        let seen = seen.lock().unwrap();
        assert_eq!(seen[0].bytes, Bytes::from_static(b"abcd"));
        assert_eq!(seen[0].end, StreamEnd::Exhausted);
    }

    #[tokio::test]
    async fn test_drop_before_first_poll_reports_empty() {
        let (seen, on_complete) = recorder();
        let tee = StreamTee::new(source(&[b"never"]), HeaderStrip::NONE, on_complete);
        drop(tee);

        let seen = seen.lock().unwrap();
        assert_eq!(seen[0].bytes, Bytes::new());
        assert_eq!(seen[0].chunks, 0);
        assert_eq!(seen[0].end, StreamEnd::Closed);
    }

    #[tokio::test]
    async fn test_strip_every_chunk() {
        let (seen, on_complete) = recorder();
        let tee = StreamTee::new(
            source(&[b"HHab", b"HHcd", b"H"]),
            HeaderStrip::every_chunk(2),
            on_complete,
        );

        let forwarded: Vec<_> = tee.map(Result::unwrap).collect().await;
        // Consumers still see the framed chunks
        assert_eq!(forwarded[0], b"HHab");
        assert_eq!(seen.lock().unwrap()[0].bytes, Bytes::from_static(b"abcd"));
    }

    #[tokio::test]
    async fn test_strip_first_chunk_only() {
        let (seen, on_complete) = recorder();
        let tee = StreamTee::new(
            source(&[b"HHab", b"HHcd"]),
            HeaderStrip::first_chunk(2),
            on_complete,
        );

        let _: Vec<_> = tee.collect().await;
        assert_eq!(seen.lock().unwrap()[0].bytes, Bytes::from_static(b"abHHcd"));
    }

    #[tokio::test]
    async fn test_error_disarms_completion() {
        let (seen, on_complete) = recorder();
        let items: Vec<Chunk> = vec![Ok(b"ok".to_vec()), Err("boom".into()), Ok(b"late".to_vec())];
        let mut tee = StreamTee::new(stream::iter(items), HeaderStrip::NONE, on_complete);

        assert!(tee.next().await.unwrap().is_ok());
        assert_eq!(tee.next().await.unwrap().unwrap_err(), "boom");
        assert!(!tee.is_armed());
        // Items after the error still flow through
        assert_eq!(tee.next().await.unwrap().unwrap(), b"late");
        assert!(tee.next().await.is_none());
        drop(tee);

        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn test_never_reads_ahead_of_consumer() {
        let (tx, rx) = tokio::sync::mpsc::channel::<Chunk>(4);
        let (seen, on_complete) = recorder();
        let mut tee = task::spawn(StreamTee::new(
            ReceiverStream::new(rx),
            HeaderStrip::NONE,
            on_complete,
        ));

        assert_pending!(tee.poll_next());

        tx.try_send(Ok(b"a".to_vec())).unwrap();
        tx.try_send(Ok(b"b".to_vec())).unwrap();
        assert!(tee.is_woken());

        let first = assert_ready!(tee.poll_next());
        assert_eq!(first.unwrap().unwrap(), b"a");
        // "b" is queued in the channel but not yet pulled
        assert_eq!(tee.recorded_len(), 1);

        let second = assert_ready!(tee.poll_next());
        assert_eq!(second.unwrap().unwrap(), b"b");

        drop(tx);
        assert!(assert_ready!(tee.poll_next()).is_none());
        assert_eq!(seen.lock().unwrap()[0].bytes, Bytes::from_static(b"ab"));
    }
}
