//! Fixed-size re-chunking of a response body stream.
//!
//! The network delivers frames of arbitrary size. Progress is counted in
//! chunks of exactly `chunk_size` bytes (the final one may be shorter), so
//! frames are buffered and re-sliced in arrival order.

use futures_util::{Stream, StreamExt};

pub(crate) struct FixedChunks<S> {
    stream: S,
    buffer: Vec<u8>,
    chunk_size: usize,
    exhausted: bool,
}

impl<S, B, E> FixedChunks<S>
where
    S: Stream<Item = Result<B, E>> + Unpin,
    B: AsRef<[u8]>,
{
    /// `chunk_size` must be non-zero.
    pub(crate) fn new(stream: S, chunk_size: usize) -> Self {
        debug_assert!(chunk_size > 0, "chunk size must be non-zero");
        Self {
            stream,
            buffer: Vec::with_capacity(chunk_size),
            chunk_size,
            exhausted: false,
        }
    }

    /// Returns the next non-empty chunk, `None` at end of body.
    ///
    /// A stream error is returned as soon as it is seen; buffered bytes
    /// that were never yielded are discarded with it.
    pub(crate) async fn next_chunk(&mut self) -> Option<Result<Vec<u8>, E>> {
        loop {
            if self.buffer.len() >= self.chunk_size {
                let rest = self.buffer.split_off(self.chunk_size);
                return Some(Ok(std::mem::replace(&mut self.buffer, rest)));
            }
            if self.exhausted {
                if self.buffer.is_empty() {
                    return None;
                }
                return Some(Ok(std::mem::take(&mut self.buffer)));
            }
            match self.stream.next().await {
                Some(Ok(frame)) => self.buffer.extend_from_slice(frame.as_ref()),
                Some(Err(error)) => {
                    self.exhausted = true;
                    self.buffer.clear();
                    return Some(Err(error));
                }
                None => self.exhausted = true,
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use futures_util::stream;

    async fn collect(frames: Vec<Vec<u8>>, chunk_size: usize) -> Vec<Vec<u8>> {
        let body = stream::iter(frames.into_iter().map(Ok::<_, std::io::Error>));
        let mut chunks = FixedChunks::new(body, chunk_size);
        let mut out = Vec::new();
        while let Some(chunk) = chunks.next_chunk().await {
            out.push(chunk.unwrap());
        }
        out
    }

    #[tokio::test]
    async fn test_small_frames_are_merged() {
        let frames = vec![vec![1u8; 3], vec![2u8; 3], vec![3u8; 3]];
        let chunks = collect(frames, 4).await;
        let sizes: Vec<usize> = chunks.iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![4, 4, 1]);
        assert_eq!(chunks.concat(), [vec![1u8; 3], vec![2u8; 3], vec![3u8; 3]].concat());
    }

    #[tokio::test]
    async fn test_large_frame_is_split() {
        let chunks = collect(vec![vec![7u8; 20_000]], 8192).await;
        let sizes: Vec<usize> = chunks.iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![8192, 8192, 3616]);
    }

    #[tokio::test]
    async fn test_exact_multiple_has_no_trailing_chunk() {
        let chunks = collect(vec![vec![0u8; 10_000], vec![0u8; 6384]], 8192).await;
        assert_eq!(chunks.len(), 2);
        assert!(chunks.iter().all(|c| c.len() == 8192));
    }

    #[tokio::test]
    async fn test_empty_frames_and_body_yield_nothing() {
        assert!(collect(vec![], 8192).await.is_empty());
        assert!(collect(vec![vec![], vec![]], 8192).await.is_empty());
    }

    #[tokio::test]
    async fn test_stream_error_is_surfaced_once() {
        let frames: Vec<Result<Vec<u8>, std::io::Error>> = vec![
            Ok(vec![1u8; 10]),
            Err(std::io::Error::other("connection reset")),
            Ok(vec![2u8; 10]),
        ];
        let mut chunks = FixedChunks::new(stream::iter(frames), 4);
        assert_eq!(chunks.next_chunk().await.unwrap().unwrap(), vec![1u8; 4]);
        assert_eq!(chunks.next_chunk().await.unwrap().unwrap(), vec![1u8; 4]);
        assert!(chunks.next_chunk().await.unwrap().is_err());
        assert!(chunks.next_chunk().await.is_none());
    }
}
