use bytes::{Bytes, BytesMut};

/// A body collected from streamed chunks.
///
/// Chunks are kept as received and only joined when the body is taken, so
/// cloning a half-read body copies a list of handles, not the bytes.
#[derive(Debug, Clone, Default)]
pub(crate) struct BodyBuffer {
    chunks: Vec<Bytes>,
    len: usize,
}

impl BodyBuffer {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, chunk: Bytes) {
        if chunk.is_empty() {
            return;
        }
        self.len += chunk.len();
        self.chunks.push(chunk);
    }

    /// Total bytes received so far.
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Join the chunks into one buffer and leave this one empty.
    pub(crate) fn take(&mut self) -> Bytes {
        let len = std::mem::take(&mut self.len);
        let mut chunks = std::mem::take(&mut self.chunks);
        if chunks.len() == 1 {
            return chunks.swap_remove(0);
        }
        let mut joined = BytesMut::with_capacity(len);
        for chunk in chunks {
            joined.extend_from_slice(&chunk);
        }
        joined.freeze()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn take_joins_chunks_in_order() {
        let mut body = BodyBuffer::new();
        for chunk in ["ab", "", "cde"] {
            body.push(Bytes::from(chunk));
        }
        assert_eq!(body.len(), 5);
        assert_eq!(body.take(), Bytes::from("abcde"));
        assert!(body.is_empty());
        assert!(body.take().is_empty());
    }

    #[test]
    fn single_chunk_is_returned_without_copy() {
        let chunk = Bytes::from(vec![7u8; 64]);
        let mut body = BodyBuffer::new();
        body.push(chunk.clone());
        assert_eq!(body.take().as_ptr(), chunk.as_ptr());
    }

    #[test]
    fn clone_is_independent() {
        let mut body = BodyBuffer::new();
        body.push(Bytes::from("a"));
        let snapshot = body.clone();
        body.push(Bytes::from("b"));
        assert_eq!(snapshot.len(), 1);
        assert_eq!(body.take(), Bytes::from("ab"));
    }
}
