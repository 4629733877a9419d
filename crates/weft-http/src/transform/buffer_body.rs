use bytes::Bytes;
use weft_core::{Handler, Transformer};

use crate::body::BodyBuffer;
use crate::header::HeaderMap;
use crate::protocol::{Http, HttpOutcome, HttpPipeline};

/// Collects the request body and forwards it as a single chunk, right
/// before the tail.
///
/// Useful in front of handlers that want the body in one piece but still
/// speak the streaming contract. Pair it with [`BodyLimit`](super::BodyLimit)
/// to bound memory.
#[derive(Debug, Clone, Default)]
pub struct BufferBody {
    buf: BodyBuffer,
}

impl BufferBody {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Transformer<Http> for BufferBody {
    fn process_data(&mut self, data: Bytes, _next: &mut HttpPipeline) -> HttpOutcome {
        self.buf.push(data);
        Ok(Vec::new())
    }

    fn process_tail(&mut self, tail: HeaderMap, next: &mut HttpPipeline) -> HttpOutcome {
        let mut parts = Vec::new();
        if !self.buf.is_empty() {
            let body = self.buf.take();
            parts.extend(next.handle_data(body)?);
        }
        parts.extend(next.handle_tail(tail)?);
        Ok(parts)
    }

    fn name(&self) -> &str {
        "buffer_body"
    }
}
