use bytes::Bytes;

use crate::header::HeaderMap;
use crate::protocol::Part;

/// Default chunk size for breaking buffered bodies into data parts (64 KB).
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// Status line and headers of a response; the first part of every response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseHead {
    pub status: u16,
    pub headers: HeaderMap,
}

impl ResponseHead {
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.set(name, value);
        self
    }

    pub fn reason(&self) -> &'static str {
        reason_phrase(self.status)
    }
}

/// A response with its body fully buffered.
///
/// Use [`into_parts`](Response::into_parts) to turn it into the part
/// sequence a handler returns: one head, the body in
/// [`DEFAULT_CHUNK_SIZE`] data chunks, and an empty tail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub head: ResponseHead,
    pub body: Bytes,
}

impl Response {
    /// A response with an empty body and `content-length: 0`.
    pub fn new(status: u16) -> Self {
        Self {
            head: ResponseHead::new(status).with_header("content-length", "0"),
            body: Bytes::new(),
        }
    }

    /// A `text/plain` response.
    pub fn text(status: u16, body: impl Into<String>) -> Self {
        let body: String = body.into();
        Self::new(status)
            .with_header("content-type", "text/plain; charset=utf-8")
            .with_body(body)
    }

    /// A `text/plain` response whose body is the status's reason phrase.
    pub fn status_text(status: u16) -> Self {
        Self::text(status, reason_phrase(status))
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.head.headers.set(name, value);
        self
    }

    /// Replace the body and update `content-length` to match.
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self.head
            .headers
            .set("content-length", self.body.len().to_string());
        self
    }

    pub fn status(&self) -> u16 {
        self.head.status
    }

    pub fn into_parts(self) -> Vec<Part> {
        self.into_parts_chunked(DEFAULT_CHUNK_SIZE)
    }

    /// Like [`into_parts`](Response::into_parts) with a custom chunk size.
    pub fn into_parts_chunked(self, chunk_size: usize) -> Vec<Part> {
        let mut parts = vec![Part::Head(self.head)];
        parts.extend(Chunks::new(self.body, chunk_size).map(Part::Data));
        parts.push(Part::Tail(HeaderMap::new()));
        parts
    }
}

/// Yields a `Bytes` buffer in fixed-size chunks without copying.
///
/// Each chunk is a `Bytes::slice()` of the original allocation.
pub struct Chunks {
    buf: Bytes,
    chunk_size: usize,
    offset: usize,
}

impl Chunks {
    pub fn new(buf: Bytes, chunk_size: usize) -> Self {
        assert!(chunk_size > 0, "chunk_size must be > 0");
        Self {
            buf,
            chunk_size,
            offset: 0,
        }
    }
}

impl Iterator for Chunks {
    type Item = Bytes;

    fn next(&mut self) -> Option<Bytes> {
        if self.offset >= self.buf.len() {
            return None;
        }
        let end = std::cmp::min(self.offset + self.chunk_size, self.buf.len());
        let chunk = self.buf.slice(self.offset..end);
        self.offset = end;
        Some(chunk)
    }
}

/// Canonical reason phrase for the status codes weft produces or logs.
pub fn reason_phrase(status: u16) -> &'static str {
    match status {
        200 => "OK",
        201 => "Created",
        204 => "No Content",
        301 => "Moved Permanently",
        302 => "Found",
        304 => "Not Modified",
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        405 => "Method Not Allowed",
        408 => "Request Timeout",
        413 => "Content Too Large",
        500 => "Internal Server Error",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        504 => "Gateway Timeout",
        _ => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunks_exact_division() {
        let chunks: Vec<Bytes> = Chunks::new(Bytes::from(vec![0xAA; 4096]), 1024).collect();
        assert_eq!(chunks.len(), 4);
        assert!(chunks.iter().all(|c| c.len() == 1024));
    }

    #[test]
    fn chunks_remainder() {
        let chunks: Vec<Bytes> = Chunks::new(Bytes::from(vec![0xBB; 3000]), 1024).collect();
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[2].len(), 952);
    }

    #[test]
    fn chunks_empty_body() {
        assert_eq!(Chunks::new(Bytes::new(), 1024).count(), 0);
    }

    #[test]
    fn chunks_are_zero_copy() {
        let original = Bytes::from(vec![0xFF; 8192]);
        let ptr = original.as_ptr();
        let chunks: Vec<Bytes> = Chunks::new(original, 4096).collect();
        assert_eq!(chunks[0].as_ptr(), ptr);
        assert_eq!(chunks[1].as_ptr(), ptr.wrapping_add(4096));
    }

    #[test]
    #[should_panic(expected = "chunk_size must be > 0")]
    fn chunks_zero_size_panics() {
        let _ = Chunks::new(Bytes::new(), 0);
    }

    #[test]
    fn text_sets_length_and_type() {
        let resp = Response::text(200, "hello");
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.head.headers.get("content-length"), Some("5"));
        assert_eq!(
            resp.head.headers.get("content-type"),
            Some("text/plain; charset=utf-8")
        );
    }

    #[test]
    fn into_parts_head_data_tail() {
        let parts = Response::text(200, "abcdef").into_parts_chunked(4);
        assert_eq!(parts.len(), 4);
        assert!(matches!(&parts[0], Part::Head(head) if head.status == 200));
        assert_eq!(parts[1], Part::Data(Bytes::from_static(b"abcd")));
        assert_eq!(parts[2], Part::Data(Bytes::from_static(b"ef")));
        assert!(matches!(&parts[3], Part::Tail(trailers) if trailers.is_empty()));
    }

    #[test]
    fn empty_body_has_no_data_parts() {
        let parts = Response::new(204).into_parts();
        assert_eq!(parts.len(), 2);
        assert!(matches!(&parts[0], Part::Head(head) if head.headers.get("content-length") == Some("0")));
    }

    #[test]
    fn status_text_uses_reason() {
        let resp = Response::status_text(413);
        assert_eq!(resp.body.as_ref(), b"Content Too Large");
        assert_eq!(resp.head.reason(), "Content Too Large");
        assert_eq!(reason_phrase(299), "");
    }
}
