use bytes::Bytes;
use sha2::{Digest, Sha256};
use tracing::debug;
use weft_core::{Event, Handler, Transformer};

use crate::body::BodyBuffer;
use crate::header::HeaderMap;
use crate::protocol::{Http, HttpOutcome, HttpPipeline, Part};
use crate::response::ResponseHead;

/// Adds a strong entity tag to successful `GET`/`HEAD` responses and
/// answers conditional requests with `304 Not Modified`.
///
/// The tag is the SHA-256 of the response body, so the response parts are
/// held back until the downstream tail part arrives. Responses that are not
/// eligible (other methods, non-200 status, or an `etag` already set) pass
/// through without buffering.
#[derive(Debug, Clone, Default)]
pub struct ETag {
    eligible: bool,
    if_none_match: Option<String>,
    capture: Capture,
}

#[derive(Debug, Clone, Default)]
enum Capture {
    #[default]
    Waiting,
    Buffering {
        head: ResponseHead,
        body: BodyBuffer,
    },
    Passthrough,
}

impl ETag {
    pub fn new() -> Self {
        Self::default()
    }

    fn capture(&mut self, parts: Vec<Part>) -> Vec<Part> {
        let mut out = Vec::with_capacity(parts.len());
        for part in parts {
            match part {
                Part::Head(head) if matches!(self.capture, Capture::Waiting) => {
                    if self.eligible && head.status == 200 && !head.headers.contains("etag") {
                        self.capture = Capture::Buffering {
                            head,
                            body: BodyBuffer::new(),
                        };
                    } else {
                        self.capture = Capture::Passthrough;
                        out.push(Part::Head(head));
                    }
                }
                Part::Data(data) => match &mut self.capture {
                    Capture::Buffering { body, .. } => body.push(data),
                    _ => out.push(Part::Data(data)),
                },
                Part::Tail(trailers) => {
                    match std::mem::replace(&mut self.capture, Capture::Passthrough) {
                        Capture::Buffering { head, mut body } => {
                            out.extend(self.finish(head, body.take(), trailers));
                        }
                        other => {
                            self.capture = other;
                            out.push(Part::Tail(trailers));
                        }
                    }
                }
                part => out.push(part),
            }
        }
        out
    }

    fn finish(&self, mut head: ResponseHead, body: Bytes, trailers: HeaderMap) -> Vec<Part> {
        let tag = entity_tag(&body);
        if self.if_none_match.as_deref().is_some_and(|v| matches_tag(v, &tag)) {
            debug!(etag = %tag, "conditional request matched, answering 304");
            return vec![
                Part::Head(ResponseHead::new(304).with_header("etag", tag)),
                Part::Tail(trailers),
            ];
        }
        head.headers.set("etag", tag);
        let mut parts = vec![Part::Head(head)];
        if !body.is_empty() {
            parts.push(Part::Data(body));
        }
        parts.push(Part::Tail(trailers));
        parts
    }
}

impl Transformer<Http> for ETag {
    fn process(&mut self, event: Event<Http>, next: &mut HttpPipeline) -> HttpOutcome {
        if let Event::Head(head) = &event {
            self.eligible = matches!(head.method.as_str(), "GET" | "HEAD");
            self.if_none_match = head.headers.get("if-none-match").map(str::to_string);
        }
        let parts = next.handle(event)?;
        Ok(self.capture(parts))
    }

    fn name(&self) -> &str {
        "etag"
    }
}

/// Quoted hex SHA-256 of `body`.
pub fn entity_tag(body: &[u8]) -> String {
    format!("\"{}\"", hex::encode(Sha256::digest(body)))
}

/// `If-None-Match` comparison; weak validators compare by their opaque tag.
fn matches_tag(header: &str, tag: &str) -> bool {
    header.split(',').map(str::trim).any(|candidate| {
        candidate == "*" || candidate.strip_prefix("W/").unwrap_or(candidate) == tag
    })
}
