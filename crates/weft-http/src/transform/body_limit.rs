use bytes::Bytes;
use tracing::warn;
use weft_core::{Handler, Transformer};

use crate::error::Error;
use crate::header::HeaderMap;
use crate::protocol::{Http, HttpOutcome, HttpPipeline, Info};
use crate::request::RequestHead;
use crate::response::Response;

/// Caps the size of a request body.
///
/// A declared `content-length` over the limit is answered with `413`
/// straight away and nothing of the exchange reaches the rest of the stack.
/// A body that streams past the limit without declaring it fails the
/// exchange with [`Error::BodyTooLarge`].
#[derive(Debug, Clone)]
pub struct BodyLimit {
    limit: u64,
    received: u64,
    rejected: bool,
}

impl BodyLimit {
    pub fn new(limit: u64) -> Self {
        Self {
            limit,
            received: 0,
            rejected: false,
        }
    }
}

impl Transformer<Http> for BodyLimit {
    fn process_head(&mut self, head: RequestHead, next: &mut HttpPipeline) -> HttpOutcome {
        match head.content_length()? {
            Some(declared) if declared > self.limit => {
                warn!(declared, limit = self.limit, path = %head.path, "rejecting oversized request");
                self.rejected = true;
                Ok(Response::status_text(413).into_parts())
            }
            _ => next.handle_head(head),
        }
    }

    fn process_data(&mut self, data: Bytes, next: &mut HttpPipeline) -> HttpOutcome {
        if self.rejected {
            return Ok(Vec::new());
        }
        self.received += data.len() as u64;
        if self.received > self.limit {
            return Err(Error::BodyTooLarge { limit: self.limit });
        }
        next.handle_data(data)
    }

    fn process_tail(&mut self, tail: HeaderMap, next: &mut HttpPipeline) -> HttpOutcome {
        if self.rejected {
            return Ok(Vec::new());
        }
        next.handle_tail(tail)
    }

    fn process_info(&mut self, info: Info, next: &mut HttpPipeline) -> HttpOutcome {
        if self.rejected {
            return Ok(Vec::new());
        }
        next.handle_info(info)
    }

    fn name(&self) -> &str {
        "body_limit"
    }
}
