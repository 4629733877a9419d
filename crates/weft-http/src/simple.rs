//! A terminal handler for request/response style business logic.

use bytes::Bytes;
use tracing::{debug, warn};
use weft_core::Handler;

use crate::body::BodyBuffer;
use crate::error::{Error, Result};
use crate::header::HeaderMap;
use crate::protocol::{Http, HttpOutcome};
use crate::request::{Request, RequestHead};
use crate::response::Response;

/// Default cap on a buffered request body (8 MiB).
pub const DEFAULT_MAX_BODY: usize = 8 * 1024 * 1024;

/// Buffers the whole request, then calls a function with it.
///
/// The response is produced on the tail event, as one head part, the body
/// in data chunks, and an empty tail. A body larger than the limit is
/// answered with `413` as soon as the limit is crossed; the rest of the
/// exchange is then discarded.
#[derive(Clone)]
pub struct Simple<F> {
    handler: F,
    max_body: usize,
    state: State,
}

#[derive(Clone)]
enum State {
    Idle,
    Reading { head: RequestHead, body: BodyBuffer },
    Rejected,
    Done,
}

impl<F> Simple<F>
where
    F: FnMut(Request) -> Result<Response> + Send,
{
    pub fn new(handler: F) -> Self {
        Self {
            handler,
            max_body: DEFAULT_MAX_BODY,
            state: State::Idle,
        }
    }

    pub fn with_max_body(mut self, max_body: usize) -> Self {
        self.max_body = max_body;
        self
    }

    fn reject(&mut self, received: usize) -> HttpOutcome {
        warn!(received, limit = self.max_body, "request body too large");
        self.state = State::Rejected;
        Ok(Response::status_text(413).into_parts())
    }
}

impl<F> Handler<Http> for Simple<F>
where
    F: FnMut(Request) -> Result<Response> + Send + Clone,
{
    fn handle_head(&mut self, head: RequestHead) -> HttpOutcome {
        if !matches!(self.state, State::Idle) {
            return Err(out_of_order("head", "exchange already started"));
        }
        let declared = head.content_length()?;
        if let Some(declared) = declared.filter(|len| *len > self.max_body as u64) {
            return self.reject(declared as usize);
        }
        debug!(method = %head.method, path = %head.path, "buffering request");
        self.state = State::Reading {
            head,
            body: BodyBuffer::new(),
        };
        Ok(Vec::new())
    }

    fn handle_data(&mut self, data: Bytes) -> HttpOutcome {
        match &mut self.state {
            State::Reading { body, .. } => {
                let received = body.len().saturating_add(data.len());
                if received > self.max_body {
                    return self.reject(received);
                }
                body.push(data);
                Ok(Vec::new())
            }
            State::Rejected => Ok(Vec::new()),
            State::Idle => Err(out_of_order("data", "no head received")),
            State::Done => Err(out_of_order("data", "exchange already complete")),
        }
    }

    fn handle_tail(&mut self, _trailers: HeaderMap) -> HttpOutcome {
        match std::mem::replace(&mut self.state, State::Done) {
            State::Reading { head, mut body } => {
                let response = (self.handler)(Request::new(head, body.take()))?;
                debug!(status = response.status(), "request handled");
                Ok(response.into_parts())
            }
            State::Rejected => Ok(Vec::new()),
            State::Idle => Err(out_of_order("tail", "no head received")),
            State::Done => Err(out_of_order("tail", "exchange already complete")),
        }
    }

    fn name(&self) -> &str {
        "simple"
    }
}

fn out_of_order(event: &'static str, detail: &str) -> Error {
    Error::OutOfOrder {
        event,
        detail: detail.to_string(),
    }
}
