//! Terminal handlers the driver can put at the bottom of a stack.

use bytes::Bytes;
use clap::ValueEnum;
use tracing::debug;
use weft_core::Handler;
use weft_http::{
    Error, HeaderMap, Http, HttpOutcome, Info, Part, Request, RequestHead, Response,
    ResponseHead, Simple,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TerminalKind {
    /// Buffer the request and answer with its method, path and body
    Echo,
    /// Answer with an event stream fed by info messages
    Events,
}

impl TerminalKind {
    pub fn build(self, max_body: usize) -> weft_core::BoxHandler<Http> {
        match self {
            TerminalKind::Echo => Box::new(echo(max_body)),
            TerminalKind::Events => Box::new(EventStream::new()),
        }
    }
}

pub fn echo(max_body: usize) -> Simple<impl FnMut(Request) -> weft_http::Result<Response> + Send + Clone> {
    Simple::new(|req: Request| {
        Ok(Response::text(
            200,
            format!(
                "{} {}\n{}",
                req.method(),
                req.head.target(),
                String::from_utf8_lossy(&req.body)
            ),
        ))
    })
    .with_max_body(max_body)
}

/// Opens a `text/event-stream` response on the head and keeps it open.
///
/// Each [`Info::Message`] becomes one frame with a running id; a string
/// payload is sent as is, anything else as JSON. [`Info::Tick`] writes a
/// keep-alive comment and [`Info::Timeout`] closes the stream.
#[derive(Debug, Clone, Default)]
pub struct EventStream {
    state: StreamState,
    next_id: u64,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
enum StreamState {
    #[default]
    Idle,
    Open,
    Closed,
}

impl EventStream {
    pub fn new() -> Self {
        Self::default()
    }

    fn frame(&mut self, payload: &serde_json::Value) -> weft_http::Result<Part> {
        self.next_id += 1;
        let data = match payload {
            serde_json::Value::String(text) => text.clone(),
            other => other.to_string(),
        };
        let event = weft_sse::Event::new(data)
            .with_id(self.next_id.to_string())
            .and_then(|e| e.with_event("message"))
            .map_err(|e| Error::handler(e.to_string()))?;
        Ok(Part::Data(Bytes::from(weft_sse::encode(&event))))
    }
}

impl Handler<Http> for EventStream {
    fn handle_head(&mut self, head: RequestHead) -> HttpOutcome {
        if self.state != StreamState::Idle {
            return Err(Error::OutOfOrder {
                event: "head",
                detail: "stream already started".to_string(),
            });
        }
        debug!(path = %head.path, "opening event stream");
        self.state = StreamState::Open;
        let head = ResponseHead::new(200)
            .with_header("content-type", weft_sse::CONTENT_TYPE)
            .with_header("cache-control", "no-cache");
        Ok(vec![Part::Head(head)])
    }

    fn handle_data(&mut self, _data: Bytes) -> HttpOutcome {
        Ok(Vec::new())
    }

    fn handle_tail(&mut self, _trailers: HeaderMap) -> HttpOutcome {
        Ok(Vec::new())
    }

    fn handle_info(&mut self, info: Info) -> HttpOutcome {
        match (self.state, info) {
            (StreamState::Open, Info::Message(payload)) => Ok(vec![self.frame(&payload)?]),
            (StreamState::Open, Info::Tick) => Ok(vec![Part::Data(Bytes::from(
                weft_sse::encode_comment("keep-alive"),
            ))]),
            (StreamState::Open, Info::Timeout) => {
                debug!(sent = self.next_id, "closing event stream");
                self.state = StreamState::Closed;
                Ok(vec![Part::Tail(HeaderMap::new())])
            }
            (state, info) => {
                debug!(?state, ?info, "info outside an open stream ignored");
                Ok(Vec::new())
            }
        }
    }

    fn name(&self) -> &str {
        "event_stream"
    }
}
