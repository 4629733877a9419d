use tracing::{debug, warn};
use weft_core::{Event, Handler, Transformer};

use crate::header::HeaderMap;
use crate::protocol::{Http, HttpOutcome, HttpPipeline, Info, Part};
use crate::request::RequestHead;
use crate::response::Response;

/// Turns an [`Info::Timeout`] into a `504 Gateway Timeout` response when
/// nothing has been answered yet.
///
/// The driver owns the clock and delivers the timeout as an info message.
/// After timing out, the downstream stack is dropped and every later event
/// is discarded. A timeout arriving after the response has started is
/// forwarded like any other info message.
#[derive(Debug, Clone, Default)]
pub struct Timeout {
    responded: bool,
    timed_out: bool,
}

impl Timeout {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Transformer<Http> for Timeout {
    fn process(&mut self, event: Event<Http>, next: &mut HttpPipeline) -> HttpOutcome {
        if self.timed_out {
            debug!(kind = %event.kind(), "discarding event after timeout");
            return Ok(Vec::new());
        }
        if matches!(event, Event::Info(Info::Timeout)) && !self.responded {
            warn!("exchange timed out before a response was produced");
            self.timed_out = true;
            *next = HttpPipeline::from_handler(Discard);
            return Ok(Response::status_text(504).into_parts());
        }
        let parts = next.handle(event)?;
        if parts.iter().any(Part::is_head) {
            self.responded = true;
        }
        Ok(parts)
    }

    fn name(&self) -> &str {
        "timeout"
    }
}

/// Stand-in for a downstream stack that has been abandoned.
#[derive(Clone)]
struct Discard;

impl Handler<Http> for Discard {
    fn handle_head(&mut self, _head: RequestHead) -> HttpOutcome {
        Ok(Vec::new())
    }

    fn handle_data(&mut self, _data: bytes::Bytes) -> HttpOutcome {
        Ok(Vec::new())
    }

    fn handle_tail(&mut self, _tail: HeaderMap) -> HttpOutcome {
        Ok(Vec::new())
    }

    fn name(&self) -> &str {
        "discard"
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;

    use super::*;
    use crate::request::Request;
    use crate::simple::Simple;
    use crate::transform::BufferBody;

    fn pipeline() -> HttpPipeline {
        HttpPipeline::from_handler(Simple::new(|_req: Request| Ok(Response::text(200, "done"))))
            .with(Timeout::new())
            .with(BufferBody::new())
    }

    #[test]
    fn timeout_before_response_gives_504() {
        let mut p = pipeline();
        p.handle_head(RequestHead::new("POST", "/slow")).unwrap();
        p.handle_data(Bytes::from("partial")).unwrap();

        let parts = p.handle_info(Info::Timeout).unwrap();
        assert!(matches!(&parts[0], Part::Head(h) if h.status == 504));
        assert!(parts.last().unwrap().is_tail());

        assert_eq!(p.transformer_names(), vec!["timeout"]);
        assert_eq!(p.terminal().name(), "discard");
        assert!(p.handle_tail(HeaderMap::new()).unwrap().is_empty());
    }

    #[test]
    fn timeout_after_response_is_forwarded() {
        let mut p = pipeline();
        p.handle_head(RequestHead::new("GET", "/")).unwrap();
        let parts = p.handle_tail(HeaderMap::new()).unwrap();
        assert!(matches!(&parts[0], Part::Head(h) if h.status == 200));

        assert!(p.handle_info(Info::Timeout).unwrap().is_empty());
        assert_eq!(p.transformer_names(), vec!["timeout", "buffer_body"]);
        assert_eq!(p.terminal().name(), "simple");
    }

    #[test]
    fn other_info_passes_through() {
        let mut p = pipeline();
        p.handle_head(RequestHead::new("GET", "/")).unwrap();
        assert!(p.handle_info(Info::Tick).unwrap().is_empty());
        let parts = p.handle_tail(HeaderMap::new()).unwrap();
        assert_eq!(parts.len(), 3);
    }
}
