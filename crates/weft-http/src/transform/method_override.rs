use tracing::debug;
use weft_core::{Handler, Transformer};

use crate::protocol::{Http, HttpOutcome, HttpPipeline};
use crate::request::RequestHead;

/// Methods a `POST` may be turned into.
const OVERRIDABLE: [&str; 3] = ["PUT", "PATCH", "DELETE"];

/// Header consulted before the `_method` query parameter.
pub const OVERRIDE_HEADER: &str = "x-http-method-override";

/// Lets clients that can only send `POST` (e.g. HTML forms) ask for
/// `PUT`, `PATCH` or `DELETE` instead.
///
/// The requested method comes from the `x-http-method-override` header or
/// the `_method` query parameter. Any other method, or an unsupported
/// override value, leaves the head as it was.
#[derive(Debug, Default, Clone, Copy)]
pub struct MethodOverride;

impl MethodOverride {
    pub fn new() -> Self {
        Self
    }
}

impl Transformer<Http> for MethodOverride {
    fn process_head(&mut self, mut head: RequestHead, next: &mut HttpPipeline) -> HttpOutcome {
        if head.method == "POST" {
            if let Some(method) = requested_method(&head) {
                debug!(from = "POST", to = method, path = %head.path, "overriding request method");
                head.method = method.to_string();
            }
        }
        next.handle_head(head)
    }

    fn name(&self) -> &str {
        "method_override"
    }
}

fn requested_method(head: &RequestHead) -> Option<&'static str> {
    let raw = head.headers.get(OVERRIDE_HEADER).map(str::to_string).or_else(|| {
        head.query_pairs()
            .into_iter()
            .find(|(key, _)| key == "_method")
            .map(|(_, value)| value)
    })?;
    OVERRIDABLE
        .iter()
        .copied()
        .find(|m| m.eq_ignore_ascii_case(raw.trim()))
}
