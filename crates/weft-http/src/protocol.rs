//! The HTTP flavour of the pipeline's protocol family.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use weft_core::{Outcome, Pipeline, Protocol};

use crate::error::Error;
use crate::header::HeaderMap;
use crate::request::RequestHead;
use crate::response::ResponseHead;

/// Marker type binding the HTTP payloads to [`weft_core::Protocol`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Http;

impl Protocol for Http {
    type Head = RequestHead;
    type Data = Bytes;
    /// Request trailers.
    type Tail = HeaderMap;
    type Info = Info;
    type Part = Part;
    type Error = Error;
}

/// A pipeline over HTTP events.
pub type HttpPipeline = Pipeline<Http>;

/// Result of dispatching one HTTP event.
pub type HttpOutcome = Outcome<Http>;

/// One fragment of an outbound response.
///
/// A complete response is a `Head`, zero or more `Data` parts and a closing
/// `Tail`; these may be spread over the outcomes of several events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Part {
    Head(ResponseHead),
    Data(Bytes),
    /// Response trailers; ends the response.
    Tail(HeaderMap),
}

impl Part {
    pub fn is_head(&self) -> bool {
        matches!(self, Part::Head(_))
    }

    pub fn is_tail(&self) -> bool {
        matches!(self, Part::Tail(_))
    }
}

/// Out-of-band messages delivered to an exchange by its driver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Info {
    /// Periodic wake-up, e.g. for keep-alives.
    Tick,
    /// The driver's deadline for this exchange has passed.
    Timeout,
    /// Application notification, e.g. from an upstream publisher.
    Message(serde_json::Value),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn part_predicates() {
        assert!(Part::Head(ResponseHead::new(200)).is_head());
        assert!(Part::Tail(HeaderMap::new()).is_tail());
        assert!(!Part::Data(Bytes::from_static(b"x")).is_head());
    }

    #[test]
    fn info_deserializes_from_toml() {
        #[derive(Deserialize)]
        struct Doc {
            a: Info,
            b: Info,
        }

        let doc: Doc = toml::from_str(
            r#"
a = "timeout"
b = { message = { user = "ada", count = 2 } }
"#,
        )
        .unwrap();
        assert_eq!(doc.a, Info::Timeout);
        assert_eq!(
            doc.b,
            Info::Message(serde_json::json!({ "user": "ada", "count": 2 }))
        );
    }
}
