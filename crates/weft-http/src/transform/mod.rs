//! Built-in transformers for HTTP exchanges.
//!
//! | transformer        | does                                               |
//! |--------------------|----------------------------------------------------|
//! | [`Logger`]         | logs request and response status (pass-through)    |
//! | [`MethodOverride`] | rewrites `POST` into `PUT`/`PATCH`/`DELETE`        |
//! | [`BodyLimit`]      | answers `413` or fails on oversized bodies         |
//! | [`BufferBody`]     | delivers the request body as one chunk             |
//! | [`ETag`]           | tags responses, answers `304` on a match           |
//! | [`Timeout`]        | answers `504` on [`Info::Timeout`](crate::Info)    |

mod body_limit;
mod buffer_body;
mod etag;
mod logger;
mod method_override;
mod timeout;

pub use body_limit::BodyLimit;
pub use buffer_body::BufferBody;
pub use etag::{entity_tag, ETag};
pub use logger::Logger;
pub use method_override::{MethodOverride, OVERRIDE_HEADER};
pub use timeout::Timeout;
