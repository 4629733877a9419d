//! weft-sse — server-sent events (`text/event-stream`) codec.
//!
//! A self-contained encoder and decoder for the line-oriented push
//! notification format. It shares no state with the pipeline; terminal
//! handlers that answer with an event stream use [`encode`] to produce body
//! chunks, and clients use [`decode`] or [`Decoder`] to read them back.
//!
//! # Wire format
//!
//! ```text
//! id: 42
//! event: update
//! data: first line
//! data: second line
//!
//! ```
//!
//! Each frame is a run of `field: value` lines closed by a blank line.
//! Lines starting with `:` are comments.

mod codec;
mod error;
mod event;

pub use codec::{decode, encode, encode_comment, Decoder};
pub use error::{SseError, SseResult};
pub use event::Event;

/// Media type of an event-stream response body.
pub const CONTENT_TYPE: &str = "text/event-stream";
