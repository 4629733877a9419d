//! weft-http — HTTP exchanges on top of the weft pipeline.
//!
//! Binds the generic [`weft_core::Pipeline`] to HTTP payloads through the
//! [`Http`] protocol family:
//!
//! | event | payload          |     | part           |
//! |-------|------------------|-----|----------------|
//! | head  | [`RequestHead`]  |     | [`Part::Head`] |
//! | data  | `Bytes`          |     | [`Part::Data`] |
//! | tail  | [`HeaderMap`]    |     | [`Part::Tail`] |
//! | info  | [`Info`]         |     |                |
//!
//! On top of that it provides the built-in [`transform`]s, the [`Simple`]
//! buffering terminal, and [`StackConfig`] for assembling a stack from TOML.

mod body;
pub mod config;
mod error;
mod header;
mod protocol;
mod request;
mod response;
mod simple;
pub mod transform;

pub use config::{StackConfig, TerminalConfig, TransformerConfig};
pub use error::{Error, Result};
pub use header::{Header, HeaderMap};
pub use protocol::{Http, HttpOutcome, HttpPipeline, Info, Part};
pub use request::{Request, RequestHead};
pub use response::{reason_phrase, Chunks, Response, ResponseHead, DEFAULT_CHUNK_SIZE};
pub use simple::{Simple, DEFAULT_MAX_BODY};
