//! weft-core — a composable pipeline for streaming exchanges.
//!
//! An exchange is a sequence of events: one head, any number of data
//! chunks, a tail, and out-of-band info messages interleaved anywhere.
//! A [`Pipeline`] threads each event through an ordered stack of
//! [`Transformer`]s before it reaches a terminal [`Handler`].
//!
//! # Dispatch
//!
//! ```text
//! driver ──event──▶ Pipeline
//!                     │ pop front transformer
//!                     ▼
//!                   Transformer ──(event', next: &mut Pipeline)──▶ rest of stack …
//!                     │                                              │
//!                     │ push back on top of `next`                   ▼
//!                     ▼                                          terminal Handler
//!                   parts ◀──────────────────────────────────────────┘
//! ```
//!
//! The downstream handle is the pipeline value itself, minus the transformer
//! that is running. A transformer may dispatch into it any number of times,
//! grow it, shrink it, or replace it, and the dispatcher re-installs the
//! transformer on top of whatever is left. If the transformer returns an
//! error instead, the pipeline goes back to the value it had before the
//! event. Because [`Pipeline`] implements [`Handler`], pipelines nest.
//!
//! The pipeline performs no I/O and spawns nothing; the driver owns
//! scheduling, ordering and cancellation.

mod event;
mod handler;
mod pipeline;

pub use event::{Event, EventKind, Outcome, Parts, Protocol};
pub use handler::{Handler, Transformer};
pub use pipeline::{BoxHandler, BoxTransformer, Pipeline};
