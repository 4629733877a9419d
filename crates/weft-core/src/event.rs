//! Events and the protocol type family they are drawn from.

use std::fmt;

/// Bundles the payload, output and error types of one kind of exchange.
///
/// The pipeline never looks inside any of these types; it only moves them
/// between transformers and the terminal handler. Implementors are usually
/// zero-sized marker types.
pub trait Protocol: 'static {
    /// Initial metadata of the exchange (e.g. a request line and headers).
    type Head;
    /// One body chunk.
    type Data;
    /// Trailing metadata; marks the end of the body.
    type Tail;
    /// Out-of-band message that is not part of the exchange itself.
    type Info;
    /// Outbound artifact produced by a handler invocation.
    type Part;
    /// Failure raised by a transformer or terminal handler.
    type Error;
}

/// Output parts of a single dispatch, in production order.
pub type Parts<P> = Vec<<P as Protocol>::Part>;

/// Result of handing one event to a transformer or terminal handler.
pub type Outcome<P> = Result<Parts<P>, <P as Protocol>::Error>;

/// The four categories of input a pipeline dispatches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Head,
    Data,
    Tail,
    Info,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Head => "head",
            EventKind::Data => "data",
            EventKind::Tail => "tail",
            EventKind::Info => "info",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single inbound event, owned by value.
pub enum Event<P: Protocol> {
    Head(P::Head),
    Data(P::Data),
    Tail(P::Tail),
    Info(P::Info),
}

impl<P: Protocol> Event<P> {
    pub fn kind(&self) -> EventKind {
        match self {
            Event::Head(_) => EventKind::Head,
            Event::Data(_) => EventKind::Data,
            Event::Tail(_) => EventKind::Tail,
            Event::Info(_) => EventKind::Info,
        }
    }
}

impl<P: Protocol> fmt::Debug for Event<P>
where
    P::Head: fmt::Debug,
    P::Data: fmt::Debug,
    P::Tail: fmt::Debug,
    P::Info: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::Head(head) => f.debug_tuple("Head").field(head).finish(),
            Event::Data(data) => f.debug_tuple("Data").field(data).finish(),
            Event::Tail(tail) => f.debug_tuple("Tail").field(tail).finish(),
            Event::Info(info) => f.debug_tuple("Info").field(info).finish(),
        }
    }
}

impl<P: Protocol> Clone for Event<P>
where
    P::Head: Clone,
    P::Data: Clone,
    P::Tail: Clone,
    P::Info: Clone,
{
    fn clone(&self) -> Self {
        match self {
            Event::Head(head) => Event::Head(head.clone()),
            Event::Data(data) => Event::Data(data.clone()),
            Event::Tail(tail) => Event::Tail(tail.clone()),
            Event::Info(info) => Event::Info(info.clone()),
        }
    }
}
