//! The two contracts a pipeline is assembled from.

use dyn_clone::DynClone;

use crate::event::{Event, Outcome, Protocol};
use crate::pipeline::Pipeline;

/// The innermost consumer of events.
///
/// A terminal handler receives every event that the transformers above it
/// forward and produces the actual output parts. State persists between
/// calls only through `self`.
///
/// [`Pipeline`] implements this trait too, so a whole pipeline can sit in the
/// terminal slot of another one.
///
/// Handlers are `Clone`: a pipeline snapshots itself before each dispatch and
/// puts the snapshot back when the dispatch fails. Keep large buffers in
/// shared form (e.g. `bytes::Bytes`) so the snapshot stays cheap.
pub trait Handler<P: Protocol>: DynClone + Send {
    fn handle_head(&mut self, head: P::Head) -> Outcome<P>;

    fn handle_data(&mut self, data: P::Data) -> Outcome<P>;

    fn handle_tail(&mut self, tail: P::Tail) -> Outcome<P>;

    /// Out-of-band messages are dropped unless a handler opts in.
    fn handle_info(&mut self, _info: P::Info) -> Outcome<P> {
        tracing::debug!(handler = self.name(), "ignoring info message");
        Ok(Vec::new())
    }

    /// Route an event to the method for its kind.
    fn handle(&mut self, event: Event<P>) -> Outcome<P> {
        match event {
            Event::Head(head) => self.handle_head(head),
            Event::Data(data) => self.handle_data(data),
            Event::Tail(tail) => self.handle_tail(tail),
            Event::Info(info) => self.handle_info(info),
        }
    }

    /// Name used in logs and in `Debug` output of a pipeline.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// A middleware unit sitting between the driver and the terminal handler.
///
/// Every method receives the event together with `next`, the rest of the
/// pipeline below this transformer. A transformer can:
///
/// - forward the event unchanged (the default for every method),
/// - forward an altered event, or several synthetic ones,
/// - swallow the event and return its own parts (short-circuit),
/// - hold the event back and flush it on a later call,
/// - edit `next` itself: push further transformers, replace the terminal,
///   or swap in an entirely different pipeline.
///
/// Whatever `next` looks like when the method returns Ok becomes the pipeline
/// below this transformer for every later event. When it returns an error,
/// `next` and the transformer itself are reset to their state before the
/// call, so transformers are `Clone` for the same reason handlers are.
pub trait Transformer<P: Protocol>: DynClone + Send {
    fn process_head(&mut self, head: P::Head, next: &mut Pipeline<P>) -> Outcome<P> {
        next.handle_head(head)
    }

    fn process_data(&mut self, data: P::Data, next: &mut Pipeline<P>) -> Outcome<P> {
        next.handle_data(data)
    }

    fn process_tail(&mut self, tail: P::Tail, next: &mut Pipeline<P>) -> Outcome<P> {
        next.handle_tail(tail)
    }

    fn process_info(&mut self, info: P::Info, next: &mut Pipeline<P>) -> Outcome<P> {
        next.handle_info(info)
    }

    /// Route an event to the method for its kind.
    fn process(&mut self, event: Event<P>, next: &mut Pipeline<P>) -> Outcome<P> {
        match event {
            Event::Head(head) => self.process_head(head, next),
            Event::Data(data) => self.process_data(data, next),
            Event::Tail(tail) => self.process_tail(tail, next),
            Event::Info(info) => self.process_info(info, next),
        }
    }

    /// Name used in logs and in `Debug` output of a pipeline.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

dyn_clone::clone_trait_object!(<P> Handler<P> where P: Protocol);
dyn_clone::clone_trait_object!(<P> Transformer<P> where P: Protocol);
