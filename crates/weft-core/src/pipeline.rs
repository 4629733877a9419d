//! The pipeline: an ordered stack of transformers over one terminal handler.

use std::collections::VecDeque;
use std::fmt;

use tracing::trace;

use crate::event::{Event, Outcome, Protocol};
use crate::handler::{Handler, Transformer};

/// A boxed transformer as stored in a pipeline.
pub type BoxTransformer<P> = Box<dyn Transformer<P>>;

/// A boxed terminal handler as stored in a pipeline.
pub type BoxHandler<P> = Box<dyn Handler<P>>;

/// One exchange's chain of transformers and its terminal handler.
///
/// The front transformer is the next to see an inbound event. Dispatching
/// pops it, hands it the remaining pipeline as its downstream, and pushes it
/// back on top of whatever downstream it left behind. The relative order of
/// all other transformers is untouched unless a transformer edits its
/// downstream explicitly.
///
/// A pipeline is owned by the single event stream it serves; nothing in it
/// is shared, so it needs no locking. A failed dispatch leaves it as it was
/// before the call.
pub struct Pipeline<P: Protocol> {
    transformers: VecDeque<BoxTransformer<P>>,
    terminal: BoxHandler<P>,
}

impl<P: Protocol> Pipeline<P> {
    /// Create a pipeline. The first element of `transformers` runs first.
    pub fn new(transformers: Vec<BoxTransformer<P>>, terminal: BoxHandler<P>) -> Self {
        Self {
            transformers: transformers.into(),
            terminal,
        }
    }

    /// A pipeline with no transformers, delegating straight to `terminal`.
    pub fn from_handler(terminal: impl Handler<P> + 'static) -> Self {
        Self::new(Vec::new(), Box::new(terminal))
    }

    /// Builder-style append; `transformer` runs after the ones already added.
    pub fn with(mut self, transformer: impl Transformer<P> + 'static) -> Self {
        self.transformers.push_back(Box::new(transformer));
        self
    }

    /// Replace the whole transformer list, returning the previous one.
    pub fn replace_transformers(
        &mut self,
        transformers: Vec<BoxTransformer<P>>,
    ) -> Vec<BoxTransformer<P>> {
        std::mem::replace(&mut self.transformers, transformers.into()).into()
    }

    /// Replace the terminal handler, returning the previous one.
    pub fn replace_terminal(&mut self, terminal: BoxHandler<P>) -> BoxHandler<P> {
        std::mem::replace(&mut self.terminal, terminal)
    }

    /// Put `transformer` in front; it runs next.
    pub fn push_transformer(&mut self, transformer: BoxTransformer<P>) {
        self.transformers.push_front(transformer);
    }

    /// Remove the foremost transformer.
    ///
    /// Returns `None` when the list is already empty, in which case the
    /// pipeline is left exactly as it was.
    pub fn pop_transformer(&mut self) -> Option<BoxTransformer<P>> {
        self.transformers.pop_front()
    }

    /// Transformers in the order they run.
    pub fn transformers(&self) -> impl Iterator<Item = &dyn Transformer<P>> {
        self.transformers.iter().map(|t| t.as_ref())
    }

    /// Transformer names in the order they run.
    pub fn transformer_names(&self) -> Vec<&str> {
        self.transformers.iter().map(|t| t.name()).collect()
    }

    pub fn terminal(&self) -> &dyn Handler<P> {
        self.terminal.as_ref()
    }

    pub fn terminal_mut(&mut self) -> &mut dyn Handler<P> {
        self.terminal.as_mut()
    }

    /// Number of transformers; the terminal is not counted.
    pub fn len(&self) -> usize {
        self.transformers.len()
    }

    /// `true` when no transformers remain and events go to the terminal.
    pub fn is_empty(&self) -> bool {
        self.transformers.is_empty()
    }

    /// Thread one event through the pipeline.
    ///
    /// Errors from a transformer or from the terminal are returned unchanged,
    /// and the pipeline is put back exactly as it was before the call: the
    /// same transformers in the same order, with the state they had, over the
    /// same terminal. Edits a transformer made to its downstream before
    /// failing are discarded along with everything else.
    pub fn dispatch(&mut self, event: Event<P>) -> Outcome<P> {
        let kind = event.kind();
        let snapshot = self.clone();
        let outcome = self.dispatch_in_place(event);
        if outcome.is_err() {
            trace!(%kind, "dispatch failed, restoring pipeline");
            *self = snapshot;
        }
        outcome
    }

    fn dispatch_in_place(&mut self, event: Event<P>) -> Outcome<P> {
        let kind = event.kind();
        let Some(mut front) = self.pop_transformer() else {
            trace!(%kind, terminal = self.terminal.name(), "dispatching to terminal");
            return self.terminal.handle(event);
        };

        trace!(
            %kind,
            transformer = front.name(),
            remaining = self.transformers.len(),
            "dispatching to transformer"
        );
        let outcome = front.process(event, self);
        self.push_transformer(front);
        outcome
    }
}

impl<P: Protocol> Clone for Pipeline<P> {
    fn clone(&self) -> Self {
        Self {
            transformers: self.transformers.clone(),
            terminal: self.terminal.clone(),
        }
    }
}

impl<P: Protocol> Handler<P> for Pipeline<P> {
    fn handle_head(&mut self, head: P::Head) -> Outcome<P> {
        self.dispatch(Event::Head(head))
    }

    fn handle_data(&mut self, data: P::Data) -> Outcome<P> {
        self.dispatch(Event::Data(data))
    }

    fn handle_tail(&mut self, tail: P::Tail) -> Outcome<P> {
        self.dispatch(Event::Tail(tail))
    }

    fn handle_info(&mut self, info: P::Info) -> Outcome<P> {
        self.dispatch(Event::Info(info))
    }

    fn handle(&mut self, event: Event<P>) -> Outcome<P> {
        self.dispatch(event)
    }

    fn name(&self) -> &str {
        "Pipeline"
    }
}

impl<P: Protocol> fmt::Debug for Pipeline<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("transformers", &self.transformer_names())
            .field("terminal", &self.terminal.name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Text;

    impl Protocol for Text {
        type Head = String;
        type Data = String;
        type Tail = ();
        type Info = String;
        type Part = String;
        type Error = String;
    }

    /// Terminal that answers each event with a tagged echo.
    #[derive(Clone)]
    struct Echo;

    impl Handler<Text> for Echo {
        fn handle_head(&mut self, head: String) -> Outcome<Text> {
            Ok(vec![format!("head:{head}")])
        }

        fn handle_data(&mut self, data: String) -> Outcome<Text> {
            Ok(vec![format!("data:{data}")])
        }

        fn handle_tail(&mut self, _tail: ()) -> Outcome<Text> {
            Ok(vec!["tail".to_string()])
        }

        fn name(&self) -> &str {
            "echo"
        }
    }

    #[derive(Clone)]
    struct Named(&'static str);

    impl Transformer<Text> for Named {
        fn name(&self) -> &str {
            self.0
        }
    }

    #[test]
    fn new_keeps_given_order() {
        let pipeline = Pipeline::<Text>::new(
            vec![Box::new(Named("a")), Box::new(Named("b"))],
            Box::new(Echo),
        );
        assert_eq!(pipeline.transformer_names(), vec!["a", "b"]);
        assert_eq!(pipeline.terminal().name(), "echo");
        assert_eq!(pipeline.len(), 2);
    }

    #[test]
    fn with_appends_behind_existing() {
        let pipeline = Pipeline::<Text>::from_handler(Echo)
            .with(Named("a"))
            .with(Named("b"));
        assert_eq!(pipeline.transformer_names(), vec!["a", "b"]);
    }

    #[test]
    fn push_goes_to_front() {
        let mut pipeline = Pipeline::<Text>::from_handler(Echo).with(Named("a"));
        pipeline.push_transformer(Box::new(Named("z")));
        assert_eq!(pipeline.transformer_names(), vec!["z", "a"]);
    }

    #[test]
    fn pop_empty_leaves_pipeline_unchanged() {
        let mut pipeline = Pipeline::<Text>::from_handler(Echo);
        assert!(pipeline.pop_transformer().is_none());
        assert!(pipeline.is_empty());
        assert_eq!(pipeline.terminal().name(), "echo");
    }

    #[test]
    fn replace_transformers_returns_previous() {
        let mut pipeline = Pipeline::<Text>::from_handler(Echo).with(Named("a"));
        let old = pipeline.replace_transformers(vec![Box::new(Named("x")), Box::new(Named("y"))]);
        assert_eq!(old.len(), 1);
        assert_eq!(old[0].name(), "a");
        assert_eq!(pipeline.transformer_names(), vec!["x", "y"]);
    }

    #[test]
    fn replace_terminal_returns_previous() {
        let mut pipeline = Pipeline::<Text>::from_handler(Echo);
        let old = pipeline.replace_terminal(Box::new(Pipeline::from_handler(Echo)));
        assert_eq!(old.name(), "echo");
        assert_eq!(pipeline.terminal().name(), "Pipeline");
    }

    #[test]
    fn default_transformer_forwards_every_kind() {
        let mut pipeline = Pipeline::<Text>::from_handler(Echo).with(Named("a"));
        assert_eq!(pipeline.handle_head("GET".into()).unwrap(), vec!["head:GET"]);
        assert_eq!(pipeline.handle_data("x".into()).unwrap(), vec!["data:x"]);
        assert_eq!(pipeline.handle_tail(()).unwrap(), vec!["tail"]);
        assert!(pipeline.handle_info("ping".into()).unwrap().is_empty());
        assert_eq!(pipeline.transformer_names(), vec!["a"]);
    }

    #[test]
    fn accessors_expose_stack_in_dispatch_order() {
        let mut pipeline = Pipeline::<Text>::from_handler(Echo)
            .with(Named("outer"))
            .with(Named("inner"));
        let names: Vec<&str> = pipeline.transformers().map(|t| t.name()).collect();
        assert_eq!(names, vec!["outer", "inner"]);

        // The terminal answers directly, skipping the transformers.
        let parts = pipeline.terminal_mut().handle_head("GET".into()).unwrap();
        assert_eq!(parts, vec!["head:GET"]);
        assert_eq!(pipeline.len(), 2);
    }

    #[test]
    fn clone_copies_stack_and_terminal() {
        let pipeline = Pipeline::<Text>::from_handler(Echo).with(Named("a"));
        let mut copy = pipeline.clone();
        copy.push_transformer(Box::new(Named("b")));
        assert_eq!(pipeline.transformer_names(), vec!["a"]);
        assert_eq!(copy.transformer_names(), vec!["b", "a"]);
        assert_eq!(copy.terminal().name(), "echo");
    }

    #[test]
    fn debug_lists_names() {
        let pipeline = Pipeline::<Text>::from_handler(Echo).with(Named("a"));
        assert_eq!(
            format!("{pipeline:?}"),
            "Pipeline { transformers: [\"a\"], terminal: \"echo\" }"
        );
    }
}
