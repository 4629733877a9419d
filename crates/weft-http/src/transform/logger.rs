use std::time::Instant;

use tracing::{debug, info, warn};
use weft_core::{Event, Handler, Transformer};

use crate::protocol::{Http, HttpOutcome, HttpPipeline, Part};

/// Logs each request and the status of its response.
///
/// Events pass through untouched. The response is noticed in whichever
/// dispatch first returns a head part, so the elapsed time covers request
/// buffering done further down the stack.
#[derive(Debug, Clone, Default)]
pub struct Logger {
    request: Option<(String, String)>,
    started: Option<Instant>,
    completed: bool,
}

impl Logger {
    pub fn new() -> Self {
        Self::default()
    }

    fn observe(&mut self, outcome: &HttpOutcome) {
        let (method, target) = self
            .request
            .as_ref()
            .map(|(m, t)| (m.as_str(), t.as_str()))
            .unwrap_or(("-", "-"));
        match outcome {
            Ok(parts) if !self.completed => {
                let Some(Part::Head(head)) = parts.iter().find(|p| p.is_head()) else {
                    return;
                };
                self.completed = true;
                let elapsed_ms = self
                    .started
                    .map(|t| t.elapsed().as_millis() as u64)
                    .unwrap_or_default();
                info!(method, target, status = head.status, elapsed_ms, "request completed");
            }
            Ok(_) => {}
            Err(error) => warn!(method, target, %error, "request failed"),
        }
    }
}

impl Transformer<Http> for Logger {
    fn process(&mut self, event: Event<Http>, next: &mut HttpPipeline) -> HttpOutcome {
        if let Event::Head(head) = &event {
            debug!(method = %head.method, target = %head.target(), "request received");
            self.request = Some((head.method.clone(), head.target()));
            self.started = Some(Instant::now());
        }
        let outcome = next.handle(event);
        self.observe(&outcome);
        outcome
    }

    fn name(&self) -> &str {
        "logger"
    }
}
