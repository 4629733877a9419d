use crate::error::{SseError, SseResult};

/// One server-sent event.
///
/// `id` and `event` can never contain a line break; the checked setters
/// enforce this, so every `Event` value can be encoded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Event {
    pub(crate) id: Option<String>,
    pub(crate) event: Option<String>,
    pub(crate) data: String,
    pub(crate) retry: Option<u64>,
}

impl Event {
    pub fn new(data: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            ..Self::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> SseResult<Self> {
        self.id = Some(single_line("id", id.into())?);
        Ok(self)
    }

    /// Set the event type (the `event:` field).
    pub fn with_event(mut self, event: impl Into<String>) -> SseResult<Self> {
        self.event = Some(single_line("event", event.into())?);
        Ok(self)
    }

    /// Reconnection delay in milliseconds advertised to the client.
    pub fn with_retry(mut self, millis: u64) -> Self {
        self.retry = Some(millis);
        self
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn event(&self) -> Option<&str> {
        self.event.as_deref()
    }

    pub fn data(&self) -> &str {
        &self.data
    }

    pub fn retry(&self) -> Option<u64> {
        self.retry
    }
}

fn single_line(field: &'static str, value: String) -> SseResult<String> {
    if value.contains(['\n', '\r']) {
        return Err(SseError::LineBreakInField { field });
    }
    Ok(value)
}
