use thiserror::Error;

/// Result type alias for event-stream operations.
pub type SseResult<T> = Result<T, SseError>;

/// Errors raised while building or decoding event-stream frames.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SseError {
    /// `id` and `event` are single-line fields.
    #[error("line break in `{field}` field")]
    LineBreakInField { field: &'static str },

    #[error("invalid UTF-8 in event stream at byte {offset}")]
    InvalidUtf8 { offset: usize },
}
