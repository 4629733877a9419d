//! Error types for HTTP exchanges.

use thiserror::Error;

/// Result type alias for HTTP pipeline operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by transformers and terminal handlers of an HTTP exchange.
///
/// The pipeline passes these through untouched; the driver decides whether
/// to abort the exchange.
#[derive(Debug, Error)]
pub enum Error {
    #[error("request body exceeds {limit} bytes")]
    BodyTooLarge { limit: u64 },

    #[error("{event} event arrived out of order: {detail}")]
    OutOfOrder { event: &'static str, detail: String },

    #[error("handler failed: {0}")]
    Handler(String),

    #[error("invalid header `{name}`: {reason}")]
    InvalidHeader { name: String, reason: String },
}

impl Error {
    pub fn handler(message: impl Into<String>) -> Self {
        Error::Handler(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        assert_eq!(
            Error::BodyTooLarge { limit: 10 }.to_string(),
            "request body exceeds 10 bytes"
        );
        assert_eq!(Error::handler("boom").to_string(), "handler failed: boom");
        assert_eq!(
            Error::OutOfOrder {
                event: "data",
                detail: "no head yet".into()
            }
            .to_string(),
            "data event arrived out of order: no head yet"
        );
    }

    #[test]
    fn error_is_std_error() {
        let err = Error::handler("test");
        let _: &dyn std::error::Error = &err;
    }
}
