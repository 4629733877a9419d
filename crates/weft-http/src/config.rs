//! Stack configuration parser.
//!
//! A stack file lists transformers in the order they run:
//!
//! ```toml
//! [[transformer]]
//! kind = "logger"
//!
//! [[transformer]]
//! kind = "body_limit"
//! max_bytes = 1048576
//!
//! [terminal]
//! max_body = 65536
//! ```

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use weft_core::{BoxHandler, BoxTransformer};

use crate::protocol::{Http, HttpPipeline};
use crate::simple::DEFAULT_MAX_BODY;
use crate::transform::{BodyLimit, BufferBody, ETag, Logger, MethodOverride, Timeout};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StackConfig {
    #[serde(default, rename = "transformer")]
    pub transformers: Vec<TransformerConfig>,
    pub terminal: Option<TerminalConfig>,
}

/// One entry of the transformer stack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TransformerConfig {
    Logger,
    MethodOverride,
    BodyLimit { max_bytes: u64 },
    BufferBody,
    Etag,
    Timeout,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerminalConfig {
    /// Largest request body the terminal buffers, in bytes.
    pub max_body: Option<usize>,
}

impl TransformerConfig {
    pub fn kind(&self) -> &'static str {
        match self {
            TransformerConfig::Logger => "logger",
            TransformerConfig::MethodOverride => "method_override",
            TransformerConfig::BodyLimit { .. } => "body_limit",
            TransformerConfig::BufferBody => "buffer_body",
            TransformerConfig::Etag => "etag",
            TransformerConfig::Timeout => "timeout",
        }
    }

    pub fn build(&self) -> BoxTransformer<Http> {
        match self {
            TransformerConfig::Logger => Box::new(Logger::new()),
            TransformerConfig::MethodOverride => Box::new(MethodOverride::new()),
            TransformerConfig::BodyLimit { max_bytes } => Box::new(BodyLimit::new(*max_bytes)),
            TransformerConfig::BufferBody => Box::new(BufferBody::new()),
            TransformerConfig::Etag => Box::new(ETag::new()),
            TransformerConfig::Timeout => Box::new(Timeout::new()),
        }
    }
}

impl StackConfig {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read stack config {}", path.display()))?;
        Self::from_toml(&content)
            .with_context(|| format!("invalid stack config {}", path.display()))
    }

    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml_string(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Fresh transformer instances, in run order.
    pub fn build(&self) -> Vec<BoxTransformer<Http>> {
        self.transformers.iter().map(TransformerConfig::build).collect()
    }

    /// A pipeline of freshly built transformers over `terminal`.
    pub fn pipeline(&self, terminal: BoxHandler<Http>) -> HttpPipeline {
        HttpPipeline::new(self.build(), terminal)
    }

    pub fn max_body(&self) -> usize {
        self.terminal
            .as_ref()
            .and_then(|t| t.max_body)
            .unwrap_or(DEFAULT_MAX_BODY)
    }
}
