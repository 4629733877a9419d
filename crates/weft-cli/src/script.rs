//! Exchange scripts: the events a driver delivers to a stack.
//!
//! ```toml
//! [[event]]
//! kind = "head"
//! method = "POST"
//! target = "/upload?_method=PUT"
//! headers = { content-type = "text/plain" }
//!
//! [[event]]
//! kind = "data"
//! text = "hello"
//!
//! [[event]]
//! kind = "info"
//! info = "tick"
//! delay_ms = 250
//!
//! [[event]]
//! kind = "tail"
//! ```
//!
//! Headers keep the order they are written in. A header that appears more
//! than once is written as a list of pairs instead of a table:
//! `headers = [["accept", "text/html"], ["accept", "*/*"]]`.

use std::fmt;
use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Context};
use bytes::Bytes;
use serde::de::{MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer};
use weft_core::Event;
use weft_http::{HeaderMap, Http, Info, RequestHead};

#[derive(Debug, Clone, Deserialize)]
pub struct Script {
    #[serde(default, rename = "event")]
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    Head,
    Data,
    Tail,
    Info,
}

/// One scripted event. Which fields apply depends on `kind`.
#[derive(Debug, Clone, Deserialize)]
pub struct Step {
    pub kind: StepKind,
    /// Wait this long before delivering the event.
    #[serde(default)]
    pub delay_ms: u64,
    pub method: Option<String>,
    pub target: Option<String>,
    /// Request headers on a head step, trailers on a tail step.
    #[serde(default)]
    pub headers: HeaderList,
    /// Overrides the head's body flag, which otherwise follows whether
    /// the script has data steps.
    pub body: Option<bool>,
    pub text: Option<String>,
    pub info: Option<Info>,
}

/// Header pairs in script order, duplicates included.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderList(pub Vec<(String, String)>);

impl<'de> Deserialize<'de> for HeaderList {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct HeaderListVisitor;

        impl<'de> Visitor<'de> for HeaderListVisitor {
            type Value = HeaderList;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a table of headers or a list of [name, value] pairs")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut pairs = Vec::new();
                while let Some(pair) = map.next_entry::<String, String>()? {
                    pairs.push(pair);
                }
                Ok(HeaderList(pairs))
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let mut pairs = Vec::new();
                while let Some(pair) = seq.next_element::<(String, String)>()? {
                    pairs.push(pair);
                }
                Ok(HeaderList(pairs))
            }
        }

        deserializer.deserialize_any(HeaderListVisitor)
    }
}

impl Script {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read exchange script {}", path.display()))?;
        Self::from_toml(&content)
            .with_context(|| format!("invalid exchange script {}", path.display()))
    }

    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        let script: Script = toml::from_str(content)?;
        for (index, step) in script.steps.iter().enumerate() {
            step.validate()
                .with_context(|| format!("event {} ({:?})", index + 1, step.kind))?;
        }
        Ok(script)
    }

    fn has_data(&self) -> bool {
        self.steps.iter().any(|s| s.kind == StepKind::Data)
    }

    /// The scripted events paired with the delay before each.
    pub fn events(&self) -> Vec<(Duration, Event<Http>)> {
        let has_data = self.has_data();
        self.steps
            .iter()
            .map(|step| (Duration::from_millis(step.delay_ms), step.to_event(has_data)))
            .collect()
    }
}

impl Step {
    fn validate(&self) -> anyhow::Result<()> {
        match self.kind {
            StepKind::Data if self.text.is_none() => bail!("data event needs `text`"),
            StepKind::Info if self.info.is_none() => bail!("info event needs `info`"),
            _ => Ok(()),
        }
    }

    fn to_event(&self, has_data: bool) -> Event<Http> {
        match self.kind {
            StepKind::Head => {
                let method = self.method.as_deref().unwrap_or("GET");
                let target = self.target.as_deref().unwrap_or("/");
                let mut head = RequestHead::new(method, target)
                    .with_body(self.body.unwrap_or(has_data));
                head.headers = self.header_map();
                Event::Head(head)
            }
            StepKind::Data => {
                Event::Data(Bytes::from(self.text.clone().unwrap_or_default()))
            }
            StepKind::Tail => Event::Tail(self.header_map()),
            StepKind::Info => Event::Info(self.info.clone().unwrap_or(Info::Tick)),
        }
    }

    fn header_map(&self) -> HeaderMap {
        self.headers.0.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect()
    }
}
