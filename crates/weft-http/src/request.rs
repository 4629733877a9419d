use bytes::Bytes;

use crate::error::{Error, Result};
use crate::header::HeaderMap;

/// The head event of an HTTP exchange: request line plus headers.
///
/// `body` tells downstream handlers whether data and tail events follow;
/// when it is `false` the tail is still delivered, with no data before it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestHead {
    pub method: String,
    pub scheme: Option<String>,
    pub authority: Option<String>,
    pub path: String,
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: bool,
}

impl RequestHead {
    /// Create a head from a method and a request target such as `/a?b=c`.
    pub fn new(method: impl Into<String>, target: &str) -> Self {
        let (path, query) = match target.split_once('?') {
            Some((path, query)) => (path, Some(query.to_string())),
            None => (target, None),
        };
        Self {
            method: method.into().to_ascii_uppercase(),
            scheme: None,
            authority: None,
            path: if path.is_empty() { "/".to_string() } else { path.to_string() },
            query,
            headers: HeaderMap::new(),
            body: false,
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn with_body(mut self, body: bool) -> Self {
        self.body = body;
        self
    }

    /// Path and query as they appeared on the request line.
    pub fn target(&self) -> String {
        match &self.query {
            Some(query) => format!("{}?{}", self.path, query),
            None => self.path.clone(),
        }
    }

    /// Query string split into `key=value` pairs, in order.
    ///
    /// `+` is read as a space; no other decoding is applied.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let Some(query) = &self.query else {
            return Vec::new();
        };
        query
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| {
                let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
                (key.replace('+', " "), value.replace('+', " "))
            })
            .collect()
    }

    /// Declared `content-length`, if any.
    pub fn content_length(&self) -> Result<Option<u64>> {
        let Some(raw) = self.headers.get("content-length") else {
            return Ok(None);
        };
        raw.trim()
            .parse()
            .map(Some)
            .map_err(|e: std::num::ParseIntError| Error::InvalidHeader {
                name: "content-length".to_string(),
                reason: e.to_string(),
            })
    }
}

/// A request with its body fully buffered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub head: RequestHead,
    pub body: Bytes,
}

impl Request {
    pub fn new(head: RequestHead, body: impl Into<Bytes>) -> Self {
        Self {
            head,
            body: body.into(),
        }
    }

    pub fn method(&self) -> &str {
        &self.head.method
    }

    pub fn path(&self) -> &str {
        &self.head.path
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.head.headers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_splits_target() {
        let head = RequestHead::new("get", "/users?page=1&sort=asc");
        assert_eq!(head.method, "GET");
        assert_eq!(head.path, "/users");
        assert_eq!(head.query.as_deref(), Some("page=1&sort=asc"));
        assert_eq!(head.target(), "/users?page=1&sort=asc");
        assert!(!head.body);
    }

    #[test]
    fn empty_path_becomes_root() {
        let head = RequestHead::new("GET", "?x=1");
        assert_eq!(head.path, "/");
        assert_eq!(head.target(), "/?x=1");
    }

    #[test]
    fn query_pairs_in_order() {
        let head = RequestHead::new("GET", "/?a=1&&flag&name=two+words");
        assert_eq!(
            head.query_pairs(),
            vec![
                ("a".to_string(), "1".to_string()),
                ("flag".to_string(), String::new()),
                ("name".to_string(), "two words".to_string()),
            ]
        );
        assert!(RequestHead::new("GET", "/").query_pairs().is_empty());
    }

    #[test]
    fn content_length_parses() {
        let head = RequestHead::new("POST", "/").with_header("Content-Length", " 42 ");
        assert_eq!(head.content_length().unwrap(), Some(42));
        assert_eq!(RequestHead::new("POST", "/").content_length().unwrap(), None);
    }

    #[test]
    fn content_length_invalid() {
        let head = RequestHead::new("POST", "/").with_header("content-length", "lots");
        assert!(matches!(
            head.content_length(),
            Err(Error::InvalidHeader { name, .. }) if name == "content-length"
        ));
    }

    #[test]
    fn request_accessors() {
        let head = RequestHead::new("POST", "/upload")
            .with_header("Host", "example.com")
            .with_body(true);
        let req = Request::new(head, "hello");
        assert_eq!(req.method(), "POST");
        assert_eq!(req.path(), "/upload");
        assert_eq!(req.headers().get("host"), Some("example.com"));
        assert_eq!(req.body.as_ref(), b"hello");
    }
}
