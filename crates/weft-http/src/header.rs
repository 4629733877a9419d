/// An HTTP header as a name-value pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub name: String,
    pub value: String,
}

impl Header {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// An ordered collection of headers or trailers.
///
/// Preserves insertion order and duplicate names (e.g. several
/// `Set-Cookie` headers). All lookups are case-insensitive; names keep the
/// spelling they were inserted with.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderMap {
    entries: Vec<Header>,
}

impl HeaderMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a header, keeping any existing ones with the same name.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries.push(Header::new(name, value));
    }

    /// Replace every header named `name` with a single one.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        self.remove(&name);
        self.entries.push(Header::new(name, value));
    }

    /// Builder-style [`set`](HeaderMap::set).
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    /// Get the first value for `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|h| h.name.eq_ignore_ascii_case(name))
            .map(|h| h.value.as_str())
    }

    /// Get all values for `name`, in insertion order.
    pub fn get_all(&self, name: &str) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|h| h.name.eq_ignore_ascii_case(name))
            .map(|h| h.value.as_str())
            .collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|h| h.name.eq_ignore_ascii_case(name))
    }

    /// Remove every header named `name`, returning how many were dropped.
    pub fn remove(&mut self, name: &str) -> usize {
        let before = self.entries.len();
        self.entries.retain(|h| !h.name.eq_ignore_ascii_case(name));
        before - self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Header> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<Header> for HeaderMap {
    fn from_iter<I: IntoIterator<Item = Header>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<N: Into<String>, V: Into<String>> FromIterator<(N, V)> for HeaderMap {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        iter.into_iter().map(|(n, v)| Header::new(n, v)).collect()
    }
}

impl IntoIterator for HeaderMap {
    type Item = Header;
    type IntoIter = std::vec::IntoIter<Header>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_get_ignore_case() {
        let mut map = HeaderMap::new();
        map.insert("Content-Type", "text/html");
        assert_eq!(map.get("content-type"), Some("text/html"));
        assert_eq!(map.get("CONTENT-TYPE"), Some("text/html"));
        assert_eq!(map.get("x-missing"), None);
    }

    #[test]
    fn duplicates_are_kept_in_order() {
        let mut map = HeaderMap::new();
        map.insert("Set-Cookie", "a=1");
        map.insert("set-cookie", "b=2");

        assert_eq!(map.get("Set-Cookie"), Some("a=1"));
        assert_eq!(map.get_all("SET-COOKIE"), vec!["a=1", "b=2"]);
    }

    #[test]
    fn set_replaces_all_values() {
        let mut map = HeaderMap::new();
        map.insert("Accept", "text/html");
        map.insert("accept", "*/*");
        map.insert("Host", "example.com");

        map.set("ACCEPT", "application/json");
        assert_eq!(map.get_all("accept"), vec!["application/json"]);
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn remove_reports_count() {
        let mut map: HeaderMap = [("a", "1"), ("A", "2"), ("b", "3")].into_iter().collect();
        assert_eq!(map.remove("a"), 2);
        assert_eq!(map.remove("a"), 0);
        assert!(!map.contains("a"));
        assert!(map.contains("B"));
    }

    #[test]
    fn len_and_empty() {
        let mut map = HeaderMap::new();
        assert!(map.is_empty());
        map.insert("X-Test", "1");
        assert!(!map.is_empty());
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn with_builds_and_into_iter_preserves_order() {
        let map = HeaderMap::new().with("A", "1").with("B", "2");
        let names: Vec<String> = map.into_iter().map(|h| h.name).collect();
        assert_eq!(names, vec!["A", "B"]);
    }
}
