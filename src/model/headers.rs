//! Ordered header map with case-insensitive, last-occurrence-wins lookup.

/// Decoded message headers in their original order.
///
/// Names are stored lower-cased; values are stored fully decoded
/// (folding joined, RFC 2047 encoded-words resolved). Repeated names
/// are all kept, but [`HeaderMap::get`] returns the last occurrence.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct HeaderMap {
    entries: Vec<(String, String)>,
}

impl HeaderMap {
    /// Create an empty header map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a header. The name is lower-cased.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries.push((name.into().to_lowercase(), value.into()));
    }

    /// Value of the last occurrence of `name` (case-insensitive).
    pub fn get(&self, name: &str) -> Option<&str> {
        let name = name.to_lowercase();
        self.entries
            .iter()
            .rev()
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Whether any occurrence of `name` exists.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Iterate over `(name, value)` pairs in original order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of stored header lines (repeats included).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map holds no headers.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
