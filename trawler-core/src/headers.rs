//! Case-insensitive HTTP header multi-map.
//!
//! Headers are kept as an ordered list of name/value pairs with inline
//! storage for the common case, so a typical response never touches the
//! heap for its header block. Names compare ASCII case-insensitively;
//! insertion order is preserved, and a name may appear more than once
//! (`Set-Cookie`, `Content-Encoding` across several lines, ...).

use smallvec::SmallVec;
use std::fmt;

/// Headers stored inline before spilling to the heap. Crawled responses
/// usually carry fewer than eight.
const INLINE_HEADERS: usize = 8;

/// A single name/value pair.
#[derive(Clone, PartialEq, Eq)]
struct Header {
    name: String,
    value: String,
}

impl Header {
    #[inline]
    fn name_eq(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }
}

impl fmt::Debug for Header {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.value)
    }
}

/// An ordered, case-insensitive header multi-map.
///
/// # Example
///
/// ```
/// use trawler_core::HeaderMap;
///
/// let mut headers = HeaderMap::new();
/// headers.insert("Content-Type", "text/html");
/// headers.append("Content-Encoding", "gzip");
/// headers.append("Content-Encoding", "br");
///
/// assert_eq!(headers.get("content-type"), Some("text/html"));
/// assert_eq!(headers.get_all("CONTENT-ENCODING"), vec!["gzip", "br"]);
/// ```
#[derive(Clone, Default, PartialEq, Eq)]
pub struct HeaderMap {
    inner: SmallVec<[Header; INLINE_HEADERS]>,
}

impl HeaderMap {
    /// Create an empty header map.
    #[inline]
    pub fn new() -> Self {
        Self {
            inner: SmallVec::new(),
        }
    }

    /// Number of header lines.
    #[inline]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Whether the map holds no headers.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// First value for `name`, case-insensitive.
    #[inline]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.inner
            .iter()
            .find(|h| h.name_eq(name))
            .map(|h| h.value.as_str())
    }

    /// Every value for `name`, in insertion order.
    pub fn get_all(&self, name: &str) -> Vec<&str> {
        self.inner
            .iter()
            .filter(|h| h.name_eq(name))
            .map(|h| h.value.as_str())
            .collect()
    }

    /// Every value for `name` read as a comma-separated list: values are
    /// split on `,`, trimmed, and empty items dropped, preserving order
    /// across lines. Headers defined as `#`-lists (`Content-Encoding`,
    /// `Via`, ...) read the same whether they arrive as one joined line or
    /// as several.
    pub fn get_comma_list(&self, name: &str) -> Vec<String> {
        self.inner
            .iter()
            .filter(|h| h.name_eq(name))
            .flat_map(|h| h.value.split(','))
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_owned)
            .collect()
    }

    /// Whether any header with this name exists.
    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.inner.iter().any(|h| h.name_eq(name))
    }

    /// Set `name` to `value`, replacing every existing line with that name.
    /// Returns the first replaced value, if any.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let name = name.into();
        let value = value.into();
        let old = self.remove_all_collect_first(&name);
        self.inner.push(Header { name, value });
        old
    }

    /// Add a header line without touching existing lines with the same name.
    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.inner.push(Header {
            name: name.into(),
            value: value.into(),
        });
    }

    /// Insert only when no header with this name exists. Returns `true`
    /// when the value was inserted.
    pub fn set_default(&mut self, name: impl Into<String>, value: impl Into<String>) -> bool {
        let name = name.into();
        if self.contains(&name) {
            return false;
        }
        self.inner.push(Header {
            name,
            value: value.into(),
        });
        true
    }

    /// Remove the first header with this name, returning its value.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        let pos = self.inner.iter().position(|h| h.name_eq(name))?;
        Some(self.inner.remove(pos).value)
    }

    /// Remove every header with this name, returning how many were removed.
    pub fn remove_all(&mut self, name: &str) -> usize {
        let before = self.inner.len();
        self.inner.retain(|h| !h.name_eq(name));
        before - self.inner.len()
    }

    fn remove_all_collect_first(&mut self, name: &str) -> Option<String> {
        let mut first = None;
        self.inner.retain(|h| {
            if h.name_eq(name) {
                if first.is_none() {
                    first = Some(h.value.clone());
                }
                false
            } else {
                true
            }
        });
        first
    }

    /// Iterate over `(name, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.inner
            .iter()
            .map(|h| (h.name.as_str(), h.value.as_str()))
    }

    // Accessors for the headers a crawl pipeline reads constantly.

    /// `Content-Type` value.
    #[inline]
    pub fn content_type(&self) -> Option<&str> {
        self.get("Content-Type")
    }

    /// `Content-Length` parsed as a byte count.
    #[inline]
    pub fn content_length(&self) -> Option<usize> {
        self.get("Content-Length")?.trim().parse().ok()
    }

    /// `Content-Disposition` value.
    #[inline]
    pub fn content_disposition(&self) -> Option<&str> {
        self.get("Content-Disposition")
    }
}

impl fmt::Debug for HeaderMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.inner.iter().map(|h| (&h.name, &h.value)))
            .finish()
    }
}

impl<K, V> FromIterator<(K, V)> for HeaderMap
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = HeaderMap::new();
        for (name, value) in iter {
            map.append(name, value);
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_is_case_insensitive() {
        let mut headers = HeaderMap::new();
        headers.insert("Content-Type", "text/html");

        assert_eq!(headers.get("content-type"), Some("text/html"));
        assert_eq!(headers.get("CONTENT-TYPE"), Some("text/html"));
        assert!(headers.contains("cOnTeNt-TyPe"));
        assert_eq!(headers.get("Content-Length"), None);
    }

    #[test]
    fn insert_replaces_every_line() {
        let mut headers = HeaderMap::new();
        headers.append("Set-Cookie", "a=1");
        headers.append("set-cookie", "b=2");

        let old = headers.insert("Set-Cookie", "c=3");
        assert_eq!(old, Some("a=1".to_string()));
        assert_eq!(headers.get_all("Set-Cookie"), vec!["c=3"]);
    }

    #[test]
    fn append_keeps_duplicates_in_order() {
        let mut headers = HeaderMap::new();
        headers.append("Content-Encoding", "gzip");
        headers.append("Content-Encoding", "br");

        assert_eq!(headers.get("Content-Encoding"), Some("gzip"));
        assert_eq!(headers.get_all("content-encoding"), vec!["gzip", "br"]);
    }

    #[test]
    fn set_default_never_overwrites() {
        let mut headers = HeaderMap::new();
        assert!(headers.set_default("Accept-Encoding", "gzip, deflate"));
        assert!(!headers.set_default("accept-encoding", "identity"));
        assert_eq!(headers.get("Accept-Encoding"), Some("gzip, deflate"));
    }

    #[test]
    fn comma_list_spans_lines_and_joined_values() {
        let mut headers = HeaderMap::new();
        headers.append("Content-Encoding", "gzip, deflate");
        headers.append("Content-Encoding", "br");

        assert_eq!(
            headers.get_comma_list("Content-Encoding"),
            vec!["gzip", "deflate", "br"]
        );
    }

    #[test]
    fn comma_list_trims_and_drops_empty_items() {
        let mut headers = HeaderMap::new();
        headers.insert("Content-Encoding", " gzip , , deflate ");

        assert_eq!(
            headers.get_comma_list("Content-Encoding"),
            vec!["gzip", "deflate"]
        );
        assert!(headers.get_comma_list("Accept").is_empty());
    }

    #[test]
    fn remove_and_remove_all() {
        let mut headers = HeaderMap::new();
        headers.append("Via", "1.1 a");
        headers.append("via", "1.1 b");
        headers.insert("Host", "example.com");

        assert_eq!(headers.remove("Via"), Some("1.1 a".to_string()));
        assert_eq!(headers.get_all("Via"), vec!["1.1 b"]);
        assert_eq!(headers.remove_all("VIA"), 1);
        assert!(!headers.contains("Via"));
        assert_eq!(headers.len(), 1);
    }

    #[test]
    fn content_length_parses() {
        let mut headers = HeaderMap::new();
        headers.insert("Content-Length", " 1024 ");
        assert_eq!(headers.content_length(), Some(1024));

        headers.insert("Content-Length", "not a number");
        assert_eq!(headers.content_length(), None);
    }

    #[test]
    fn from_iterator_preserves_order() {
        let headers: HeaderMap = [("A", "1"), ("B", "2"), ("a", "3")].into_iter().collect();
        let pairs: Vec<_> = headers.iter().collect();
        assert_eq!(pairs, vec![("A", "1"), ("B", "2"), ("a", "3")]);
        assert_eq!(headers.get_all("a"), vec!["1", "3"]);
    }
}
