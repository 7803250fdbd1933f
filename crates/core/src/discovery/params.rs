//! Query-string assembly with percent-encoding.

use std::borrow::Cow;

/// Genre filter on `/discover/movie`.
pub const WITH_GENRES: &str = "with_genres";
/// Cast/crew filter on `/discover/movie`.
pub const WITH_PEOPLE: &str = "with_people";

/// Ordered key/value pairs destined for a URL query string.
///
/// Values are kept raw and encoded only when the query string is rendered,
/// so nothing un-encoded can leak into a URL built from this type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a parameter. Duplicate keys are kept in insertion order.
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.pairs.push((key.into(), value.into()));
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.pairs.iter().any(|(k, _)| k == key)
    }

    /// Raw (unencoded) value of the first parameter named `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// `k1=v1&k2=v2` with keys and values percent-encoded.
    pub fn to_query_string(&self) -> String {
        self.pairs
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Append the rendered parameters to `base`.
    ///
    /// Picks `?` or `&` depending on whether `base` already carries a query
    /// string. An empty parameter list returns `base` unchanged.
    pub fn append_to(&self, base: &str) -> String {
        if self.is_empty() {
            return base.to_string();
        }

        let separator = if base.ends_with('?') || base.ends_with('&') {
            ""
        } else if base.contains('?') {
            "&"
        } else {
            "?"
        };

        format!("{}{}{}", base, separator, self.to_query_string())
    }
}

/// Percent-encode one query component.
pub fn encode_component(value: &str) -> Cow<'_, str> {
    urlencoding::encode(value)
}

/// Reverse [`encode_component`]. Returns `None` if the decoded bytes are not UTF-8.
pub fn decode_component(value: &str) -> Option<String> {
    urlencoding::decode(value).ok().map(Cow::into_owned)
}
