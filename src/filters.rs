//! Server-side list filters.

use std::collections::BTreeMap;

use crate::domain::types::FilterKey;

/// Select value meaning "no restriction"; never transmitted.
pub const ALL_SENTINEL: &str = "all";

/// Query parameters owned by pagination; never accepted as filters.
pub const RESERVED_KEYS: [&str; 2] = ["page", "page_size"];

/// Returns `true` when a filter value carries no restriction.
pub fn is_unset(value: &str) -> bool {
    let value = value.trim();
    value.is_empty() || value.eq_ignore_ascii_case(ALL_SENTINEL)
}

/// Active server-side filters keyed by parameter name.
///
/// Unset values (empty, whitespace or the `all` sentinel) are never stored,
/// so every entry is safe to send as a query parameter.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Filters(BTreeMap<FilterKey, String>);

impl Filters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets or removes a single filter. Blank and pagination keys are
    /// ignored.
    pub fn set(&mut self, key: impl Into<String>, value: Option<impl Into<String>>) {
        let Ok(key) = FilterKey::new(key) else {
            return;
        };
        if RESERVED_KEYS
            .iter()
            .any(|reserved| key.as_str().eq_ignore_ascii_case(reserved))
        {
            log::warn!("Ignoring filter on reserved parameter `{key}`");
            return;
        }
        match value.map(Into::into) {
            Some(value) if !is_unset(&value) => {
                self.0.insert(key, value.trim().to_string());
            }
            _ => {
                self.0.remove(&key);
            }
        }
    }

    /// Builder-style variant of [`Filters::set`].
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, Some(value));
        self
    }

    /// Merges updates into the current set; `None` and unset values remove
    /// the key.
    pub fn merge<I, K, V>(&mut self, updates: I)
    where
        I: IntoIterator<Item = (K, Option<V>)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (key, value) in updates {
            self.set(key, value);
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k.as_str() == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Query parameters in key order.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        self.0
            .iter()
            .map(|(k, v)| (k.as_str().to_string(), v.clone()))
            .collect()
    }
}

impl<K, V> FromIterator<(K, V)> for Filters
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut filters = Filters::new();
        for (key, value) in iter {
            filters.set(key, Some(value));
        }
        filters
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinel_and_blank_values_are_dropped() {
        let filters = Filters::new()
            .with("status", "all")
            .with("category", "  ")
            .with("branch", "ALL")
            .with("type", "inbound");

        assert_eq!(
            filters.query_pairs(),
            vec![("type".to_string(), "inbound".to_string())]
        );
    }

    #[test]
    fn merge_overrides_and_removes() {
        let mut filters = Filters::new().with("status", "active").with("branch", "2");

        filters.merge([("status", Some("archived")), ("branch", None::<&str>)]);
        assert_eq!(filters.get("status"), Some("archived"));
        assert_eq!(filters.get("branch"), None);

        filters.merge([("status", Some("all"))]);
        assert!(filters.is_empty());
    }

    #[test]
    fn pagination_keys_are_not_filters() {
        let mut filters = Filters::new().with("page", "3").with(" PAGE_SIZE ", "50");
        filters.merge([("page", Some("2")), ("status", Some("open"))]);

        assert_eq!(
            filters.query_pairs(),
            vec![("status".to_string(), "open".to_string())]
        );
    }

    #[test]
    fn blank_keys_are_ignored() {
        let filters: Filters = [(" ", "x"), ("q", "y")].into_iter().collect();
        assert_eq!(filters.len(), 1);
        assert_eq!(filters.get("q"), Some("y"));
    }
}
