//! Common types used throughout the MWS integration.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// An ordered set of query parameters.
///
/// Keys iterate in byte-wise ascending order regardless of insertion order,
/// which is exactly the ordering the canonical signer requires. Two parameter
/// lists built from the same key/value pairs in any order compare equal and
/// serialize identically.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterList {
    entries: BTreeMap<String, String>,
}

impl ParameterList {
    /// Create an empty parameter list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a parameter, replacing any existing value for the key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert an indexed composite list: `prefix.1`, `prefix.2`, ...
    ///
    /// Indexing is 1-based, matching the service's list-parameter convention
    /// (e.g. `ASINList.ASIN.1`).
    pub fn insert_indexed<I, V>(&mut self, prefix: &str, values: I)
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        for (index, value) in values.into_iter().enumerate() {
            self.insert(format!("{}.{}", prefix, index + 1), value);
        }
    }

    /// Insert every default that is not already present.
    ///
    /// Caller-supplied parameters always win over defaults.
    pub fn merge_defaults<I, K, V>(&mut self, defaults: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (key, value) in defaults {
            let key = key.into();
            if !self.entries.contains_key(&key) {
                self.entries.insert(key, value.into());
            }
        }
    }

    /// Remove a parameter, returning its value if it was present.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.entries.remove(key)
    }

    /// Remove every parameter whose key starts with `prefix`.
    pub fn remove_prefixed(&mut self, prefix: &str) {
        self.entries.retain(|key, _| !key.starts_with(prefix));
    }

    /// Look up a parameter value.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Whether a parameter with this exact key is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Whether any parameter key starts with `prefix`.
    pub fn contains_prefixed(&self, prefix: &str) -> bool {
        self.entries.keys().any(|key| key.starts_with(prefix))
    }

    /// Iterate entries in byte-wise ascending key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    /// Number of parameters.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the list is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for ParameterList
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = ParameterList::new();
        for (key, value) in iter {
            params.insert(key, value);
        }
        params
    }
}

/// Submission receipt returned by the service when a feed is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedSubmissionInfo {
    /// Identifier used to poll for the processing result.
    pub feed_submission_id: String,
    /// The feed type that was submitted.
    pub feed_type: Option<String>,
    /// When the service recorded the submission.
    pub submitted_date: Option<String>,
    /// Processing status at submission time (normally `_SUBMITTED_`).
    pub feed_processing_status: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insertion_order_is_irrelevant() {
        let mut forward = ParameterList::new();
        forward.insert("Alpha", "1");
        forward.insert("Beta", "2");

        let mut backward = ParameterList::new();
        backward.insert("Beta", "2");
        backward.insert("Alpha", "1");

        assert_eq!(forward, backward);
        let keys: Vec<_> = backward.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["Alpha", "Beta"]);
    }

    #[test]
    fn test_insert_indexed_is_one_based() {
        let mut params = ParameterList::new();
        params.insert_indexed("ASINList.ASIN", ["B000000001", "B000000002"]);

        assert_eq!(params.get("ASINList.ASIN.1"), Some("B000000001"));
        assert_eq!(params.get("ASINList.ASIN.2"), Some("B000000002"));
        assert!(!params.contains_key("ASINList.ASIN.0"));
    }

    #[test]
    fn test_merge_defaults_keeps_caller_values() {
        let mut params = ParameterList::new();
        params.insert("Action", "CallerAction");
        params.merge_defaults([("Action", "DefaultAction"), ("Version", "2009-01-01")]);

        assert_eq!(params.get("Action"), Some("CallerAction"));
        assert_eq!(params.get("Version"), Some("2009-01-01"));
    }

    #[test]
    fn test_remove_prefixed() {
        let mut params = ParameterList::new();
        params.insert("MarketplaceId.Id.1", "A");
        params.insert("MarketplaceId.Id.2", "B");
        params.insert("MarketplaceId", "C");
        params.remove_prefixed("MarketplaceId.Id.");

        assert!(!params.contains_prefixed("MarketplaceId.Id."));
        assert_eq!(params.get("MarketplaceId"), Some("C"));
    }
}
