use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::config::DEFAULT_NAMESPACE;

/// What to look for: a namespace, an optional name regex and the labels a
/// pod must carry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionCriteria {
    pub namespace: String,

    /// Regex searched anywhere in the pod name. `None` or empty matches all.
    #[serde(default)]
    pub name_pattern: Option<String>,

    /// Every entry must be present on the pod with an equal value.
    /// `None` matches no pods at all; an empty map matches any labelled pod.
    #[serde(default)]
    pub labels: Option<BTreeMap<String, String>>,
}

impl SelectionCriteria {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name_pattern: None,
            labels: None,
        }
    }

    pub fn with_name_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.name_pattern = Some(pattern.into());
        self
    }

    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels
            .get_or_insert_with(BTreeMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Require no particular label: every labelled Running pod qualifies.
    pub fn with_any_labels(mut self) -> Self {
        self.labels.get_or_insert_with(BTreeMap::new);
        self
    }

    pub fn with_labels<I, K, V>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.labels
            .get_or_insert_with(BTreeMap::new)
            .extend(labels.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }
}

impl Default for SelectionCriteria {
    fn default() -> Self {
        Self::new(DEFAULT_NAMESPACE)
    }
}
