//! Observed values for one submission cycle, as read from `data.yml`

use super::config::load_yaml;
use super::Result;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

/// Metric key to observed value
///
/// Backed by a [BTreeMap] so every traversal is sorted by key
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct PerformanceData(pub BTreeMap<String, f64>);

impl PerformanceData {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        load_yaml(path.as_ref())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(key, value)| (key.as_str(), *value))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for PerformanceData {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(key, value)| (key.into(), value)).collect())
    }
}
