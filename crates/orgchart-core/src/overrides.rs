//! Caller-supplied manager corrections for orphaned titles.

use crate::Result;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// The literal used by override inputs to mean "no manager".
pub const ROOT_SENTINEL: &str = "None";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ManagerOverride {
    /// Detach the title from its manager, making it a root.
    Root,
    /// Report to another title of the same partition.
    ReportTo(String),
}

impl ManagerOverride {
    pub fn parse(raw: &str) -> Self {
        Self::from(raw.to_string())
    }

    /// The effective manager after applying this override.
    pub fn manager_title(&self) -> Option<&str> {
        match self {
            Self::Root => None,
            Self::ReportTo(title) => Some(title.as_str()),
        }
    }
}

impl From<String> for ManagerOverride {
    fn from(value: String) -> Self {
        if value == ROOT_SENTINEL {
            Self::Root
        } else {
            Self::ReportTo(value)
        }
    }
}

impl From<ManagerOverride> for String {
    fn from(value: ManagerOverride) -> Self {
        match value {
            ManagerOverride::Root => ROOT_SENTINEL.to_string(),
            ManagerOverride::ReportTo(title) => title,
        }
    }
}

/// `title -> override` for a single partition. Iteration follows insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RootOverrides(IndexMap<String, ManagerOverride>);

impl RootOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, title: impl Into<String>, value: ManagerOverride) -> &mut Self {
        self.0.insert(title.into(), value);
        self
    }

    pub fn get(&self, title: &str) -> Option<&ManagerOverride> {
        self.0.get(title)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ManagerOverride)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, ManagerOverride)> for RootOverrides {
    fn from_iter<T: IntoIterator<Item = (K, ManagerOverride)>>(iter: T) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// Overrides for every partition of a row set, keyed by partition name.
///
/// The on-disk form is a nested map, e.g. `{"Riyadh": {"Contractor": "None"}}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PartitionOverrides(IndexMap<String, RootOverrides>);

impl PartitionOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_yaml_str(text: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn insert(
        &mut self,
        partition: impl Into<String>,
        title: impl Into<String>,
        value: ManagerOverride,
    ) -> &mut Self {
        self.0
            .entry(partition.into())
            .or_default()
            .insert(title, value);
        self
    }

    /// Merges `other` into `self`; entries from `other` win.
    pub fn extend(&mut self, other: PartitionOverrides) {
        for (partition, overrides) in other.0 {
            let slot = self.0.entry(partition).or_default();
            for (title, value) in overrides.0 {
                slot.0.insert(title, value);
            }
        }
    }

    pub fn for_partition(&self, partition: &str) -> Option<&RootOverrides> {
        self.0.get(partition)
    }

    pub fn is_empty(&self) -> bool {
        self.0.values().all(RootOverrides::is_empty)
    }
}
