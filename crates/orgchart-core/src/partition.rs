use crate::model::EmployeeRecord;
use crate::overrides::{ROOT_SENTINEL, RootOverrides};
use rustc_hash::FxHashSet;
use serde::Serialize;

/// The records of one location, processed as an independent hierarchy.
///
/// Titles are unique: when the input repeats a title, the first row wins and the later ones are
/// dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Partition {
    name: String,
    records: Vec<EmployeeRecord>,
}

/// A title whose stated manager is not part of the same partition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Orphan {
    pub title: String,
    pub stated_manager: String,
    /// Replacement managers: the root sentinel first, then every other title of the partition,
    /// sorted. The orphan itself is left out since reporting to itself is a cycle.
    pub candidates: Vec<String>,
}

impl Partition {
    pub fn new(name: impl Into<String>, records: impl IntoIterator<Item = EmployeeRecord>) -> Self {
        let name = name.into();
        let mut seen: FxHashSet<String> = FxHashSet::default();
        let mut kept = Vec::new();
        for record in records {
            if !seen.insert(record.title.clone()) {
                tracing::warn!(
                    partition = %name,
                    title = %record.title,
                    "duplicate title; keeping the first row"
                );
                continue;
            }
            kept.push(record);
        }
        Self {
            name,
            records: kept,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn records(&self) -> &[EmployeeRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<EmployeeRecord> {
        self.records
    }

    pub fn titles(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|r| r.title.as_str())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn contains(&self, title: &str) -> bool {
        self.records.iter().any(|r| r.title == title)
    }

    pub fn get(&self, title: &str) -> Option<&EmployeeRecord> {
        self.records.iter().find(|r| r.title == title)
    }

    /// Titles whose manager is set but absent from this partition, in row order.
    pub fn orphans(&self) -> Vec<Orphan> {
        let titles: FxHashSet<&str> = self.titles().collect();
        let mut sorted: Vec<&str> = titles.iter().copied().collect();
        sorted.sort_unstable();

        self.records
            .iter()
            .filter_map(|record| {
                let manager = record.manager_title.as_deref()?;
                if titles.contains(manager) {
                    return None;
                }
                Some(Orphan {
                    title: record.title.clone(),
                    stated_manager: manager.to_string(),
                    candidates: std::iter::once(ROOT_SENTINEL)
                        .chain(sorted.iter().copied().filter(|t| *t != record.title))
                        .map(str::to_string)
                        .collect(),
                })
            })
            .collect()
    }

    /// Rewrites the manager of every overridden title. Reapplying the same map is a no-op.
    pub fn apply_overrides(&mut self, overrides: &RootOverrides) {
        for (title, value) in overrides.iter() {
            let Some(record) = self.records.iter_mut().find(|r| r.title == title) else {
                tracing::debug!(
                    partition = %self.name,
                    title,
                    "override targets a title outside the partition; ignored"
                );
                continue;
            };
            record.manager_title = value.manager_title().map(str::to_string);
        }
    }
}
