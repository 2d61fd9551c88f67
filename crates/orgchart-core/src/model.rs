use crate::partition::Partition;
use crate::{Error, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Header of the required title column.
pub const TITLE_COLUMN: &str = "Title";
/// Header of the required manager column.
pub const MANAGER_TITLE_COLUMN: &str = "Manager Title";

/// One employee row reduced to the two fields the hierarchy cares about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeRecord {
    pub title: String,
    /// `None` marks a root.
    pub manager_title: Option<String>,
}

impl EmployeeRecord {
    pub fn new(title: impl Into<String>, manager_title: Option<impl Into<String>>) -> Self {
        Self {
            title: title.into(),
            manager_title: manager_title.map(Into::into),
        }
    }

    pub fn root(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            manager_title: None,
        }
    }

    pub fn reporting_to(title: impl Into<String>, manager_title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            manager_title: Some(manager_title.into()),
        }
    }
}

/// An input row: a record plus its location membership flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    pub record: EmployeeRecord,
    pub locations: IndexMap<String, bool>,
}

impl Row {
    pub fn in_location(&self, location: &str) -> bool {
        self.locations.get(location).copied().unwrap_or(false)
    }
}

/// The ingested table with its dynamic location columns resolved to a fixed schema.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowSet {
    pub location_columns: Vec<String>,
    pub rows: Vec<Row>,
}

impl RowSet {
    pub fn new(location_columns: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            location_columns: location_columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Appends a row member of the given locations. Unknown location names are ignored.
    pub fn push(&mut self, record: EmployeeRecord, member_of: &[&str]) -> &mut Self {
        let locations = self
            .location_columns
            .iter()
            .map(|column| (column.clone(), member_of.contains(&column.as_str())))
            .collect();
        self.rows.push(Row { record, locations });
        self
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns the rows flagged for `location`, in row order.
    pub fn partition(&self, location: &str) -> Result<Partition> {
        if !self.location_columns.iter().any(|c| c == location) {
            return Err(Error::UnknownPartition {
                name: location.to_string(),
            });
        }
        Ok(self.collect_partition(location))
    }

    /// One partition per location column, in header order.
    pub fn partitions(&self) -> Vec<Partition> {
        self.location_columns
            .iter()
            .map(|location| self.collect_partition(location))
            .collect()
    }

    fn collect_partition(&self, location: &str) -> Partition {
        let records = self
            .rows
            .iter()
            .filter(|row| row.in_location(location))
            .map(|row| row.record.clone());
        Partition::new(location, records)
    }
}
