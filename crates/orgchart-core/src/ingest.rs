//! CSV ingestion into a [`RowSet`].
//!
//! Expected shape: a header row with `Title` and `Manager Title`; every other column is a
//! location whose cells hold numbers (`> 0` means the row belongs to that location).

use crate::model::{EmployeeRecord, MANAGER_TITLE_COLUMN, Row, RowSet, TITLE_COLUMN};
use crate::{Error, Result};
use indexmap::IndexMap;
use std::io::Read;

impl RowSet {
    pub fn from_csv_str(text: &str) -> Result<Self> {
        Self::from_csv_reader(text.as_bytes())
    }

    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(reader);

        let headers = reader.headers()?.clone();
        let title_idx = headers
            .iter()
            .position(|h| h == TITLE_COLUMN)
            .ok_or(Error::MissingColumn {
                column: TITLE_COLUMN,
            })?;
        let manager_idx = headers
            .iter()
            .position(|h| h == MANAGER_TITLE_COLUMN)
            .ok_or(Error::MissingColumn {
                column: MANAGER_TITLE_COLUMN,
            })?;

        let location_columns: Vec<(usize, String)> = headers
            .iter()
            .enumerate()
            .filter(|(idx, _)| *idx != title_idx && *idx != manager_idx)
            .map(|(idx, name)| (idx, name.to_string()))
            .collect();

        let mut out = RowSet {
            location_columns: location_columns.iter().map(|(_, n)| n.clone()).collect(),
            rows: Vec::new(),
        };

        for (idx, result) in reader.records().enumerate() {
            // 1-based, counting the header line.
            let line = idx + 2;
            let record = result?;

            let title = record.get(title_idx).unwrap_or_default();
            if title.is_empty() {
                tracing::warn!(row = line, "skipping row without a title");
                continue;
            }
            let manager_title = record
                .get(manager_idx)
                .filter(|m| !m.is_empty())
                .map(str::to_string);

            let mut locations = IndexMap::with_capacity(location_columns.len());
            for (col_idx, name) in &location_columns {
                let raw = record.get(*col_idx).unwrap_or_default();
                let flag = parse_flag(raw).ok_or_else(|| Error::InvalidFlag {
                    row: line,
                    column: name.clone(),
                    value: raw.to_string(),
                })?;
                locations.insert(name.clone(), flag);
            }

            out.rows.push(Row {
                record: EmployeeRecord {
                    title: title.to_string(),
                    manager_title,
                },
                locations,
            });
        }

        tracing::debug!(
            rows = out.rows.len(),
            locations = out.location_columns.len(),
            "ingested row set"
        );
        Ok(out)
    }
}

/// Interprets a location cell. Blank cells are `false`; numbers are members when `> 0`.
pub fn parse_flag(raw: &str) -> Option<bool> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Some(false);
    }
    if raw.eq_ignore_ascii_case("true") {
        return Some(true);
    }
    if raw.eq_ignore_ascii_case("false") {
        return Some(false);
    }
    let n = raw.parse::<f64>().ok()?;
    Some(n > 0.0)
}
