//! Hierarchy resolver: per-title depth and the level grouping derived from it.
//!
//! The depth of a title counts manager hops while the manager is part of the partition:
//! a root (no manager) has depth 0, and so does an orphan whose manager is missing. The walk
//! stops at the first missing manager without counting that hop.
//!
//! The manager graph must be acyclic. A chain that revisits a title is reported as
//! [`Error::ManagerCycle`].

use crate::model::EmployeeRecord;
use crate::overrides::RootOverrides;
use crate::partition::Partition;
use crate::{Error, Result};
use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedHierarchy {
    pub partition: String,
    /// Records with overrides applied, in row order.
    pub records: Vec<EmployeeRecord>,
    /// Depth per title, in row order.
    pub depths: IndexMap<String, usize>,
    /// Titles per depth, ascending; row order within a level.
    pub levels: BTreeMap<usize, Vec<String>>,
}

impl ResolvedHierarchy {
    pub fn depth_of(&self, title: &str) -> Option<usize> {
        self.depths.get(title).copied()
    }

    pub fn level(&self, depth: usize) -> &[String] {
        self.levels.get(&depth).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn max_depth(&self) -> Option<usize> {
        self.levels.keys().next_back().copied()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Applies `overrides` to `partition` and ranks every title.
pub fn resolve(mut partition: Partition, overrides: &RootOverrides) -> Result<ResolvedHierarchy> {
    partition.apply_overrides(overrides);
    let name = partition.name().to_string();
    let records = partition.into_records();
    let depths = compute_depths(&records)?;

    let mut by_title = IndexMap::with_capacity(records.len());
    let mut levels: BTreeMap<usize, Vec<String>> = BTreeMap::new();
    for (record, depth) in records.iter().zip(depths) {
        by_title.insert(record.title.clone(), depth);
        levels.entry(depth).or_default().push(record.title.clone());
    }

    tracing::debug!(
        partition = %name,
        nodes = records.len(),
        levels = levels.len(),
        "resolved hierarchy"
    );

    Ok(ResolvedHierarchy {
        partition: name,
        records,
        depths: by_title,
        levels,
    })
}

/// Depth per record (same indices as `records`).
///
/// Each walk stops at the first title whose depth is already known, so the whole pass is linear
/// in the number of records.
pub fn compute_depths(records: &[EmployeeRecord]) -> Result<Vec<usize>> {
    let mut index: FxHashMap<&str, usize> = FxHashMap::default();
    for (i, record) in records.iter().enumerate() {
        index.entry(record.title.as_str()).or_insert(i);
    }

    let manager_of = |i: usize| -> Option<usize> {
        let manager = records[i].manager_title.as_deref()?;
        index.get(manager).copied()
    };

    let mut memo: Vec<Option<usize>> = vec![None; records.len()];
    let mut on_path = vec![false; records.len()];
    let mut path: Vec<usize> = Vec::new();

    for start in 0..records.len() {
        if memo[start].is_some() {
            continue;
        }

        let mut cur = start;
        let base = loop {
            if let Some(depth) = memo[cur] {
                break depth;
            }
            if on_path[cur] {
                let from = path.iter().position(|&i| i == cur).unwrap_or(0);
                let mut cycle: Vec<String> = path[from..]
                    .iter()
                    .map(|&i| records[i].title.clone())
                    .collect();
                cycle.push(records[cur].title.clone());
                return Err(Error::ManagerCycle {
                    title: records[start].title.clone(),
                    cycle,
                });
            }
            match manager_of(cur) {
                Some(next) => {
                    on_path[cur] = true;
                    path.push(cur);
                    cur = next;
                }
                None => {
                    memo[cur] = Some(0);
                    break 0;
                }
            }
        };

        let mut depth = base;
        while let Some(i) = path.pop() {
            depth += 1;
            memo[i] = Some(depth);
            on_path[i] = false;
        }
    }

    Ok(memo.into_iter().map(Option::unwrap_or_default).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overrides::ManagerOverride;

    fn partition(records: Vec<EmployeeRecord>) -> Partition {
        Partition::new("HQ", records)
    }

    /// Manager hops counted one lookup at a time.
    fn naive_depth(records: &[EmployeeRecord], title: &str) -> usize {
        let find = |t: &str| records.iter().find(|r| r.title == t);
        let mut level = 0;
        let mut current = title.to_string();
        while let Some(manager) = find(&current).and_then(|r| r.manager_title.clone()) {
            current = manager;
            if find(&current).is_none() {
                break;
            }
            level += 1;
        }
        level
    }

    #[test]
    fn chain_of_three() {
        let resolved = resolve(
            partition(vec![
                EmployeeRecord::root("CEO"),
                EmployeeRecord::reporting_to("VP", "CEO"),
                EmployeeRecord::reporting_to("Eng", "VP"),
            ]),
            &RootOverrides::new(),
        )
        .unwrap();
        assert_eq!(resolved.level(0), ["CEO"]);
        assert_eq!(resolved.level(1), ["VP"]);
        assert_eq!(resolved.level(2), ["Eng"]);
        assert_eq!(resolved.max_depth(), Some(2));
    }

    #[test]
    fn level_order_follows_rows_not_names() {
        let resolved = resolve(
            partition(vec![
                EmployeeRecord::reporting_to("Zed", "CEO"),
                EmployeeRecord::root("CEO"),
                EmployeeRecord::reporting_to("Amy", "CEO"),
                EmployeeRecord::reporting_to("Mid", "CEO"),
            ]),
            &RootOverrides::new(),
        )
        .unwrap();
        assert_eq!(resolved.level(1), ["Zed", "Amy", "Mid"]);
    }

    #[test]
    fn orphan_without_override_is_ranked_as_root() {
        let resolved = resolve(
            partition(vec![
                EmployeeRecord::root("CEO"),
                EmployeeRecord::reporting_to("Contractor", "Ghost"),
                EmployeeRecord::reporting_to("Helper", "Contractor"),
            ]),
            &RootOverrides::new(),
        )
        .unwrap();
        assert_eq!(resolved.level(0), ["CEO", "Contractor"]);
        assert_eq!(resolved.depth_of("Helper"), Some(1));
        // The stated manager is kept; only the ranking treats it as missing.
        assert_eq!(
            resolved.records[1].manager_title.as_deref(),
            Some("Ghost")
        );
    }

    #[test]
    fn walk_stops_before_the_missing_manager() {
        // A -> B -> Ghost: B's hop to Ghost is not counted, A's hop to B is.
        let resolved = resolve(
            partition(vec![
                EmployeeRecord::reporting_to("A", "B"),
                EmployeeRecord::reporting_to("B", "Ghost"),
            ]),
            &RootOverrides::new(),
        )
        .unwrap();
        assert_eq!(resolved.depth_of("B"), Some(0));
        assert_eq!(resolved.depth_of("A"), Some(1));
        assert_eq!(resolved.level(0), ["B"]);
        assert_eq!(resolved.level(1), ["A"]);
    }

    #[test]
    fn override_to_root_detaches_the_orphan() {
        let overrides: RootOverrides = [("Contractor", ManagerOverride::Root)]
            .into_iter()
            .collect();
        let resolved = resolve(
            partition(vec![
                EmployeeRecord::root("CEO"),
                EmployeeRecord::reporting_to("Contractor", "Ghost"),
            ]),
            &overrides,
        )
        .unwrap();
        assert_eq!(resolved.depth_of("Contractor"), Some(0));
        assert_eq!(resolved.records[1].manager_title, None);
    }

    #[test]
    fn override_reattaches_a_whole_subtree() {
        let overrides: RootOverrides = [("Lead", ManagerOverride::parse("VP"))]
            .into_iter()
            .collect();
        let resolved = resolve(
            partition(vec![
                EmployeeRecord::root("CEO"),
                EmployeeRecord::reporting_to("VP", "CEO"),
                EmployeeRecord::reporting_to("Lead", "Ghost"),
                EmployeeRecord::reporting_to("Dev", "Lead"),
            ]),
            &overrides,
        )
        .unwrap();
        assert_eq!(resolved.depth_of("Lead"), Some(2));
        assert_eq!(resolved.depth_of("Dev"), Some(3));
    }

    #[test]
    fn every_title_lands_in_exactly_one_level() {
        let records = vec![
            EmployeeRecord::reporting_to("E", "D"),
            EmployeeRecord::reporting_to("D", "B"),
            EmployeeRecord::root("A"),
            EmployeeRecord::reporting_to("B", "A"),
            EmployeeRecord::reporting_to("C", "A"),
            EmployeeRecord::reporting_to("F", "Ghost"),
            EmployeeRecord::reporting_to("G", "F"),
        ];
        let resolved = resolve(partition(records.clone()), &RootOverrides::new()).unwrap();

        let mut seen: Vec<&str> = resolved
            .levels
            .values()
            .flatten()
            .map(String::as_str)
            .collect();
        seen.sort_unstable();
        assert_eq!(seen, vec!["A", "B", "C", "D", "E", "F", "G"]);

        for record in &records {
            let depth = resolved.depth_of(&record.title).unwrap();
            assert_eq!(depth, naive_depth(&records, &record.title), "{}", record.title);
            assert!(resolved.level(depth).contains(&record.title));
        }
    }

    #[test]
    fn cycles_are_reported() {
        let err = resolve(
            partition(vec![
                EmployeeRecord::root("CEO"),
                EmployeeRecord::reporting_to("A", "B"),
                EmployeeRecord::reporting_to("B", "A"),
            ]),
            &RootOverrides::new(),
        )
        .unwrap_err();
        match err {
            Error::ManagerCycle { title, cycle } => {
                assert_eq!(title, "A");
                assert_eq!(cycle, vec!["A", "B", "A"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn self_reporting_title_is_a_cycle() {
        let err = resolve(
            partition(vec![EmployeeRecord::reporting_to("Solo", "Solo")]),
            &RootOverrides::new(),
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Manager cycle detected while ranking 'Solo': Solo -> Solo"
        );
    }

    #[test]
    fn cycle_introduced_by_override_is_reported() {
        let overrides: RootOverrides = [("CEO", ManagerOverride::parse("VP"))]
            .into_iter()
            .collect();
        let err = resolve(
            partition(vec![
                EmployeeRecord::root("CEO"),
                EmployeeRecord::reporting_to("VP", "CEO"),
            ]),
            &overrides,
        )
        .unwrap_err();
        assert!(matches!(err, Error::ManagerCycle { .. }));
    }

    #[test]
    fn empty_partition_resolves_to_nothing() {
        let resolved = resolve(partition(Vec::new()), &RootOverrides::new()).unwrap();
        assert!(resolved.is_empty());
        assert!(resolved.levels.is_empty());
        assert_eq!(resolved.max_depth(), None);
    }
}
