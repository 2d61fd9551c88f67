#![forbid(unsafe_code)]

//! Org chart row model + hierarchy resolver (headless).
//!
//! Pipeline: a [`RowSet`] (title, manager title, location flags) is split into one
//! [`Partition`] per location; each partition gets its [`RootOverrides`] applied and is ranked
//! into a [`ResolvedHierarchy`] (depth per title, titles grouped by depth).
//!
//! Design goals:
//! - deterministic outputs (row order is preserved everywhere; no hashing order leaks out)
//! - partitions are independent; no state survives a call

pub mod error;
pub mod ingest;
pub mod model;
pub mod overrides;
pub mod partition;
pub mod resolve;

pub use error::{Error, Result};
pub use model::{EmployeeRecord, MANAGER_TITLE_COLUMN, Row, RowSet, TITLE_COLUMN};
pub use overrides::{ManagerOverride, PartitionOverrides, ROOT_SENTINEL, RootOverrides};
pub use partition::{Orphan, Partition};
pub use resolve::{ResolvedHierarchy, resolve};
