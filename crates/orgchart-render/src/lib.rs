#![forbid(unsafe_code)]

//! Headless grid layout + draw.io serializer for resolved org chart hierarchies.

pub mod drawio;
pub mod layout;
pub mod model;
pub mod options;
mod util;

pub use drawio::{render_chart, render_drawio};
pub use layout::layout_partition;
pub use model::{Bounds, LayoutEdge, LayoutNode, OrgChartLayout};
pub use options::{LayoutOptions, Palette};

use orgchart_core::{Partition, RootOverrides};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] orgchart_core::Error),
    #[error("invalid layout options: {message}")]
    Config { message: String },
    #[error("layout options JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("layout options YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Resolves `partition` with `overrides` applied and lays it out.
pub fn layout_with_overrides(
    partition: Partition,
    overrides: &RootOverrides,
    options: &LayoutOptions,
) -> Result<OrgChartLayout> {
    let resolved = orgchart_core::resolve(partition, overrides)?;
    Ok(layout_partition(&resolved, options))
}
