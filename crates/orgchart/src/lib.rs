#![forbid(unsafe_code)]

//! `orgchart` turns title/manager rows into draw.io org charts, one page per location.
//!
//! The semantic side (ingestion, partitions, orphans, ranking) lives in `orgchart-core` and is
//! re-exported at the crate root; layout and serialization live under [`render`].

pub use orgchart_core::*;

pub mod render {
    pub use orgchart_render::model::{CANVAS_ROOT_ID, DEFAULT_LAYER_ID, FIRST_CELL_ID};
    pub use orgchart_render::{
        Bounds, Error, LayoutEdge, LayoutNode, LayoutOptions, OrgChartLayout, Palette, Result,
        layout_partition, layout_with_overrides, render_chart, render_drawio,
    };
}

use render::{LayoutOptions, OrgChartLayout};

/// One partition, laid out and serialized.
#[derive(Debug, Clone)]
pub struct RenderedChart {
    pub partition: String,
    pub layout: OrgChartLayout,
    /// Standalone single-page draw.io document.
    pub document: String,
}

impl RenderedChart {
    /// `org_chart_<partition>.drawio`, with the partition name made filesystem-safe.
    pub fn file_name(&self) -> String {
        output_file_name(&self.partition)
    }
}

/// Convenience wrapper that bundles layout options for whole-row-set rendering.
///
/// Partitions never share state: each call resolves, lays out, and serializes one location with
/// its own id counter.
#[derive(Debug, Clone, Default)]
pub struct OrgChartRenderer {
    pub options: LayoutOptions,
}

impl OrgChartRenderer {
    pub fn new(options: LayoutOptions) -> Self {
        Self { options }
    }

    pub fn layout(
        &self,
        partition: Partition,
        overrides: &RootOverrides,
    ) -> render::Result<OrgChartLayout> {
        render::layout_with_overrides(partition, overrides, &self.options)
    }

    pub fn render_partition(
        &self,
        partition: Partition,
        overrides: &RootOverrides,
    ) -> render::Result<RenderedChart> {
        let name = partition.name().to_string();
        let orphans = partition.orphans();
        let unresolved = orphans
            .iter()
            .filter(|o| overrides.get(&o.title).is_none())
            .count();
        if unresolved > 0 {
            tracing::info!(
                partition = %name,
                orphans = unresolved,
                "orphans without override are placed as roots"
            );
        }

        let layout = self.layout(partition, overrides)?;
        let document = render::render_chart(&layout, &self.options);
        Ok(RenderedChart {
            partition: name,
            layout,
            document,
        })
    }

    /// Renders every location of `rows`, in header order.
    pub fn render_all(
        &self,
        rows: &RowSet,
        overrides: &PartitionOverrides,
    ) -> render::Result<Vec<RenderedChart>> {
        let empty = RootOverrides::new();
        rows.partitions()
            .into_iter()
            .map(|partition| {
                let o = overrides
                    .for_partition(partition.name())
                    .unwrap_or(&empty)
                    .clone();
                self.render_partition(partition, &o)
            })
            .collect()
    }

    /// One multi-page document holding every location of `rows`.
    pub fn render_combined(
        &self,
        rows: &RowSet,
        overrides: &PartitionOverrides,
    ) -> render::Result<String> {
        let layouts: Vec<OrgChartLayout> = self
            .render_all(rows, overrides)?
            .into_iter()
            .map(|chart| chart.layout)
            .collect();
        Ok(render::render_drawio(&layouts, &self.options))
    }
}

/// Converts a partition name into a conservative file-name stem.
///
/// This helper:
/// - trims whitespace
/// - replaces anything but letters, digits, `.`, `-` and `_` with `_`
/// - collapses repeated `_`
/// - never returns an empty stem or one made only of dots
pub fn sanitize_file_stem(raw: &str) -> String {
    let raw = raw.trim();
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        let ok = ch.is_alphanumeric() || ch == '-' || ch == '_' || ch == '.';
        out.push(if ok { ch } else { '_' });
    }
    while out.contains("__") {
        out = out.replace("__", "_");
    }
    let out = out.trim_matches('_');
    if out.is_empty() || out.chars().all(|c| c == '.') {
        return "untitled".to_string();
    }
    out.to_string()
}

pub fn output_file_name(partition: &str) -> String {
    format!("org_chart_{}.drawio", sanitize_file_stem(partition))
}
