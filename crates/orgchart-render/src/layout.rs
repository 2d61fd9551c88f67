//! Grid placement for a resolved hierarchy.
//!
//! Each depth is one horizontal band; titles of a level are laid left to right in level order.
//! Parents are not re-centered over their children and nothing is done about crossings.

use crate::model::{Bounds, FIRST_CELL_ID, LayoutEdge, LayoutNode, OrgChartLayout};
use crate::options::LayoutOptions;
use orgchart_core::ResolvedHierarchy;
use rustc_hash::FxHashMap;

pub fn layout_partition(resolved: &ResolvedHierarchy, options: &LayoutOptions) -> OrgChartLayout {
    let mut next_id = FIRST_CELL_ID;
    let mut ids: FxHashMap<&str, u64> = FxHashMap::default();
    let mut nodes: Vec<LayoutNode> = Vec::with_capacity(resolved.len());

    for (&depth, titles) in &resolved.levels {
        for (index, title) in titles.iter().enumerate() {
            let id = next_id;
            next_id += 1;
            ids.insert(title.as_str(), id);
            nodes.push(LayoutNode {
                id,
                title: title.clone(),
                depth,
                index,
                x: index as f64 * options.column_spacing,
                y: depth as f64 * options.row_spacing,
                width: options.node_width,
                height: options.node_height,
                fill: options.palette.fill_for_depth(depth).to_string(),
            });
        }
    }

    let mut edges: Vec<LayoutEdge> = Vec::new();
    for record in &resolved.records {
        let Some(manager) = record.manager_title.as_deref() else {
            continue;
        };
        let (Some(&source), Some(&target)) = (ids.get(manager), ids.get(record.title.as_str()))
        else {
            tracing::debug!(
                partition = %resolved.partition,
                title = %record.title,
                manager,
                "manager has no node; edge skipped"
            );
            continue;
        };
        edges.push(LayoutEdge {
            id: next_id,
            source,
            target,
            source_title: manager.to_string(),
            target_title: record.title.clone(),
        });
        next_id += 1;
    }

    let bounds = Bounds::from_points(
        nodes
            .iter()
            .flat_map(|n| [(n.x, n.y), (n.x + n.width, n.y + n.height)]),
    );

    tracing::debug!(
        partition = %resolved.partition,
        nodes = nodes.len(),
        edges = edges.len(),
        "laid out partition"
    );

    OrgChartLayout {
        partition: resolved.partition.clone(),
        nodes,
        edges,
        bounds,
    }
}
