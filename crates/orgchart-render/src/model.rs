use serde::{Deserialize, Serialize};

/// Id of the canvas root cell of every page.
pub const CANVAS_ROOT_ID: u64 = 0;
/// Id of the default layer; every node and edge is parented to it.
pub const DEFAULT_LAYER_ID: u64 = 1;
/// First id handed out to nodes.
pub const FIRST_CELL_ID: u64 = 2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn from_points(points: impl IntoIterator<Item = (f64, f64)>) -> Option<Self> {
        let mut it = points.into_iter();
        let (x0, y0) = it.next()?;
        let mut b = Self {
            min_x: x0,
            min_y: y0,
            max_x: x0,
            max_y: y0,
        };
        for (x, y) in it {
            b.min_x = b.min_x.min(x);
            b.min_y = b.min_y.min(y);
            b.max_x = b.max_x.max(x);
            b.max_y = b.max_y.max(y);
        }
        Some(b)
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutNode {
    pub id: u64,
    pub title: String,
    pub depth: usize,
    /// Position within the level, left to right.
    pub index: usize,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub fill: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutEdge {
    pub id: u64,
    pub source: u64,
    pub target: u64,
    pub source_title: String,
    pub target_title: String,
}

/// A positioned partition, ready to be serialized as one diagram page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrgChartLayout {
    pub partition: String,
    pub nodes: Vec<LayoutNode>,
    pub edges: Vec<LayoutEdge>,
    pub bounds: Option<Bounds>,
}

impl OrgChartLayout {
    pub fn node(&self, title: &str) -> Option<&LayoutNode> {
        self.nodes.iter().find(|n| n.title == title)
    }

    pub fn node_by_id(&self, id: u64) -> Option<&LayoutNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Edges pointing at `title`.
    pub fn incoming(&self, title: &str) -> impl Iterator<Item = &LayoutEdge> {
        self.edges.iter().filter(move |e| e.target_title == title)
    }
}
