//! draw.io (`mxfile`) serializer.
//!
//! Output shape, two-space indented, one element per line:
//!
//! ```text
//! <mxfile host="app.diagrams.net">
//!   <diagram name="OrgChart_<partition>">
//!     <mxGraphModel>
//!       <root>
//!         <mxCell id="0"/>
//!         <mxCell id="1" parent="0"/>
//!         <mxCell id=".." value=".." style=".." vertex="1" parent="1">  (nodes)
//!         <mxCell id=".." style=".." edge="1" parent="1" source=".." target="..">  (edges)
//! ```
//!
//! The document is plain uncompressed XML, which draw.io opens as-is.

use crate::model::{CANVAS_ROOT_ID, DEFAULT_LAYER_ID, OrgChartLayout};
use crate::options::LayoutOptions;
use crate::util::{escape_attr_into, fmt_number};

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;
const INDENT: &str = "  ";

/// Minimal pretty-printing element writer. Attribute values are escaped; names are trusted.
struct XmlWriter {
    out: String,
    depth: usize,
}

impl XmlWriter {
    fn new() -> Self {
        let mut out = String::with_capacity(4096);
        out.push_str(XML_DECLARATION);
        out.push('\n');
        Self { out, depth: 0 }
    }

    fn start_tag(&mut self, name: &str, attrs: &[(&str, &str)]) {
        for _ in 0..self.depth {
            self.out.push_str(INDENT);
        }
        self.out.push('<');
        self.out.push_str(name);
        for (key, value) in attrs {
            self.out.push(' ');
            self.out.push_str(key);
            self.out.push_str("=\"");
            escape_attr_into(&mut self.out, value);
            self.out.push('"');
        }
    }

    fn open(&mut self, name: &str, attrs: &[(&str, &str)]) {
        self.start_tag(name, attrs);
        self.out.push_str(">\n");
        self.depth += 1;
    }

    fn empty(&mut self, name: &str, attrs: &[(&str, &str)]) {
        self.start_tag(name, attrs);
        self.out.push_str("/>\n");
    }

    fn close(&mut self, name: &str) {
        self.depth = self.depth.saturating_sub(1);
        for _ in 0..self.depth {
            self.out.push_str(INDENT);
        }
        self.out.push_str("</");
        self.out.push_str(name);
        self.out.push_str(">\n");
    }

    fn finish(self) -> String {
        self.out
    }
}

/// Serializes one page per chart into a single `mxfile` document.
///
/// Pages keep their own id space, so ids repeat across pages but never within one.
pub fn render_drawio(charts: &[OrgChartLayout], options: &LayoutOptions) -> String {
    let mut w = XmlWriter::new();
    w.open("mxfile", &[("host", options.host.as_str())]);
    for chart in charts {
        write_diagram(&mut w, chart, options);
    }
    w.close("mxfile");
    w.finish()
}

/// Serializes a single chart as a one-page document.
pub fn render_chart(chart: &OrgChartLayout, options: &LayoutOptions) -> String {
    render_drawio(std::slice::from_ref(chart), options)
}

fn write_diagram(w: &mut XmlWriter, chart: &OrgChartLayout, options: &LayoutOptions) {
    let name = options.diagram_name(&chart.partition);
    let canvas_id = CANVAS_ROOT_ID.to_string();
    let layer_id = DEFAULT_LAYER_ID.to_string();

    w.open("diagram", &[("name", name.as_str())]);
    w.open("mxGraphModel", &[]);
    w.open("root", &[]);
    w.empty("mxCell", &[("id", canvas_id.as_str())]);
    w.empty(
        "mxCell",
        &[("id", layer_id.as_str()), ("parent", canvas_id.as_str())],
    );

    for node in &chart.nodes {
        let id = node.id.to_string();
        let style = options.node_style(&node.fill);
        w.open(
            "mxCell",
            &[
                ("id", id.as_str()),
                ("value", node.title.as_str()),
                ("style", style.as_str()),
                ("vertex", "1"),
                ("parent", layer_id.as_str()),
            ],
        );
        let (x, y) = (fmt_number(node.x), fmt_number(node.y));
        let (width, height) = (fmt_number(node.width), fmt_number(node.height));
        w.empty(
            "mxGeometry",
            &[
                ("x", x.as_str()),
                ("y", y.as_str()),
                ("width", width.as_str()),
                ("height", height.as_str()),
                ("as", "geometry"),
            ],
        );
        w.close("mxCell");
    }

    let edge_style = options.edge_style();
    for edge in &chart.edges {
        let id = edge.id.to_string();
        let source = edge.source.to_string();
        let target = edge.target.to_string();
        w.open(
            "mxCell",
            &[
                ("id", id.as_str()),
                ("style", edge_style.as_str()),
                ("edge", "1"),
                ("parent", layer_id.as_str()),
                ("source", source.as_str()),
                ("target", target.as_str()),
            ],
        );
        w.empty("mxGeometry", &[("relative", "1"), ("as", "geometry")]);
        w.close("mxCell");
    }

    w.close("root");
    w.close("mxGraphModel");
    w.close("diagram");
}
