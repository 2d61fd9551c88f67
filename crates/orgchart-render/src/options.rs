use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Fill colors indexed by depth. Depths past the end use `fallback`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub colors: Vec<String>,
    pub fallback: String,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            colors: [
                "#a3c9e2", "#b1d8b7", "#f8cfa1", "#e6b8b7", "#d0d9f2", "#e2ded0", "#f2d7e2",
                "#d4eac8", "#fbe8c9", "#ccd9f9", "#e9e6df",
            ]
            .into_iter()
            .map(str::to_string)
            .collect(),
            fallback: "#ffffff".to_string(),
        }
    }
}

impl Palette {
    pub fn fill_for_depth(&self, depth: usize) -> &str {
        self.colors
            .get(depth)
            .map(String::as_str)
            .unwrap_or(self.fallback.as_str())
    }
}

/// Grid spacing, box size, and styling of the emitted chart.
///
/// Every field has a default, so partial JSON/YAML documents are accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutOptions {
    /// Horizontal distance between consecutive boxes of one level.
    pub column_spacing: f64,
    /// Vertical distance between levels.
    pub row_spacing: f64,
    pub node_width: f64,
    pub node_height: f64,
    pub palette: Palette,
    pub node_stroke_color: String,
    pub edge_stroke_color: String,
    pub font_size: u32,
    /// `host` attribute of the `mxfile` root.
    pub host: String,
    /// Page names are `<prefix><partition>`.
    pub diagram_name_prefix: String,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            column_spacing: 200.0,
            row_spacing: 110.0,
            node_width: 160.0,
            node_height: 60.0,
            palette: Palette::default(),
            node_stroke_color: "#444".to_string(),
            edge_stroke_color: "#888".to_string(),
            font_size: 12,
            host: "app.diagrams.net".to_string(),
            diagram_name_prefix: "OrgChart_".to_string(),
        }
    }
}

impl LayoutOptions {
    pub fn from_json_str(text: &str) -> Result<Self> {
        let options: Self = serde_json::from_str(text)?;
        options.validate()?;
        Ok(options)
    }

    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let options: Self = serde_yaml::from_str(text)?;
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("column_spacing", self.column_spacing),
            ("row_spacing", self.row_spacing),
            ("node_width", self.node_width),
            ("node_height", self.node_height),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(Error::Config {
                    message: format!("{name} must be a positive number, got {value}"),
                });
            }
        }
        if self.palette.fallback.trim().is_empty() {
            return Err(Error::Config {
                message: "palette.fallback must not be empty".to_string(),
            });
        }
        if self.font_size == 0 {
            return Err(Error::Config {
                message: "font_size must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    pub fn diagram_name(&self, partition: &str) -> String {
        format!("{}{partition}", self.diagram_name_prefix)
    }

    pub fn node_style(&self, fill: &str) -> String {
        format!(
            "rounded=1;whiteSpace=wrap;html=1;fillColor={fill};strokeColor={};fontSize={};",
            self.node_stroke_color, self.font_size
        )
    }

    pub fn edge_style(&self) -> String {
        format!("endArrow=none;strokeColor={};", self.edge_stroke_color)
    }
}
