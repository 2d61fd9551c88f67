pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Input must contain a '{column}' column")]
    MissingColumn { column: &'static str },

    #[error("Invalid location flag in row {row}, column '{column}': {value:?}")]
    InvalidFlag {
        row: usize,
        column: String,
        value: String,
    },

    #[error("Unknown location partition: {name}")]
    UnknownPartition { name: String },

    #[error("Manager cycle detected while ranking '{title}': {}", .cycle.join(" -> "))]
    ManagerCycle { title: String, cycle: Vec<String> },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid override JSON: {0}")]
    OverrideJson(#[from] serde_json::Error),

    #[error("Invalid override YAML: {0}")]
    OverrideYaml(#[from] serde_yaml::Error),
}
