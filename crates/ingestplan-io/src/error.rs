use thiserror::Error;

/// Result type local to ingestplan-io.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("two documents render to {0}")]
    DuplicateDocument(String),

    #[error("bundle sink error: {0}")]
    Sink(String),

    #[error(transparent)]
    Core(#[from] ingestplan_core::Error),
}
