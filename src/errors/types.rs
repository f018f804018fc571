use thiserror::Error;

#[derive(Debug, Error)]
pub enum DumpctlError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Submission error: {0}")]
    Submission(String),

    #[error("Scan service error: {0}")]
    Api(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Render error: {0}")]
    Render(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
