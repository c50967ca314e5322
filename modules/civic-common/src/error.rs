use thiserror::Error;

#[derive(Error, Debug)]
pub enum CivicError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
