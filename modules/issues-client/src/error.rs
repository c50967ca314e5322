use thiserror::Error;

pub type Result<T> = std::result::Result<T, IssuesError>;

#[derive(Debug, Error)]
pub enum IssuesError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },
}

impl From<reqwest::Error> for IssuesError {
    fn from(err: reqwest::Error) -> Self {
        IssuesError::Network(err.to_string())
    }
}
