use thiserror::Error;

pub type Result<T> = std::result::Result<T, TriageError>;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum TriageError {
    #[error("Report {id} has invalid coordinates ({latitude}, {longitude})")]
    InvalidCoordinate {
        id: String,
        latitude: f64,
        longitude: f64,
    },

    #[error("Clustering radius must be a positive number of km, got {0}")]
    InvalidRadius(f64),

    #[error("Report {id} has unparseable createdAt {value:?}")]
    InvalidTimestamp { id: String, value: String },

    #[error("Cannot aggregate an empty cluster")]
    EmptyCluster,
}
