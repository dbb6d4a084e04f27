use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("A query is already running")]
    AlreadyLoading,

    #[error("{name} must be at least 1, got {value}")]
    InvalidParameter { name: &'static str, value: i64 },

    #[error("Unknown query template: {0}")]
    UnknownTemplate(String),

    #[error("Malformed result payload: {0}")]
    MalformedResult(String),
}

impl From<serde_json::Error> for QueryError {
    fn from(err: serde_json::Error) -> Self {
        QueryError::MalformedResult(err.to_string())
    }
}
