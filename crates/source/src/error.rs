use thiserror::Error;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Content JSON is invalid: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to read content from '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Document has no content sections")]
    Empty,

    #[error("Invalid anchor id '{0}': ids must be non-empty and contain no whitespace")]
    InvalidId(String),
}
