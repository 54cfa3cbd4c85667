use crate::pipeline::Stage;
use folio_source::SourceError;
use folio_traits::TypesetError;
use std::time::Duration;
use thiserror::Error;

/// Errors that abort a document generation.
///
/// Degradable failures (sampling, destination extraction, estimation) never
/// surface here; they are logged and recorded in the
/// [`GenerationReport`](crate::GenerationReport).
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Typesetting service unavailable: {0}")]
    ServiceUnavailable(#[source] TypesetError),

    #[error("Rendering failed during {stage}: {source}")]
    Render {
        stage: Stage,
        #[source]
        source: TypesetError,
    },

    #[error("Document generation timed out after {0:?}")]
    Timeout(Duration),

    #[error("Content error: {0}")]
    Content(#[from] SourceError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl PipelineError {
    /// The stage a render error occurred in, if any.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            PipelineError::Render { stage, .. } => Some(*stage),
            PipelineError::ServiceUnavailable(_) => Some(Stage::Init),
            _ => None,
        }
    }
}
