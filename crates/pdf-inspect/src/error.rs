use thiserror::Error;

#[derive(Error, Debug)]
pub enum InspectError {
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("Document has no named destinations")]
    NoDestinations,

    #[error("Malformed destination structure: {0}")]
    Malformed(String),
}
