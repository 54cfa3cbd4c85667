//! folio renders a document to PDF twice so that its table of contents can show
//! the page each entry actually lands on.
//!
//! The first pass is measured and read back; page numbers are estimated from the
//! measured geometry, overridden by any exact destinations found in the first
//! artifact, injected into the document, and the second pass is the result.

pub mod error;
pub mod output;
pub mod pipeline;
pub mod probe;
pub mod typesetter;

pub use error::PipelineError;
pub use pipeline::{
    DocumentPipeline, GenerationOutput, GenerationReport, PipelineBuilder, PipelineConfig, Stage,
};
#[cfg(feature = "chrome")]
pub use typesetter::{ChromeOptions, ChromeTypesetter};

pub use folio_layout::{DEFAULT_ANCHOR_ADJUSTMENT, EstimatorConfig};
pub use folio_source::{
    DocumentContent, DocumentSource, InlineRenderer, MarkupInline, PlainInline, SourceDocument,
    SourceError, SourceOptions,
};
pub use folio_traits::{
    DestinationSource, PaperSize, PrintOptions, RenderSession, Script, TypesetError, Typesetter,
};
pub use folio_types::{AnchorId, ExactDestinations, PageEstimate, ResolvedPageNumbers};
