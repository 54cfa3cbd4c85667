use crate::config::GenerationConfig;
use crate::error::Result;
use folio::{
    DocumentContent, DocumentPipeline, DocumentSource, MarkupInline, PrintOptions,
    SourceDocument, SourceOptions,
};
use std::sync::Arc;
use tokio::sync::Semaphore;

/// Shared application state accessible to all handlers
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<DocumentPipeline>,

    /// Built once at startup; every request renders the same document.
    pub document: Arc<SourceDocument>,

    /// Limits concurrent generations. Each one holds a browser tab for two passes.
    pub generation_semaphore: Arc<Semaphore>,

    /// Name offered in `Content-Disposition`
    pub filename: Arc<str>,
}

impl AppState {
    pub fn new(
        pipeline: DocumentPipeline,
        document: SourceDocument,
        max_concurrent_generations: usize,
        filename: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            document: Arc::new(document),
            generation_semaphore: Arc::new(Semaphore::new(max_concurrent_generations.max(1))),
            filename: filename.into(),
        }
    }
}

/// Reads the configured content and builds the document the service renders.
pub fn load_document(config: &GenerationConfig, print: &PrintOptions) -> Result<SourceDocument> {
    let content = DocumentContent::from_path(&config.content)?;

    let mut options = SourceOptions::default().with_content_width(print.content_width_in());
    if let Some(base) = &config.asset_base_url {
        options = options.with_asset_base_url(base.clone());
    }
    options.stylesheets = config.stylesheets.clone();
    options.scripts = config.scripts.clone();

    let document = DocumentSource::new(Arc::new(MarkupInline))
        .with_options(options)
        .build(&content)?;
    tracing::info!(
        "Loaded {} with {} table of contents targets",
        config.content.display(),
        document.targets().len()
    );
    Ok(document)
}
