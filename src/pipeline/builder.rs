use super::config::PipelineConfig;
use super::orchestrator::DocumentPipeline;
use crate::error::PipelineError;
use folio_layout::{GeometrySampler, PageEstimator};
use folio_pdf_inspect::NamedDestinations;
use folio_traits::{DestinationSource, PrintOptions, Typesetter};
use std::sync::Arc;
use std::time::Duration;

/// A builder for creating a `DocumentPipeline`.
pub struct PipelineBuilder {
    typesetter: Option<Arc<dyn Typesetter>>,
    destinations: Arc<dyn DestinationSource>,
    config: PipelineConfig,
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self {
            typesetter: None,
            destinations: Arc::new(NamedDestinations::new()),
            config: PipelineConfig::default(),
        }
    }
}

impl PipelineBuilder {
    /// Creates a new `PipelineBuilder` with default settings. A typesetter must be
    /// supplied before `build`.
    pub fn new() -> Self {
        Default::default()
    }

    /// Sets the rendering service. It may be shared between pipelines.
    pub fn with_typesetter(mut self, typesetter: Arc<dyn Typesetter>) -> Self {
        self.typesetter = Some(typesetter);
        self
    }

    /// Replaces the named-destination reader used after the first pass.
    pub fn with_destination_source(mut self, destinations: Arc<dyn DestinationSource>) -> Self {
        self.destinations = destinations;
        self
    }

    pub fn with_config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_print_options(mut self, print: PrintOptions) -> Self {
        self.config.print = print;
        self
    }

    /// Bounds the whole generation, both passes included.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Bounds the release of the rendering context after a run.
    pub fn with_release_timeout(mut self, timeout: Duration) -> Self {
        self.config.release_timeout = timeout;
        self
    }

    pub fn with_settle_delays(mut self, fonts: Duration, math: Duration) -> Self {
        self.config.font_settle = fonts;
        self.config.math_settle = math;
        self
    }

    /// Overrides the per-anchor page correction factor (default 1.10).
    pub fn with_anchor_adjustment(mut self, adjustment: f64) -> Self {
        self.config.estimator = self.config.estimator.with_anchor_adjustment(adjustment);
        self
    }

    /// Enables debug logging of intermediate geometry and page maps.
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.config.debug = debug;
        self
    }

    /// Consumes the builder and creates the `DocumentPipeline`.
    pub fn build(self) -> Result<DocumentPipeline, PipelineError> {
        let typesetter = self.typesetter.ok_or_else(|| {
            PipelineError::Config(
                "No typesetter has been configured. Use `with_typesetter`.".to_string(),
            )
        })?;

        if !self.config.estimator.is_valid() {
            return Err(PipelineError::Config(format!(
                "Anchor adjustment must be finite and greater than zero, got {}",
                self.config.estimator.anchor_adjustment
            )));
        }
        if self.config.timeout.is_zero() {
            return Err(PipelineError::Config("Timeout must be greater than zero".to_string()));
        }
        let (paper_width, paper_height) = self.config.print.paper.dimensions_in();
        if self.config.print.margin_in < 0.0
            || self.config.print.content_width_in() <= 0.0
            || paper_height <= 2.0 * self.config.print.margin_in
        {
            return Err(PipelineError::Config(format!(
                "Margins of {}in leave no printable area on a {}x{}in page",
                self.config.print.margin_in, paper_width, paper_height
            )));
        }

        log::info!(
            "Building pipeline with typesetter '{}' and destination source '{}'.",
            typesetter.name(),
            self.destinations.name()
        );

        Ok(DocumentPipeline::new(
            typesetter,
            self.destinations,
            GeometrySampler::new(),
            PageEstimator::new(self.config.estimator),
            self.config,
        ))
    }
}
