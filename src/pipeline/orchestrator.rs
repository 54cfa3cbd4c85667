use super::config::PipelineConfig;
use super::prepare::prepare;
use super::report::{GenerationOutput, GenerationReport};
use super::stage::Stage;
use crate::error::PipelineError;
use crate::output::write_atomically;
use folio_layout::{GeometrySampler, PageEstimator};
use folio_source::{SourceDocument, inject_page_numbers, merge};
use folio_traits::{DestinationSource, RenderSession, Typesetter};
use folio_types::{AnchorId, ExactDestinations, GeometrySample, PageEstimate};
use log::{debug, info, warn};
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tokio::time::{timeout, timeout_at};

/// The two-pass generation pipeline.
///
/// One call renders the document, measures it, reads back the destinations the
/// renderer produced, estimates page numbers for every table-of-contents target,
/// injects them and renders again. Both passes share one rendering context, which
/// is released on every exit path.
pub struct DocumentPipeline {
    typesetter: Arc<dyn Typesetter>,
    destinations: Arc<dyn DestinationSource>,
    sampler: GeometrySampler,
    estimator: PageEstimator,
    config: PipelineConfig,
}

impl DocumentPipeline {
    pub(crate) fn new(
        typesetter: Arc<dyn Typesetter>,
        destinations: Arc<dyn DestinationSource>,
        sampler: GeometrySampler,
        estimator: PageEstimator,
        config: PipelineConfig,
    ) -> Self {
        Self {
            typesetter,
            destinations,
            sampler,
            estimator,
            config,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn typesetter(&self) -> &Arc<dyn Typesetter> {
        &self.typesetter
    }

    /// Generates the final PDF.
    pub async fn generate(&self, document: &SourceDocument) -> Result<Vec<u8>, PipelineError> {
        Ok(self.generate_with_report(document).await?.pdf)
    }

    /// Generates the final PDF and writes it to `path`, replacing any previous file.
    pub async fn generate_to_file<P: AsRef<Path>>(
        &self,
        document: &SourceDocument,
        path: P,
    ) -> Result<GenerationReport, PipelineError> {
        let output = self.generate_with_report(document).await?;
        let path = path.as_ref().to_path_buf();
        let pdf = output.pdf;
        tokio::task::spawn_blocking(move || write_atomically(&path, &pdf))
            .await
            .map_err(|e| PipelineError::Io(std::io::Error::other(e)))??;
        Ok(output.report)
    }

    /// Generates the final PDF together with a report of what each stage produced.
    pub async fn generate_with_report(
        &self,
        document: &SourceDocument,
    ) -> Result<GenerationOutput, PipelineError> {
        let started = Instant::now();
        let deadline = tokio::time::Instant::now() + self.config.timeout;

        info!("[INIT] Opening rendering context on '{}'.", self.typesetter.name());
        let mut session = match timeout_at(deadline, self.typesetter.open()).await {
            Ok(Ok(session)) => session,
            Ok(Err(e)) => return Err(PipelineError::ServiceUnavailable(e)),
            Err(_) => return Err(PipelineError::Timeout(self.config.timeout)),
        };

        let outcome = timeout_at(deadline, self.run(session.as_mut(), document)).await;

        self.release(session).await;

        let mut output = match outcome {
            Ok(result) => result?,
            Err(_) => {
                warn!("[DONE] Generation exceeded {:?}; aborted.", self.config.timeout);
                return Err(PipelineError::Timeout(self.config.timeout));
            }
        };
        output.report.elapsed = started.elapsed();

        info!(
            "[DONE] {} bytes, {:?} pages, {} of {} targets resolved in {:?}.",
            output.pdf.len(),
            output.report.final_pages,
            output.report.placeholders_filled,
            output.report.placeholders_filled + output.report.unresolved.len(),
            output.report.elapsed
        );
        Ok(output)
    }

    /// Closes the context, giving up after `release_timeout`. A context whose
    /// close does not finish in time is dropped.
    async fn release(&self, session: Box<dyn RenderSession>) {
        match timeout(self.config.release_timeout, session.close()).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => warn!("[DONE] Failed to release rendering context: {}", e),
            Err(_) => warn!(
                "[DONE] Rendering context not released within {:?}; dropping it.",
                self.config.release_timeout
            ),
        }
    }

    async fn run(
        &self,
        session: &mut dyn RenderSession,
        document: &SourceDocument,
    ) -> Result<GenerationOutput, PipelineError> {
        let mut report = GenerationReport::default();
        let targets = document.targets();

        // Pass 1
        info!("[PASS 1] Rendering document with {} targets.", targets.len());
        let first = self.render(session, &document.to_html(), Stage::Pass1Render).await?;
        report.pass1_pages = self.count_pages(&first, Stage::Pass1Render);

        let sample = match self.sampler.sample(session, &targets).await {
            Ok(sample) => sample,
            Err(e) => {
                warn!("[PASS 1] Geometry sampling failed: {}", e);
                report.degrade(Stage::Pass1Sample);
                GeometrySample::default()
            }
        };
        report.anchors_sampled = sample.anchors.len();
        if self.config.debug {
            debug!("[PASS 1] Section heights: {:?}", sample.section_heights());
        }

        let known: BTreeSet<AnchorId> = targets.iter().cloned().collect();
        let exact = match self.destinations.try_extract(&first, &known) {
            Some(exact) => exact,
            None => {
                warn!(
                    "[PASS 1] No named destinations recovered via '{}'.",
                    self.destinations.name()
                );
                report.degrade(Stage::Pass1Extract);
                ExactDestinations::new()
            }
        };
        report.anchors_exact = exact.len();

        // Estimate
        let estimate = match report.pass1_pages {
            Some(total_pages) => {
                let estimation = self.estimator.estimate(&sample, total_pages);
                if estimation.pixels_per_page.is_none() && !sample.anchors.is_empty() {
                    report.degrade(Stage::Estimate);
                }
                if self.config.debug {
                    debug!(
                        "[ESTIMATE] total pages {}, pixels per page {:?}",
                        total_pages, estimation.pixels_per_page
                    );
                }
                estimation.pages
            }
            None => {
                report.degrade(Stage::Estimate);
                PageEstimate::new()
            }
        };
        report.anchors_estimated = estimate.len();

        // Merge and inject
        let resolved = merge(&estimate, &exact);
        report.anchors_resolved = resolved.len();
        if self.config.debug {
            debug!("[MERGE] estimate: {}", to_json(&estimate));
            debug!("[MERGE] exact: {}", to_json(&exact));
            debug!("[MERGE] resolved: {}", to_json(&resolved));
        }

        let injection = inject_page_numbers(document, &resolved);
        report.placeholders_filled = injection.filled;
        report.unresolved = injection.unresolved.into_iter().collect();
        if !report.unresolved.is_empty() {
            warn!(
                "[INJECT] {} targets left unresolved: {:?}",
                report.unresolved.len(),
                report.unresolved
            );
        }

        // Pass 2
        info!("[PASS 2] Rendering final document.");
        let pdf = self
            .render(session, &injection.document.to_html(), Stage::Pass2Render)
            .await?;
        report.final_pages = self.count_pages(&pdf, Stage::Pass2Render);

        Ok(GenerationOutput { pdf, report })
    }

    async fn render(
        &self,
        session: &mut dyn RenderSession,
        html: &str,
        stage: Stage,
    ) -> Result<Vec<u8>, PipelineError> {
        session
            .load_html(html)
            .await
            .map_err(|source| PipelineError::Render { stage, source })?;
        prepare(session, self.config.font_settle, self.config.math_settle).await;
        let pdf = session
            .print_pdf(&self.config.print)
            .await
            .map_err(|source| PipelineError::Render { stage, source })?;
        debug!("[{}] Produced {} bytes.", stage, pdf.len());
        Ok(pdf)
    }

    fn count_pages(&self, pdf: &[u8], stage: Stage) -> Option<usize> {
        match folio_pdf_inspect::page_count(pdf) {
            Ok(pages) => {
                debug!("[{}] Artifact has {} pages.", stage, pages);
                Some(pages)
            }
            Err(e) => {
                warn!("[{}] Could not count pages: {}", stage, e);
                None
            }
        }
    }
}

fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| format!("<unserializable: {}>", e))
}
