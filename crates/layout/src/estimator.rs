use crate::config::EstimatorConfig;
use folio_types::{GeometrySample, PageEstimate, PageNumber};
use log::debug;

/// Where one section begins in the printed document.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SectionStart {
    pub index: usize,
    pub start_page: PageNumber,
    /// Whole pages the section is expected to overflow onto.
    pub extra_pages: u32,
}

/// The outcome of one estimation run, kept whole for logging.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Estimation {
    pub total_pages: usize,
    /// `None` when no rate could be derived; `pages` is then empty.
    pub pixels_per_page: Option<f64>,
    pub section_starts: Vec<SectionStart>,
    pub pages: PageEstimate,
}

impl Estimation {
    fn unavailable(total_pages: usize) -> Self {
        Self {
            total_pages,
            ..Default::default()
        }
    }

    pub fn start_page(&self, section_index: usize) -> Option<PageNumber> {
        self.section_starts
            .iter()
            .find(|s| s.index == section_index)
            .map(|s| s.start_page)
    }
}

/// Converts first-pass geometry plus the first-pass page count into a printed
/// page number for every sampled anchor.
///
/// The rate is a single global pixels-per-page figure derived from the content
/// sections. Every content section starts on a fresh page and overflows by
/// `floor(height / rate)` pages; an anchor lands `floor(offset / (rate * adjustment))`
/// pages after its section start.
#[derive(Debug, Clone, Copy, Default)]
pub struct PageEstimator {
    config: EstimatorConfig,
}

fn sanitize(pixels: f64) -> f64 {
    if pixels.is_finite() && pixels > 0.0 { pixels } else { 0.0 }
}

fn whole_pages(pixels: f64, per_page: f64) -> u32 {
    let pages = (pixels / per_page).floor();
    if pages.is_finite() && pages > 0.0 { pages as u32 } else { 0 }
}

impl PageEstimator {
    pub fn new(config: EstimatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EstimatorConfig {
        &self.config
    }

    /// The global rate, or `None` when `total_pages` leaves no content pages or the
    /// content has no measurable height.
    pub fn pixels_per_page(&self, sample: &GeometrySample, total_pages: usize) -> Option<f64> {
        let reserved = self.config.reserved_pages;
        let content_pages = total_pages.checked_sub(reserved).filter(|p| *p > 0)?;
        let content_height: f64 = sample
            .sections
            .iter()
            .skip(reserved)
            .map(|s| sanitize(s.pixel_height))
            .sum();
        let rate = content_height / content_pages as f64;
        (rate.is_finite() && rate > 0.0).then_some(rate)
    }

    pub fn estimate(&self, sample: &GeometrySample, total_pages: usize) -> Estimation {
        let reserved = self.config.reserved_pages;
        let Some(per_page) = self.pixels_per_page(sample, total_pages) else {
            debug!(
                "[ESTIMATE] No rate available ({} total pages, {} reserved); skipping.",
                total_pages, reserved
            );
            return Estimation::unavailable(total_pages);
        };

        let mut section_starts = Vec::with_capacity(sample.sections.len());
        let mut cumulative = reserved as PageNumber;
        for (position, section) in sample.sections.iter().enumerate() {
            if position < reserved {
                // Reserved sections occupy exactly one page each.
                section_starts.push(SectionStart {
                    index: position,
                    start_page: position as PageNumber + 1,
                    extra_pages: 0,
                });
                continue;
            }
            cumulative += 1;
            let extra_pages = whole_pages(sanitize(section.pixel_height), per_page);
            section_starts.push(SectionStart {
                index: position,
                start_page: cumulative,
                extra_pages,
            });
            cumulative = cumulative.saturating_add(extra_pages);
        }

        let anchor_rate = per_page * self.config.anchor_adjustment;
        let mut pages = PageEstimate::new();
        for anchor in &sample.anchors {
            let Some(start) = section_starts.get(anchor.section_index) else {
                debug!(
                    "[ESTIMATE] Anchor '{}' names unknown section {}; skipping.",
                    anchor.id, anchor.section_index
                );
                continue;
            };
            let extra = whole_pages(sanitize(anchor.offset_within_section), anchor_rate);
            pages.insert(anchor.id.clone(), start.start_page.saturating_add(extra));
        }

        Estimation {
            total_pages,
            pixels_per_page: Some(per_page),
            section_starts,
            pages,
        }
    }
}
