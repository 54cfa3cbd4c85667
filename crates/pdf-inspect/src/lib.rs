//! Read-only introspection of produced PDFs.
//!
//! This crate answers two questions about a first-pass artifact using lopdf:
//! - How many pages does it have? ([`page_count`])
//! - On which page does each named destination land? ([`extract_destinations`])
//!
//! [`NamedDestinations`] wraps the second question as a best-effort
//! [`DestinationSource`]: any parse failure becomes "nothing found".

mod destinations;
mod error;
mod text;

pub use destinations::{collect_named_destinations, destination_page, NamedDestination};
pub use error::InspectError;
pub use text::decode_text;

use folio_traits::DestinationSource;
use folio_types::{AnchorId, ExactDestinations};
use log::{debug, warn};
use lopdf::Document;
use std::collections::BTreeSet;
use std::panic::{self, AssertUnwindSafe};

/// Returns the number of pages in a PDF.
pub fn page_count(artifact: &[u8]) -> Result<usize, InspectError> {
    let doc = Document::load_mem(artifact)?;
    Ok(doc.get_pages().len())
}

/// Reads the named destinations of `artifact` and resolves every one whose name is
/// in `known` to a 1-based page number.
///
/// Destinations pointing at objects that are not pages are skipped. When a name is
/// declared twice, the first declaration wins.
pub fn extract_destinations(
    artifact: &[u8],
    known: &BTreeSet<AnchorId>,
) -> Result<ExactDestinations, InspectError> {
    let doc = Document::load_mem(artifact)?;
    let pages: Vec<_> = doc.get_pages().into_values().collect();
    let named = collect_named_destinations(&doc)?;
    debug!(
        "[DESTS] Found {} named destinations over {} pages.",
        named.len(),
        pages.len()
    );

    let mut exact = ExactDestinations::new();
    for dest in named {
        let Some(id) = known.get(dest.name.as_str()) else {
            continue;
        };
        if exact.contains(id.as_str()) {
            continue;
        }
        match destination_page(&doc, dest.target, &pages) {
            Some(page) => {
                exact.insert(id.clone(), page);
            }
            None => debug!("[DESTS] Destination '{}' does not point at a page.", dest.name),
        }
    }
    Ok(exact)
}

/// A [`DestinationSource`] backed by the PDF named-destination tables.
#[derive(Debug, Default, Clone, Copy)]
pub struct NamedDestinations;

impl NamedDestinations {
    pub fn new() -> Self {
        Self
    }
}

impl DestinationSource for NamedDestinations {
    fn try_extract(&self, artifact: &[u8], known: &BTreeSet<AnchorId>) -> Option<ExactDestinations> {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| extract_destinations(artifact, known)));
        match outcome {
            Ok(Ok(exact)) => Some(exact),
            Ok(Err(InspectError::NoDestinations)) => {
                debug!("[DESTS] Artifact exposes no named destinations.");
                None
            }
            Ok(Err(e)) => {
                warn!("[DESTS] Could not read named destinations: {}", e);
                None
            }
            Err(_) => {
                warn!("[DESTS] PDF parser panicked while reading named destinations.");
                None
            }
        }
    }

    fn name(&self) -> &'static str {
        "pdf-named-destinations"
    }
}
