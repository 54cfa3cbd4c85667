//! DestinationSource trait: optional exact page numbers read back out of an artifact.

use folio_types::{AnchorId, ExactDestinations};
use std::collections::BTreeSet;
use std::fmt::Debug;

/// A capability for recovering exact anchor pages from a produced artifact.
///
/// Extraction is an enrichment, never a requirement: implementations return
/// `None` when the artifact does not expose named destinations or cannot be
/// read, and must not panic on arbitrary input.
pub trait DestinationSource: Send + Sync + Debug {
    /// Returns the exact 1-based page of every `known` anchor the artifact names.
    fn try_extract(&self, artifact: &[u8], known: &BTreeSet<AnchorId>) -> Option<ExactDestinations>;

    fn name(&self) -> &'static str;
}

/// A source that never finds anything. Useful when the artifact format has no
/// named destinations.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoDestinations;

impl DestinationSource for NoDestinations {
    fn try_extract(&self, _artifact: &[u8], _known: &BTreeSet<AnchorId>) -> Option<ExactDestinations> {
        None
    }

    fn name(&self) -> &'static str {
        "none"
    }
}
