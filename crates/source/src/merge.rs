use folio_types::{ExactDestinations, PageEstimate, ResolvedPageNumbers};

/// Combines both page sources, exact values taking precedence.
///
/// Every id in either input appears in the result; nothing else does.
pub fn merge(estimate: &PageEstimate, exact: &ExactDestinations) -> ResolvedPageNumbers {
    let mut resolved: ResolvedPageNumbers = estimate
        .iter()
        .map(|(id, page)| (id.clone(), *page))
        .collect();
    for (id, page) in exact {
        if let Some(previous) = resolved.insert(id.clone(), *page)
            && previous != *page
        {
            log::debug!(
                "[MERGE] '{}': estimated page {} replaced by exact page {}",
                id,
                previous,
                page
            );
        }
    }
    resolved
}
