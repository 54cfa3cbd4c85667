//! Writes resolved page numbers into table-of-contents placeholders.

use crate::document::SourceDocument;
use crate::node::{Element, Node};
use folio_types::markers::{PLACEHOLDER_CLASS, PLACEHOLDER_TARGET_ATTR};
use folio_types::{AnchorId, ResolvedPageNumbers};
use std::collections::BTreeSet;

/// The outcome of [`inject_page_numbers`].
#[derive(Debug, Clone)]
pub struct Injection {
    pub document: SourceDocument,
    /// Number of placeholders that received a page number.
    pub filled: usize,
    /// Targets with no resolved page; their placeholders keep their text.
    pub unresolved: BTreeSet<AnchorId>,
}

/// Returns a copy of `document` with every resolvable placeholder filled in.
///
/// The input document is left untouched. Never fails.
pub fn inject_page_numbers(document: &SourceDocument, pages: &ResolvedPageNumbers) -> Injection {
    let mut injected = document.clone();
    let mut filled = 0;
    let mut unresolved = BTreeSet::new();
    fill(&mut injected.body, pages, &mut filled, &mut unresolved);

    log::debug!(
        "[INJECT] filled {} placeholders, {} targets unresolved",
        filled,
        unresolved.len()
    );

    Injection {
        document: injected,
        filled,
        unresolved,
    }
}

fn fill(
    nodes: &mut [Node],
    pages: &ResolvedPageNumbers,
    filled: &mut usize,
    unresolved: &mut BTreeSet<AnchorId>,
) {
    for node in nodes {
        let Node::Element(el) = node else { continue };
        if let Some(target) = placeholder_target(el) {
            match pages.get(&target) {
                Some(page) => {
                    el.children = vec![Node::Text(page.to_string())];
                    *filled += 1;
                }
                None => {
                    unresolved.insert(AnchorId::from(target));
                }
            }
            continue;
        }
        fill(&mut el.children, pages, filled, unresolved);
    }
}

fn placeholder_target(el: &Element) -> Option<String> {
    if !el.has_class(PLACEHOLDER_CLASS) {
        return None;
    }
    el.get_attr(PLACEHOLDER_TARGET_ATTR).map(str::to_string)
}
