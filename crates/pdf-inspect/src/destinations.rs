//! Walking the named-destination structures of a parsed PDF.
//!
//! Two layouts exist in the wild: the `/Names → /Dests` name tree (PDF 1.2+), and
//! the older `/Dests` dictionary hung directly off the catalog. Chromium emits the
//! latter for every element id that an internal link points at.

use crate::error::InspectError;
use crate::text::decode_text;
use folio_types::PageNumber;
use log::{debug, warn};
use lopdf::{Dictionary, Document, Object, ObjectId};
use std::collections::HashSet;

const MAX_TREE_DEPTH: usize = 32;
const MAX_REFERENCE_HOPS: usize = 8;

/// A destination name paired with its (unresolved) destination object.
#[derive(Debug, Clone)]
pub struct NamedDestination<'a> {
    pub name: String,
    pub target: &'a Object,
}

/// Follows indirect references until a direct object is reached.
pub(crate) fn resolve<'a>(doc: &'a Document, obj: &'a Object) -> Result<&'a Object, InspectError> {
    let mut current = obj;
    for _ in 0..MAX_REFERENCE_HOPS {
        match current {
            Object::Reference(id) => current = doc.get_object(*id)?,
            other => return Ok(other),
        }
    }
    Err(InspectError::Malformed("reference chain too long".into()))
}

/// Collects every named destination the document declares, in declaration order.
///
/// The name tree and the legacy dictionary are read independently: a malformed
/// one is logged and skipped so the other still contributes. Returns
/// [`InspectError::NoDestinations`] when neither structure is present, and the
/// first read error when nothing could be collected.
pub fn collect_named_destinations(doc: &Document) -> Result<Vec<NamedDestination<'_>>, InspectError> {
    let catalog = doc.catalog()?;
    let mut found = Vec::new();
    let mut has_structure = false;
    let mut failure = None;

    match read_name_tree(doc, catalog, &mut found) {
        Ok(present) => has_structure |= present,
        Err(e) => {
            warn!("[DESTS] Skipping unreadable /Names tree: {}", e);
            failure.get_or_insert(e);
        }
    }
    match read_legacy_dests(doc, catalog, &mut found) {
        Ok(present) => has_structure |= present,
        Err(e) => {
            warn!("[DESTS] Skipping unreadable /Dests dictionary: {}", e);
            failure.get_or_insert(e);
        }
    }

    if found.is_empty()
        && let Some(e) = failure
    {
        return Err(e);
    }
    if !has_structure && found.is_empty() {
        return Err(InspectError::NoDestinations);
    }
    Ok(found)
}

/// Reads `/Names → /Dests`. `Ok(false)` when the catalog has no name tree.
fn read_name_tree<'a>(
    doc: &'a Document,
    catalog: &'a Dictionary,
    out: &mut Vec<NamedDestination<'a>>,
) -> Result<bool, InspectError> {
    let Ok(names) = catalog.get(b"Names") else {
        return Ok(false);
    };
    let Ok(dests) = resolve(doc, names)?.as_dict()?.get(b"Dests") else {
        return Ok(false);
    };
    let root = resolve(doc, dests)?.as_dict()?;
    let mut visited = HashSet::new();
    walk_name_tree(doc, root, 0, &mut visited, out)?;
    Ok(true)
}

/// Reads the catalog's `/Dests` dictionary. `Ok(false)` when it is absent.
fn read_legacy_dests<'a>(
    doc: &'a Document,
    catalog: &'a Dictionary,
    out: &mut Vec<NamedDestination<'a>>,
) -> Result<bool, InspectError> {
    let Ok(dests) = catalog.get(b"Dests") else {
        return Ok(false);
    };
    for (key, value) in resolve(doc, dests)?.as_dict()?.iter() {
        out.push(NamedDestination {
            name: decode_text(key),
            target: value,
        });
    }
    Ok(true)
}

fn walk_name_tree<'a>(
    doc: &'a Document,
    node: &'a Dictionary,
    depth: usize,
    visited: &mut HashSet<ObjectId>,
    out: &mut Vec<NamedDestination<'a>>,
) -> Result<(), InspectError> {
    if depth > MAX_TREE_DEPTH {
        return Err(InspectError::Malformed(format!(
            "name tree deeper than {} levels",
            MAX_TREE_DEPTH
        )));
    }

    // Leaf: [key1 value1 key2 value2 ...]
    if let Ok(names) = node.get(b"Names") {
        let pairs = resolve(doc, names)?.as_array()?;
        for pair in pairs.chunks(2) {
            let [key, value] = pair else {
                debug!("[DESTS] Ignoring dangling key in name tree leaf.");
                continue;
            };
            match resolve(doc, key)? {
                Object::String(bytes, _) | Object::Name(bytes) => out.push(NamedDestination {
                    name: decode_text(bytes),
                    target: value,
                }),
                other => debug!("[DESTS] Ignoring non-string name tree key: {:?}", other),
            }
        }
    }

    if let Ok(kids) = node.get(b"Kids") {
        for kid in resolve(doc, kids)?.as_array()? {
            if let Object::Reference(id) = kid {
                if !visited.insert(*id) {
                    continue;
                }
            }
            let child = resolve(doc, kid)?.as_dict()?;
            walk_name_tree(doc, child, depth + 1, visited, out)?;
        }
    }

    Ok(())
}

/// Resolves a destination object to a 1-based page number.
///
/// Accepts an explicit destination array (`[page /XYZ left top zoom]`) or a
/// dictionary wrapping one under `/D`. `pages` is the document's page list in
/// order; the page is found by linear search.
pub fn destination_page(doc: &Document, target: &Object, pages: &[ObjectId]) -> Option<PageNumber> {
    let target = resolve(doc, target).ok()?;
    let array = match target {
        Object::Array(array) => array,
        Object::Dictionary(dict) => resolve(doc, dict.get(b"D").ok()?).ok()?.as_array().ok()?,
        _ => return None,
    };

    let index = match array.first()? {
        Object::Reference(page_id) => pages.iter().position(|id| id == page_id)?,
        // Remote-style destinations carry a 0-based page index instead of a reference.
        Object::Integer(index) => usize::try_from(*index).ok().filter(|i| *i < pages.len())?,
        _ => return None,
    };
    PageNumber::try_from(index + 1).ok()
}
