//! Anchor-to-page mappings.
//!
//! The pipeline produces three maps with the same shape but different trust levels:
//! an estimate derived from geometry, exact values read back out of a rendered PDF,
//! and the merged result that is injected into the second pass. They are distinct
//! types so that an estimate can never be passed where exact values are expected.

use crate::ids::AnchorId;
use serde::Serialize;
use std::collections::BTreeMap;
use std::collections::btree_map;

/// A 1-based printed page number.
pub type PageNumber = u32;

macro_rules! page_map {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
        #[serde(transparent)]
        pub struct $name(BTreeMap<AnchorId, PageNumber>);

        impl $name {
            pub fn new() -> Self {
                Self(BTreeMap::new())
            }

            pub fn insert(&mut self, id: impl Into<AnchorId>, page: PageNumber) -> Option<PageNumber> {
                self.0.insert(id.into(), page)
            }

            pub fn get(&self, id: &str) -> Option<PageNumber> {
                self.0.get(id).copied()
            }

            pub fn contains(&self, id: &str) -> bool {
                self.0.contains_key(id)
            }

            pub fn len(&self) -> usize {
                self.0.len()
            }

            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }

            pub fn iter(&self) -> btree_map::Iter<'_, AnchorId, PageNumber> {
                self.0.iter()
            }

            pub fn ids(&self) -> impl Iterator<Item = &AnchorId> {
                self.0.keys()
            }
        }

        impl FromIterator<(AnchorId, PageNumber)> for $name {
            fn from_iter<T: IntoIterator<Item = (AnchorId, PageNumber)>>(iter: T) -> Self {
                Self(iter.into_iter().collect())
            }
        }

        impl<'a> IntoIterator for &'a $name {
            type Item = (&'a AnchorId, &'a PageNumber);
            type IntoIter = btree_map::Iter<'a, AnchorId, PageNumber>;

            fn into_iter(self) -> Self::IntoIter {
                self.0.iter()
            }
        }
    };
}

page_map!(
    /// Estimated page per anchor, produced from first-pass geometry.
    PageEstimate
);

page_map!(
    /// Exact page per anchor, recovered from the first-pass PDF's named destinations.
    ExactDestinations
);

page_map!(
    /// The final page per anchor, injected into the second pass and then discarded.
    ResolvedPageNumbers
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_are_ordered_by_anchor_id() {
        let estimate: PageEstimate = [
            (AnchorId::new("logic"), 5),
            (AnchorId::new("being"), 3),
        ]
        .into_iter()
        .collect();

        let ids: Vec<&str> = estimate.ids().map(AnchorId::as_str).collect();
        assert_eq!(ids, vec!["being", "logic"]);
        assert_eq!(estimate.get("logic"), Some(5));
        assert!(!estimate.contains("missing"));
    }

    #[test]
    fn serializes_as_plain_object() {
        let mut exact = ExactDestinations::new();
        exact.insert("theory", 9);
        assert_eq!(serde_json::to_string(&exact).unwrap(), r#"{"theory":9}"#);
    }
}
