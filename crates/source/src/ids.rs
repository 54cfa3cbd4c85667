use crate::error::SourceError;
use folio_types::AnchorId;
use std::collections::HashSet;

/// Hands out document-unique anchor ids.
///
/// Explicit ids are taken as given and must be unique; derived ids are slugs of
/// their title with `-2`, `-3`, ... appended on collision.
#[derive(Debug, Default)]
pub struct IdAllocator {
    used: HashSet<String>,
    declared: HashSet<String>,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserves an id so derived ids never collide with it.
    pub fn reserve(&mut self, id: &str) {
        self.used.insert(id.to_string());
    }

    pub fn explicit(&mut self, id: &str) -> Result<AnchorId, SourceError> {
        if id.is_empty() || id.chars().any(char::is_whitespace) {
            return Err(SourceError::InvalidId(id.to_string()));
        }
        self.used.insert(id.to_string());
        if !self.declared.insert(id.to_string()) {
            log::warn!("Anchor id '{}' is declared more than once", id);
        }
        Ok(AnchorId::from(id))
    }

    pub fn derive(&mut self, title: &str, fallback: &str) -> AnchorId {
        let mut base = slug::slugify(title);
        if base.is_empty() {
            base = fallback.to_string();
        }
        let mut candidate = base.clone();
        let mut n = 2;
        while self.used.contains(&candidate) {
            candidate = format!("{}-{}", base, n);
            n += 1;
        }
        self.used.insert(candidate.clone());
        AnchorId::from(candidate)
    }

    /// Uses `explicit` when present, otherwise derives from `title`.
    pub fn allocate(
        &mut self,
        explicit: Option<&str>,
        title: &str,
        fallback: &str,
    ) -> Result<AnchorId, SourceError> {
        match explicit {
            Some(id) => self.explicit(id),
            None => Ok(self.derive(title, fallback)),
        }
    }
}
