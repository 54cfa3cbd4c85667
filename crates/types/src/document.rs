use crate::ids::AnchorId;
use serde::Serialize;

/// An entry in the table of contents.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TocEntry {
    /// Heading level (1 = section, 2 = sub-heading, ...)
    pub level: u8,
    /// The text shown in the table of contents.
    pub text: String,
    /// The anchor whose page number this entry displays.
    pub target_id: AnchorId,
}

impl TocEntry {
    pub fn new(level: u8, text: impl Into<String>, target_id: impl Into<AnchorId>) -> Self {
        Self {
            level,
            text: text.into(),
            target_id: target_id.into(),
        }
    }
}
