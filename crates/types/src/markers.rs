//! The naming contract between the document source and the in-page sampler.
//!
//! Both sides must agree on these names: the source stamps them onto the markup,
//! the sampler and the placeholder injector look them up.

/// Class carried by every top-level page-break container.
pub const SECTION_CLASS: &str = "pdf-section";

/// Attribute naming the role of a section container (`title`, `toc`, `content`).
pub const SECTION_ROLE_ATTR: &str = "data-section";

/// Class carried by every table-of-contents page-number placeholder.
pub const PLACEHOLDER_CLASS: &str = "toc-page";

/// Attribute holding the anchor id a placeholder waits for.
pub const PLACEHOLDER_TARGET_ATTR: &str = "data-toc-target";

/// Text shown by a placeholder until a page number is injected.
pub const PLACEHOLDER_TEXT: &str = "…";

/// Class carried by math elements awaiting typesetting.
pub const MATH_CLASS: &str = "math";

/// Attribute holding the TeX source of a math element.
pub const MATH_TEX_ATTR: &str = "data-tex";

/// Attribute flagging display-mode math (`"true"` / `"false"`).
pub const MATH_DISPLAY_ATTR: &str = "data-display";

/// Number of sections at the start of the document that never hold targets:
/// the title page and the table of contents.
pub const RESERVED_SECTIONS: usize = 2;

/// Section roles as stamped into [`SECTION_ROLE_ATTR`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionRole {
    Title,
    Contents,
    Content,
}

impl SectionRole {
    pub fn as_str(self) -> &'static str {
        match self {
            SectionRole::Title => "title",
            SectionRole::Contents => "toc",
            SectionRole::Content => "content",
        }
    }
}
