//! Inline markup rendering for prose fields.

use crate::node::{escape_attr, escape_text};
use regex::Regex;
use std::sync::LazyLock;

/// Turns one prose field into an HTML fragment.
///
/// Implementations must escape any text they do not deliberately mark up.
pub trait InlineRenderer: Send + Sync {
    fn render_inline(&self, text: &str) -> String;
}

/// Escapes text and applies no markup.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainInline;

impl InlineRenderer for PlainInline {
    fn render_inline(&self, text: &str) -> String {
        escape_text(text)
    }
}

static FOOTNOTE_REF_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[\^(\w+)\]").expect("BUG: invalid FOOTNOTE_REF_RE regex literal"));
static LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\(([^)\s]+)\)").expect("BUG: invalid LINK_RE regex literal"));
static BOLD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*([^*]+)\*\*").expect("BUG: invalid BOLD_RE regex literal"));
static ITALIC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*([^*]+)\*").expect("BUG: invalid ITALIC_RE regex literal"));

/// A small markdown-like dialect: `**bold**`, `*italic*`, `[text](href)` and
/// footnote references `[^n]`, which link to `#fn-n`.
#[derive(Debug, Default, Clone, Copy)]
pub struct MarkupInline;

impl InlineRenderer for MarkupInline {
    fn render_inline(&self, text: &str) -> String {
        let html = escape_text(text);
        let html = FOOTNOTE_REF_RE.replace_all(&html, |caps: &regex::Captures| {
            let n = &caps[1];
            format!(
                "<sup class=\"footnote-ref\"><a href=\"#fn-{}\">{}</a></sup>",
                escape_attr(n),
                n
            )
        });
        let html = LINK_RE.replace_all(&html, |caps: &regex::Captures| {
            // Already text-escaped; only quotes remain unsafe inside the attribute.
            format!("<a href=\"{}\">{}</a>", caps[2].replace('"', "&quot;"), &caps[1])
        });
        let html = BOLD_RE.replace_all(&html, "<strong>$1</strong>");
        let html = ITALIC_RE.replace_all(&html, "<em>$1</em>");
        html.into_owned()
    }
}
