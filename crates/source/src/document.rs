//! Builds the printable HTML document from [`DocumentContent`].
//!
//! The output is laid out in top-level sections: the title page, the table of
//! contents, then one section per content section. Each carries the section marker
//! class so the sampler and the print stylesheet agree on page breaks.

use crate::content::{Block, DocumentContent, SectionContent};
use crate::error::SourceError;
use crate::ids::IdAllocator;
use crate::inline::InlineRenderer;
use crate::node::{walk_elements, write_html, Element, Node};
use folio_types::markers::{
    MATH_CLASS, MATH_DISPLAY_ATTR, MATH_TEX_ATTR, PLACEHOLDER_CLASS, PLACEHOLDER_TARGET_ATTR,
    PLACEHOLDER_TEXT, SECTION_CLASS, SECTION_ROLE_ATTR, SectionRole,
};
use folio_types::{AnchorId, TocEntry};
use std::collections::HashSet;
use std::sync::Arc;

const BASE_CSS: &str = "\
.pdf-section { break-before: page; }
.pdf-section:first-child { break-before: auto; }
.title-page { text-align: center; padding-top: 30%; }
ol.toc { list-style: none; padding: 0; }
.toc-entry a { display: flex; color: inherit; text-decoration: none; }
.toc-leader { flex: 1; border-bottom: 1px dotted currentColor; margin: 0 0.4em 0.3em; }
.toc-level-2 { padding-left: 1.5em; }
.toc-level-3 { padding-left: 3em; }
.math[data-display=\"true\"] { display: block; text-align: center; margin: 1em 0; }
";

#[derive(Debug, Clone, PartialEq)]
pub struct SourceOptions {
    /// Base URL for stylesheet and script references; also emitted as `<base href>`.
    pub asset_base_url: Option<String>,
    pub stylesheets: Vec<String>,
    pub scripts: Vec<String>,
    /// Deepest heading level listed in the table of contents.
    pub toc_depth: u8,
    /// Fixes the content column width so screen geometry matches the printed column.
    pub content_width_in: Option<f64>,
    pub lang: String,
}

impl Default for SourceOptions {
    fn default() -> Self {
        Self {
            asset_base_url: None,
            stylesheets: Vec::new(),
            scripts: Vec::new(),
            toc_depth: 2,
            content_width_in: None,
            lang: "en".to_string(),
        }
    }
}

impl SourceOptions {
    pub fn with_asset_base_url(mut self, url: impl Into<String>) -> Self {
        self.asset_base_url = Some(url.into());
        self
    }

    pub fn with_stylesheet(mut self, href: impl Into<String>) -> Self {
        self.stylesheets.push(href.into());
        self
    }

    pub fn with_script(mut self, src: impl Into<String>) -> Self {
        self.scripts.push(src.into());
        self
    }

    pub fn with_toc_depth(mut self, depth: u8) -> Self {
        self.toc_depth = depth;
        self
    }

    pub fn with_content_width(mut self, inches: f64) -> Self {
        self.content_width_in = Some(inches);
        self
    }

    fn asset_url(&self, path: &str) -> String {
        if path.contains("://") {
            return path.to_string();
        }
        match &self.asset_base_url {
            Some(base) => format!(
                "{}/{}",
                base.trim_end_matches('/'),
                path.trim_start_matches('/')
            ),
            None => path.to_string(),
        }
    }
}

/// A rendered document: an immutable head and body tree plus its table of contents.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceDocument {
    pub(crate) lang: String,
    pub(crate) head: Vec<Node>,
    pub(crate) body: Vec<Node>,
    pub(crate) toc: Vec<TocEntry>,
}

impl SourceDocument {
    pub fn toc(&self) -> &[TocEntry] {
        &self.toc
    }

    /// Anchor ids referenced by page-number placeholders, in document order, deduplicated.
    pub fn targets(&self) -> Vec<AnchorId> {
        let mut seen = HashSet::new();
        let mut targets = Vec::new();
        walk_elements(&self.body, &mut |el| {
            if el.has_class(PLACEHOLDER_CLASS)
                && let Some(target) = el.get_attr(PLACEHOLDER_TARGET_ATTR)
                && seen.insert(target)
            {
                targets.push(AnchorId::from(target));
            }
        });
        targets
    }

    /// Current text of every placeholder, keyed by target, in document order.
    pub fn placeholders(&self) -> Vec<(AnchorId, String)> {
        let mut out = Vec::new();
        walk_elements(&self.body, &mut |el| {
            if el.has_class(PLACEHOLDER_CLASS)
                && let Some(target) = el.get_attr(PLACEHOLDER_TARGET_ATTR)
            {
                out.push((AnchorId::from(target), el.text_content()));
            }
        });
        out
    }

    pub fn to_html(&self) -> String {
        let mut html = String::with_capacity(16 * 1024);
        html.push_str("<!DOCTYPE html>");
        let root = Element::new("html")
            .attr("lang", self.lang.clone())
            .child(Element::new("head").children(self.head.iter().cloned()))
            .child(Element::new("body").children(self.body.iter().cloned()));
        write_html(&[root.into()], &mut html);
        html
    }
}

/// Turns content into a [`SourceDocument`].
pub struct DocumentSource {
    inline: Arc<dyn InlineRenderer>,
    options: SourceOptions,
}

impl DocumentSource {
    pub fn new(inline: Arc<dyn InlineRenderer>) -> Self {
        Self {
            inline,
            options: SourceOptions::default(),
        }
    }

    pub fn with_options(mut self, options: SourceOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &SourceOptions {
        &self.options
    }

    pub fn build(&self, content: &DocumentContent) -> Result<SourceDocument, SourceError> {
        if content.sections.is_empty() {
            return Err(SourceError::Empty);
        }

        let mut ids = IdAllocator::new();
        reserve_explicit_ids(content, &mut ids);

        let mut toc = Vec::new();
        let mut footnotes = 0usize;
        let mut content_sections = Vec::with_capacity(content.sections.len());
        for (i, section) in content.sections.iter().enumerate() {
            content_sections.push(self.content_section(
                section,
                i,
                &mut ids,
                &mut toc,
                &mut footnotes,
            )?);
        }

        let main = Element::new("main")
            .class("folio-document")
            .child(self.title_section(content))
            .child(self.toc_section(content, &toc))
            .children(content_sections);

        log::debug!(
            "Built document '{}' with {} sections and {} TOC entries",
            content.title,
            content.sections.len(),
            toc.len()
        );

        Ok(SourceDocument {
            lang: content.lang.clone().unwrap_or_else(|| self.options.lang.clone()),
            head: self.head(content),
            body: vec![main.into()],
            toc,
        })
    }

    fn head(&self, content: &DocumentContent) -> Vec<Node> {
        let mut head: Vec<Node> = vec![Element::new("meta").attr("charset", "utf-8").into()];
        if let Some(base) = &self.options.asset_base_url {
            head.push(Element::new("base").attr("href", base.clone()).into());
        }
        head.push(Element::new("title").text(content.title.clone()).into());

        let mut css = BASE_CSS.to_string();
        if let Some(width) = self.options.content_width_in {
            css.push_str(&format!(
                "main.folio-document {{ width: {}in; margin: 0 auto; }}\n",
                width
            ));
        }
        head.push(Element::new("style").raw(css).into());

        for href in &self.options.stylesheets {
            head.push(
                Element::new("link")
                    .attr("rel", "stylesheet")
                    .attr("href", self.options.asset_url(href))
                    .into(),
            );
        }
        for src in &self.options.scripts {
            head.push(
                Element::new("script")
                    .attr("src", self.options.asset_url(src))
                    .into(),
            );
        }
        head
    }

    fn section(role: SectionRole) -> Element {
        Element::new("section")
            .class(SECTION_CLASS)
            .attr(SECTION_ROLE_ATTR, role.as_str())
    }

    fn title_section(&self, content: &DocumentContent) -> Element {
        let mut page = Element::new("div")
            .class("title-page")
            .child(Element::new("h1").raw(self.inline.render_inline(&content.title)));
        if let Some(subtitle) = &content.subtitle {
            page = page.child(
                Element::new("p")
                    .class("subtitle")
                    .raw(self.inline.render_inline(subtitle)),
            );
        }
        if let Some(author) = &content.author {
            page = page.child(Element::new("p").class("author").text(author.clone()));
        }
        if let Some(date) = &content.date {
            page = page.child(Element::new("p").class("date").text(date.clone()));
        }
        Self::section(SectionRole::Title).child(page)
    }

    fn toc_section(&self, content: &DocumentContent, toc: &[TocEntry]) -> Element {
        let entries = toc.iter().map(|entry| {
            let target = entry.target_id.as_str();
            Element::new("li")
                .class(format!("toc-entry toc-level-{}", entry.level))
                .child(
                    Element::new("a")
                        .attr("href", format!("#{}", target))
                        .child(
                            Element::new("span")
                                .class("toc-text")
                                .raw(self.inline.render_inline(&entry.text)),
                        )
                        .child(Element::new("span").class("toc-leader"))
                        .child(
                            Element::new("span")
                                .class(PLACEHOLDER_CLASS)
                                .attr(PLACEHOLDER_TARGET_ATTR, target)
                                .text(PLACEHOLDER_TEXT),
                        ),
                )
        });

        Self::section(SectionRole::Contents)
            .child(Element::new("h1").text(content.toc_title.clone()))
            .child(Element::new("ol").class("toc").children(entries))
    }

    fn content_section(
        &self,
        section: &SectionContent,
        position: usize,
        ids: &mut IdAllocator,
        toc: &mut Vec<TocEntry>,
        footnotes: &mut usize,
    ) -> Result<Element, SourceError> {
        let fallback = format!("section-{}", position + 1);
        let id = ids.allocate(section.id.as_deref(), &section.title, &fallback)?;
        toc.push(TocEntry::new(1, section.title.clone(), id.clone()));

        let mut el = Self::section(SectionRole::Content)
            .attr("id", id.as_str())
            .child(Element::new("h1").raw(self.inline.render_inline(&section.title)));

        for (b, block) in section.blocks.iter().enumerate() {
            let node = match block {
                Block::Heading {
                    level,
                    text,
                    id: explicit,
                    toc: listed,
                } => {
                    let level = (*level).clamp(2, 6);
                    let fallback = format!("{}-{}", id, b + 1);
                    let heading_id = ids.allocate(explicit.as_deref(), text, &fallback)?;
                    if *listed && level <= self.options.toc_depth {
                        toc.push(TocEntry::new(level, text.clone(), heading_id.clone()));
                    }
                    Element::new(heading_tag(level))
                        .attr("id", heading_id.as_str())
                        .raw(self.inline.render_inline(text))
                }
                Block::Paragraph { text } => {
                    Element::new("p").raw(self.inline.render_inline(text))
                }
                Block::Quote { text, attribution } => {
                    let mut quote = Element::new("blockquote")
                        .child(Element::new("p").raw(self.inline.render_inline(text)));
                    if let Some(by) = attribution {
                        quote = quote.child(Element::new("footer").text(by.clone()));
                    }
                    quote
                }
                Block::List { ordered, items } => {
                    let tag = if *ordered { "ol" } else { "ul" };
                    Element::new(tag).children(
                        items
                            .iter()
                            .map(|item| Element::new("li").raw(self.inline.render_inline(item))),
                    )
                }
                Block::Math { tex, display } => {
                    let tag = if *display { "div" } else { "span" };
                    Element::new(tag)
                        .class(MATH_CLASS)
                        .attr(MATH_TEX_ATTR, tex.clone())
                        .attr(MATH_DISPLAY_ATTR, display.to_string())
                        .text(tex.clone())
                }
                Block::Footnotes { items } => {
                    // Numbering runs across the whole document so `#fn-n` stays unique.
                    let mut list = Element::new("ol")
                        .class("footnotes")
                        .attr("start", (*footnotes + 1).to_string());
                    for item in items {
                        *footnotes += 1;
                        list = list.child(
                            Element::new("li")
                                .attr("id", format!("fn-{}", footnotes))
                                .raw(self.inline.render_inline(item)),
                        );
                    }
                    list
                }
            };
            el = el.child(node);
        }
        Ok(el)
    }
}

fn heading_tag(level: u8) -> &'static str {
    match level {
        2 => "h2",
        3 => "h3",
        4 => "h4",
        5 => "h5",
        _ => "h6",
    }
}

fn reserve_explicit_ids(content: &DocumentContent, ids: &mut IdAllocator) {
    for section in &content.sections {
        if let Some(id) = &section.id {
            ids.reserve(id);
        }
        for block in &section.blocks {
            if let Block::Heading { id: Some(id), .. } = block {
                ids.reserve(id);
            }
        }
    }
}
