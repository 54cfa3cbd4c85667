//! In-page geometry sampling.
//!
//! The sampler is a script evaluated against the live document plus the code that
//! turns its JSON answer into a clean [`GeometrySample`]. The script only reads the
//! DOM. It must run after fonts and math have settled, otherwise heights are stale.

use folio_traits::{RenderSession, Script, TypesetError};
use folio_types::markers::SECTION_CLASS;
use folio_types::{AnchorGeometry, AnchorId, GeometrySample, SectionGeometry};
use log::debug;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use thiserror::Error;

pub const SAMPLE_SCRIPT_NAME: &str = "sample-geometry";

#[derive(Error, Debug)]
pub enum SampleError {
    #[error("Sampling script failed: {0}")]
    Script(#[from] TypesetError),

    #[error("Sampling script returned unexpected data: {0}")]
    Decode(#[from] serde_json::Error),
}

const SCRIPT_TEMPLATE: &str = r#"(() => {
  const sectionClass = __SECTION_CLASS__;
  const targets = __TARGETS__;
  const selector = "." + sectionClass;
  const scrollY = window.scrollY || document.documentElement.scrollTop || 0;
  const sections = Array.from(document.getElementsByClassName(sectionClass)).filter(
    (el) => !(el.parentElement && el.parentElement.closest(selector))
  );
  const tops = [];
  const out = { sections: [], anchors: [], missing: [] };
  sections.forEach((el, index) => {
    const rect = el.getBoundingClientRect();
    tops.push(rect.top + scrollY);
    out.sections.push({ index, pixelHeight: rect.height, pixelTop: rect.top + scrollY });
  });
  for (const id of targets) {
    const el = document.getElementById(id);
    let owner = el ? el.closest(selector) : null;
    while (owner && sections.indexOf(owner) < 0) {
      owner = owner.parentElement ? owner.parentElement.closest(selector) : null;
    }
    if (!owner) {
      out.missing.push(id);
      continue;
    }
    const index = sections.indexOf(owner);
    const top = el.getBoundingClientRect().top + scrollY;
    out.anchors.push({ id, sectionIndex: index, offsetWithinSection: top - tops[index] });
  }
  return out;
})()"#;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawGeometry {
    #[serde(default)]
    sections: Vec<RawSection>,
    #[serde(default)]
    anchors: Vec<RawAnchor>,
    #[serde(default)]
    missing: Vec<String>,
}

// Non-finite numbers arrive as `null`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSection {
    index: usize,
    pixel_height: Option<f64>,
    pixel_top: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAnchor {
    id: String,
    section_index: usize,
    offset_within_section: Option<f64>,
}

fn finite_or_zero(value: Option<f64>) -> f64 {
    value.filter(|v| v.is_finite()).unwrap_or(0.0)
}

/// Measures page-break sections and table-of-contents targets in a live document.
#[derive(Debug, Clone)]
pub struct GeometrySampler {
    section_class: String,
}

impl Default for GeometrySampler {
    fn default() -> Self {
        Self {
            section_class: SECTION_CLASS.to_string(),
        }
    }
}

impl GeometrySampler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_section_class(mut self, class: impl Into<String>) -> Self {
        self.section_class = class.into();
        self
    }

    /// Builds the sampling script for `targets`.
    pub fn script(&self, targets: &[AnchorId]) -> Result<Script, SampleError> {
        let targets = serde_json::to_string(targets)?;
        let section_class = serde_json::to_string(&self.section_class)?;
        let source = SCRIPT_TEMPLATE
            .replace("__SECTION_CLASS__", &section_class)
            .replace("__TARGETS__", &targets);
        Ok(Script::new(SAMPLE_SCRIPT_NAME, source))
    }

    /// Normalizes the script's answer.
    ///
    /// Sections are re-indexed by position and anchors follow their section to its
    /// new index. Heights and offsets that are negative or not finite become zero.
    /// Anchors naming an unknown section, anchors with an empty id, and repeated
    /// anchors are dropped.
    pub fn parse(&self, value: serde_json::Value) -> Result<GeometrySample, SampleError> {
        let mut raw: RawGeometry = serde_json::from_value(value)?;
        raw.sections.sort_by_key(|s| s.index);

        let sections: Vec<SectionGeometry> = raw
            .sections
            .iter()
            .enumerate()
            .map(|(position, s)| {
                SectionGeometry::new(
                    position,
                    finite_or_zero(s.pixel_height).max(0.0),
                    finite_or_zero(s.pixel_top),
                )
            })
            .collect();

        let mut positions = HashMap::with_capacity(raw.sections.len());
        for (position, s) in raw.sections.iter().enumerate() {
            positions.entry(s.index).or_insert(position);
        }

        let mut seen = HashSet::new();
        let mut anchors = Vec::with_capacity(raw.anchors.len());
        for anchor in raw.anchors {
            let section = positions.get(&anchor.section_index).copied();
            let Some(section) = section.filter(|_| !anchor.id.is_empty()) else {
                debug!("[SAMPLE] Dropping anchor '{}' with no usable section.", anchor.id);
                continue;
            };
            if !seen.insert(anchor.id.clone()) {
                continue;
            }
            anchors.push(AnchorGeometry::new(
                anchor.id,
                section,
                finite_or_zero(anchor.offset_within_section).max(0.0),
            ));
        }

        if !raw.missing.is_empty() {
            debug!(
                "[SAMPLE] {} target(s) not present in the document: {:?}",
                raw.missing.len(),
                raw.missing
            );
        }

        Ok(GeometrySample { sections, anchors })
    }

    /// Runs the sampling script in `session` and parses the result.
    pub async fn sample(
        &self,
        session: &mut dyn RenderSession,
        targets: &[AnchorId],
    ) -> Result<GeometrySample, SampleError> {
        let script = self.script(targets)?;
        let value = session.evaluate(&script).await?;
        self.parse(value)
    }
}
