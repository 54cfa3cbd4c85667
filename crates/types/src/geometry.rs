use crate::ids::AnchorId;
use serde::Serialize;

/// A top-level, forced page-break unit of the rendered document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionGeometry {
    /// Ordinal position of the section, 0-based.
    pub index: usize,
    /// Rendered bounding-box height in CSS pixels.
    pub pixel_height: f64,
    /// Scroll-adjusted top of the section at measurement time.
    pub pixel_top: f64,
}

impl SectionGeometry {
    pub fn new(index: usize, pixel_height: f64, pixel_top: f64) -> Self {
        Self {
            index,
            pixel_height,
            pixel_top,
        }
    }
}

/// Where a table-of-contents target sits inside its owning section.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnchorGeometry {
    pub id: AnchorId,
    pub section_index: usize,
    /// Pixel distance from the top of the owning section.
    pub offset_within_section: f64,
}

impl AnchorGeometry {
    pub fn new(id: impl Into<AnchorId>, section_index: usize, offset_within_section: f64) -> Self {
        Self {
            id: id.into(),
            section_index,
            offset_within_section,
        }
    }
}

/// Everything the sampler measured on one live document.
///
/// Sections are ordered by index and anchors appear at most once each.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GeometrySample {
    pub sections: Vec<SectionGeometry>,
    pub anchors: Vec<AnchorGeometry>,
}

impl GeometrySample {
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty() && self.anchors.is_empty()
    }

    /// Builds a sample from bare section heights, with `pixel_top` accumulated.
    pub fn from_heights(heights: &[f64]) -> Self {
        let mut top = 0.0;
        let sections = heights
            .iter()
            .enumerate()
            .map(|(index, &height)| {
                let section = SectionGeometry::new(index, height, top);
                top += height;
                section
            })
            .collect();
        Self {
            sections,
            anchors: Vec::new(),
        }
    }

    pub fn with_anchor(mut self, anchor: AnchorGeometry) -> Self {
        self.anchors.push(anchor);
        self
    }

    pub fn section_heights(&self) -> Vec<f64> {
        self.sections.iter().map(|s| s.pixel_height).collect()
    }
}
