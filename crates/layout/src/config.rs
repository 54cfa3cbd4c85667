/// The empirically chosen per-anchor correction. See [`EstimatorConfig::anchor_adjustment`].
pub const DEFAULT_ANCHOR_ADJUSTMENT: f64 = 1.10;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EstimatorConfig {
    /// Pages at the front of the document that precede all content sections:
    /// the title page and the table of contents.
    ///
    /// Defaults to `2`.
    pub reserved_pages: usize,

    /// Divisor correction applied when converting an anchor's offset inside its
    /// section into additional pages. Fine-grained offsets systematically
    /// over-count pages when measured against the global pixels-per-page rate,
    /// so the rate is stretched by this factor for anchors only.
    ///
    /// - **Higher values**: anchors are pulled towards the start of their section.
    /// - **Lower values**: anchors drift later; `1.0` disables the correction.
    ///
    /// Must be finite and positive. Defaults to [`DEFAULT_ANCHOR_ADJUSTMENT`].
    pub anchor_adjustment: f64,
}

impl EstimatorConfig {
    pub fn with_anchor_adjustment(mut self, adjustment: f64) -> Self {
        self.anchor_adjustment = adjustment;
        self
    }

    pub fn is_valid(&self) -> bool {
        self.anchor_adjustment.is_finite() && self.anchor_adjustment > 0.0
    }
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            reserved_pages: folio_types::markers::RESERVED_SECTIONS,
            anchor_adjustment: DEFAULT_ANCHOR_ADJUSTMENT,
        }
    }
}
