use folio_layout::EstimatorConfig;
use folio_traits::PrintOptions;
use std::time::Duration;

/// Upper bound on one whole generation, both passes included.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Longest wait for the rendering context to be released once a run has ended.
pub const DEFAULT_RELEASE_TIMEOUT: Duration = Duration::from_secs(5);

/// Pause after font loading and after math typesetting before the DOM is trusted.
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    pub print: PrintOptions,
    pub font_settle: Duration,
    pub math_settle: Duration,
    pub timeout: Duration,
    /// Bounds `close` on the rendering context; past it the context is dropped.
    pub release_timeout: Duration,
    pub estimator: EstimatorConfig,
    /// Logs intermediate geometry and page maps.
    pub debug: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            print: PrintOptions::default(),
            font_settle: DEFAULT_SETTLE_DELAY,
            math_settle: DEFAULT_SETTLE_DELAY,
            timeout: DEFAULT_TIMEOUT,
            release_timeout: DEFAULT_RELEASE_TIMEOUT,
            estimator: EstimatorConfig::default(),
            debug: false,
        }
    }
}
