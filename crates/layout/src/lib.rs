//! Geometry sampling and printed-page estimation.
//!
//! - [`GeometrySampler`] measures sections and anchors in a live document.
//! - [`PageEstimator`] turns those measurements and a known page count into an
//!   estimated page number per anchor.

pub mod config;
pub mod estimator;
pub mod sampler;

pub use self::config::{EstimatorConfig, DEFAULT_ANCHOR_ADJUSTMENT};
pub use self::estimator::{Estimation, PageEstimator, SectionStart};
pub use self::sampler::{GeometrySampler, SampleError, SAMPLE_SCRIPT_NAME};

#[cfg(test)]
mod estimator_test;
