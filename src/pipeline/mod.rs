//! Two-pass document generation.
//!
//! - [`PipelineBuilder`]: fluent builder for [`DocumentPipeline`]
//! - [`PipelineConfig`]: print options, settle delays, timeout, estimator tuning
//! - [`Stage`]: the named steps of a run, used in errors and reports
//! - [`GenerationReport`]: what happened during one run
//!
//! # Example
//!
//! ```ignore
//! use folio::{PipelineBuilder, ChromeTypesetter};
//! use std::sync::Arc;
//!
//! let pipeline = PipelineBuilder::new()
//!     .with_typesetter(Arc::new(ChromeTypesetter::default()))
//!     .with_anchor_adjustment(1.10)
//!     .build()?;
//!
//! let pdf = pipeline.generate(&document).await?;
//! ```

mod builder;
pub mod config;
mod orchestrator;
pub mod prepare;
mod report;
mod stage;

pub use builder::PipelineBuilder;
pub use config::PipelineConfig;
pub use orchestrator::DocumentPipeline;
pub use report::{GenerationOutput, GenerationReport};
pub use stage::Stage;
