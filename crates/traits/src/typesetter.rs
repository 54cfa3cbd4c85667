//! Typesetter and RenderSession traits for abstracting the headless renderer.
//!
//! The pipeline never talks to a browser directly. It acquires a [`RenderSession`]
//! from a [`Typesetter`], loads markup into it, evaluates scripts against the live
//! DOM and asks it to print. This keeps the two-pass algorithm testable without a
//! browser and lets the backend change without touching the orchestrator.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use thiserror::Error;

/// Error type for typesetting operations.
#[derive(Error, Debug, Clone)]
pub enum TypesetError {
    #[error("Typesetting service unavailable: {0}")]
    Unavailable(String),

    #[error("Failed to load document: {0}")]
    Load(String),

    #[error("Script '{name}' failed: {message}")]
    Script { name: &'static str, message: String },

    #[error("Failed to print document: {0}")]
    Print(String),

    #[error("Failed to release rendering context: {0}")]
    Release(String),
}

/// A script to evaluate inside the live document.
///
/// The result of the final expression (awaited if it is a promise) is returned as
/// JSON. `name` identifies the script in logs and errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Script {
    pub name: &'static str,
    pub source: String,
}

impl Script {
    pub fn new(name: &'static str, source: impl Into<String>) -> Self {
        Self {
            name,
            source: source.into(),
        }
    }
}

/// Physical paper size, in inches.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PaperSize {
    Letter,
    Legal,
    A4,
    Custom { width: f64, height: f64 },
}

impl PaperSize {
    /// Returns `(width, height)` in inches.
    pub fn dimensions_in(self) -> (f64, f64) {
        match self {
            PaperSize::Letter => (8.5, 11.0),
            PaperSize::Legal => (8.5, 14.0),
            PaperSize::A4 => (8.27, 11.69),
            PaperSize::Custom { width, height } => (width, height),
        }
    }
}

/// How the final artifact is printed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrintOptions {
    pub paper: PaperSize,
    /// Uniform page margin, in inches.
    pub margin_in: f64,
    pub print_background: bool,
    /// Stamps the printed page number into the footer of every page.
    pub footer_page_numbers: bool,
}

impl Default for PrintOptions {
    fn default() -> Self {
        Self {
            paper: PaperSize::Letter,
            margin_in: 0.75,
            print_background: true,
            footer_page_numbers: true,
        }
    }
}

impl PrintOptions {
    /// Width of the printable column, in inches.
    pub fn content_width_in(&self) -> f64 {
        let (width, _) = self.paper.dimensions_in();
        (width - 2.0 * self.margin_in).max(0.0)
    }
}

/// A pooled or external rendering service.
///
/// Implementations may share one process-wide engine, but every call to
/// [`Typesetter::open`] must hand out an isolated context that holds no state
/// from other invocations.
#[async_trait]
pub trait Typesetter: Send + Sync + Debug {
    /// Acquires a fresh, isolated rendering context.
    async fn open(&self) -> Result<Box<dyn RenderSession>, TypesetError>;

    /// Returns a human-readable name for this typesetter (for logging/debugging).
    fn name(&self) -> &'static str;
}

/// One isolated rendering context (a browser tab, for instance).
///
/// Callers must call [`RenderSession::close`] on every exit path.
#[async_trait]
pub trait RenderSession: Send {
    /// Replaces the current document with `html` and waits for it to load.
    async fn load_html(&mut self, html: &str) -> Result<(), TypesetError>;

    /// Evaluates `script` against the live document.
    async fn evaluate(&mut self, script: &Script) -> Result<serde_json::Value, TypesetError>;

    /// Prints the current document to a paginated PDF.
    async fn print_pdf(&mut self, options: &PrintOptions) -> Result<Vec<u8>, TypesetError>;

    /// Releases the context.
    async fn close(self: Box<Self>) -> Result<(), TypesetError>;
}
