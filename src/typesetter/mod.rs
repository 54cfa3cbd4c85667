//! Concrete typesetters.

#[cfg(feature = "chrome")]
mod chrome;

#[cfg(feature = "chrome")]
pub use chrome::{ChromeOptions, ChromeTypesetter};
