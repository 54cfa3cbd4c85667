pub mod document;
pub mod geometry;
pub mod ids;
pub mod markers;
pub mod pages;

pub use document::TocEntry;
pub use geometry::{AnchorGeometry, GeometrySample, SectionGeometry};
pub use ids::AnchorId;
pub use pages::{ExactDestinations, PageEstimate, PageNumber, ResolvedPageNumbers};
