pub mod destinations;
pub mod typesetter;

pub use destinations::{DestinationSource, NoDestinations};
pub use typesetter::{PaperSize, PrintOptions, RenderSession, Script, TypesetError, Typesetter};
