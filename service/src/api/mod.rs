pub mod generate;
pub mod health;

pub use generate::generate_document;
pub use health::health_check;
