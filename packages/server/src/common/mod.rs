// Common types shared across the application

pub mod coordinate;
pub mod entity_ids;
pub mod id;

pub use coordinate::Coordinate;
pub use entity_ids::*;
pub use id::Id;
