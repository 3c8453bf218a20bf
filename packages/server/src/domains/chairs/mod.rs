//! Chairs domain - chair registry, availability and position reports.

pub mod actions;
pub mod error;
pub mod models;

pub use error::ChairError;
pub use models::{Chair, ChairLocation};
