//! Accounts domain - requesters and chair owners.

pub mod models;

pub use models::{Owner, User};
