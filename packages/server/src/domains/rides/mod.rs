//! Rides domain - ride intake, evaluation and fare payment.

pub mod actions;
pub mod error;
pub mod models;

pub use error::RideError;
pub use models::{PaymentToken, Ride};
