//! Ride status log: the append-only store, its read-through cache, and the
//! manager that keeps the two consistent.

pub mod cache;
pub mod error;
pub mod label;
pub mod manager;
pub mod models;

pub use cache::{PgStatusHistorySource, StatusCache, StatusHistory, StatusHistorySource};
pub use error::RideStatusError;
pub use label::RideStatusLabel;
pub use manager::{Audience, RideStatusManager, StatusTransaction};
pub use models::RideStatus;
