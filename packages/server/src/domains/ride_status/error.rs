use thiserror::Error;

#[derive(Error, Debug)]
pub enum RideStatusError {
    /// The ride has no event satisfying the query. Expected, not a failure.
    #[error("no matching ride status")]
    NoMatchingStatus,

    #[error("ride status store unavailable: {0}")]
    StoreUnavailable(#[from] sqlx::Error),
}

impl RideStatusError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, RideStatusError::NoMatchingStatus)
    }
}

pub type Result<T, E = RideStatusError> = std::result::Result<T, E>;
