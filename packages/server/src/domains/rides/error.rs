use thiserror::Error;

use crate::common::{RideId, UserId};
use crate::domains::ride_status::{RideStatusError, RideStatusLabel};
use crate::kernel::PaymentError;

#[derive(Error, Debug)]
pub enum RideError {
    #[error("user {0} not found")]
    UserNotFound(UserId),

    #[error("ride {0} not found")]
    RideNotFound(RideId),

    #[error("user already has a ride in progress")]
    RideInProgress,

    #[error("evaluation must be between 1 and 5, got {0}")]
    InvalidEvaluation(i32),

    #[error("ride is {actual:?}, expected {expected}")]
    UnexpectedStatus {
        expected: RideStatusLabel,
        actual: Option<RideStatusLabel>,
    },

    #[error("user {0} has no payment token registered")]
    PaymentTokenRequired(UserId),

    #[error("payment failed: {0}")]
    Payment(#[from] PaymentError),

    #[error(transparent)]
    Status(#[from] RideStatusError),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}
