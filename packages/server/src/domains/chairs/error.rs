use thiserror::Error;

use crate::common::{ChairId, OwnerId, RideId};
use crate::domains::ride_status::{RideStatusError, RideStatusLabel};

#[derive(Error, Debug)]
pub enum ChairError {
    #[error("owner {0} not found")]
    OwnerNotFound(OwnerId),

    #[error("chair {0} not found")]
    ChairNotFound(ChairId),

    #[error("ride {0} is not assigned to this chair")]
    RideNotAssigned(RideId),

    #[error("chairs cannot set status {0}")]
    StatusNotAllowed(RideStatusLabel),

    #[error("ride is {actual:?}, expected {expected}")]
    UnexpectedStatus {
        expected: RideStatusLabel,
        actual: Option<RideStatusLabel>,
    },

    #[error(transparent)]
    Status(#[from] RideStatusError),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}
