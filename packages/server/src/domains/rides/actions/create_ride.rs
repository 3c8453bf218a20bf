//! Ride intake

use tracing::{debug, info};

use crate::common::{Coordinate, UserId};
use crate::domains::accounts::User;
use crate::domains::rides::error::RideError;
use crate::domains::rides::models::Ride;
use crate::kernel::ServerKernel;

/// Create a pending ride for the requester.
///
/// A requester may hold only one ride that has not been completed; the user
/// row is locked so two concurrent requests cannot both pass that check.
/// No status is recorded here: the first event is `MATCHED`, appended when
/// the matching engine assigns a chair.
pub async fn create_ride(
    user_id: UserId,
    pickup: Coordinate,
    destination: Coordinate,
    kernel: &ServerKernel,
) -> Result<Ride, RideError> {
    let mut tx = kernel.db_pool.begin().await?;

    if User::lock_by_id(user_id, &mut *tx).await?.is_none() {
        return Err(RideError::UserNotFound(user_id));
    }

    if Ride::user_has_unfinished(user_id, &mut tx).await? {
        debug!(user_id = %user_id, "rejecting ride request, another ride in progress");
        return Err(RideError::RideInProgress);
    }

    let ride = Ride::create(user_id, pickup, destination, &mut tx).await?;
    tx.commit().await?;

    info!(
        ride_id = %ride.id,
        user_id = %user_id,
        fare = ride.fare(),
        "Ride requested"
    );
    Ok(ride)
}

/// The requester's rides, newest first. Served from the read pool.
pub async fn list_rides(user_id: UserId, kernel: &ServerKernel) -> Result<Vec<Ride>, RideError> {
    Ok(Ride::find_by_user(user_id, &kernel.read_pool).await?)
}
