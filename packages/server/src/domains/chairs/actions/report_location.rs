//! Chair location reports
//!
//! Besides recording the position, a report can advance the chair's current
//! ride: reaching the pickup point while `ENROUTE` appends `PICKUP`, reaching
//! the destination while `CARRYING` appends `ARRIVED`.

use tracing::{debug, info};

use crate::common::{ChairId, Coordinate};
use crate::domains::chairs::error::ChairError;
use crate::domains::chairs::models::{Chair, ChairLocation};
use crate::domains::ride_status::{RideStatus, RideStatusLabel};
use crate::domains::rides::models::Ride;
use crate::kernel::ServerKernel;

pub async fn report_location(
    chair_id: ChairId,
    at: Coordinate,
    kernel: &ServerKernel,
) -> Result<ChairLocation, ChairError> {
    if Chair::find_by_id(chair_id, &kernel.db_pool).await?.is_none() {
        return Err(ChairError::ChairNotFound(chair_id));
    }

    let mut tx = kernel.ride_status.begin().await?;
    let location = ChairLocation::create(chair_id, at, tx.conn()).await?;

    if let Some(ride) = Ride::lock_current_for_chair(chair_id, tx.conn()).await? {
        let latest = RideStatus::latest_label(ride.id, tx.conn()).await?;
        if let Some(next) = arrival_transition(latest, &ride, at) {
            tx.append(ride.id, next).await?;
            info!(chair_id = %chair_id, ride_id = %ride.id, status = %next, "Ride advanced by location");
        }
    }

    tx.commit().await?;
    debug!(chair_id = %chair_id, latitude = at.latitude, longitude = at.longitude, "Location recorded");
    Ok(location)
}

/// The status a location report implies for the chair's current ride, if any.
fn arrival_transition(
    latest: Option<RideStatusLabel>,
    ride: &Ride,
    at: Coordinate,
) -> Option<RideStatusLabel> {
    match latest? {
        RideStatusLabel::Enroute if at == ride.pickup() => Some(RideStatusLabel::Pickup),
        RideStatusLabel::Carrying if at == ride.destination() => Some(RideStatusLabel::Arrived),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::{RideId, UserId};
    use chrono::Utc;

    fn ride() -> Ride {
        Ride {
            id: RideId::new(),
            user_id: UserId::new(),
            chair_id: Some(ChairId::new()),
            pickup_latitude: 0,
            pickup_longitude: 0,
            destination_latitude: 10,
            destination_longitude: 10,
            evaluation: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn enroute_chair_at_pickup_picks_up() {
        let ride = ride();
        assert_eq!(
            arrival_transition(Some(RideStatusLabel::Enroute), &ride, ride.pickup()),
            Some(RideStatusLabel::Pickup)
        );
    }

    #[test]
    fn carrying_chair_at_destination_arrives() {
        let ride = ride();
        assert_eq!(
            arrival_transition(Some(RideStatusLabel::Carrying), &ride, ride.destination()),
            Some(RideStatusLabel::Arrived)
        );
    }

    #[test]
    fn elsewhere_or_other_status_changes_nothing() {
        let ride = ride();
        assert_eq!(
            arrival_transition(Some(RideStatusLabel::Enroute), &ride, Coordinate::new(3, 3)),
            None
        );
        assert_eq!(
            arrival_transition(Some(RideStatusLabel::Matched), &ride, ride.pickup()),
            None
        );
        assert_eq!(arrival_transition(None, &ride, ride.pickup()), None);
    }
}
