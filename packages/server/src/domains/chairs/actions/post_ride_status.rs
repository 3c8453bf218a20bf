//! Chair-driven status transitions

use tracing::info;

use crate::common::{ChairId, RideId};
use crate::domains::chairs::error::ChairError;
use crate::domains::ride_status::{RideStatus, RideStatusLabel};
use crate::domains::rides::models::Ride;
use crate::kernel::ServerKernel;

/// Labels a chair may append itself. The others are reached through
/// matching, location reports, or the requester's evaluation.
const CHAIR_SETTABLE: [RideStatusLabel; 2] = [RideStatusLabel::Enroute, RideStatusLabel::Carrying];

/// Append `ENROUTE` (after `MATCHED`) or `CARRYING` (after `PICKUP`) to a
/// ride assigned to the chair.
pub async fn post_ride_status(
    chair_id: ChairId,
    ride_id: RideId,
    status: RideStatusLabel,
    kernel: &ServerKernel,
) -> Result<RideStatus, ChairError> {
    if !CHAIR_SETTABLE.contains(&status) {
        return Err(ChairError::StatusNotAllowed(status));
    }

    let mut tx = kernel.ride_status.begin().await?;

    let ride = Ride::lock_by_id(ride_id, tx.conn())
        .await?
        .ok_or(ChairError::RideNotAssigned(ride_id))?;
    if ride.chair_id != Some(chair_id) {
        return Err(ChairError::RideNotAssigned(ride_id));
    }

    let latest = RideStatus::latest_label(ride_id, tx.conn()).await?;
    let expected = status.predecessor();
    if latest != expected {
        return Err(ChairError::UnexpectedStatus {
            // CHAIR_SETTABLE holds no first-in-lifecycle label.
            expected: expected.unwrap_or(status),
            actual: latest,
        });
    }

    let row = tx.append(ride_id, status).await?;
    tx.commit().await?;

    info!(chair_id = %chair_id, ride_id = %ride_id, status = %status, "Chair updated ride status");
    Ok(row)
}
