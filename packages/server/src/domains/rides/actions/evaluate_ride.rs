//! Ride evaluation and payment

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::common::RideId;
use crate::domains::ride_status::{RideStatus, RideStatusLabel};
use crate::domains::rides::error::RideError;
use crate::domains::rides::models::{PaymentToken, Ride};
use crate::kernel::ServerKernel;

#[derive(Debug, Clone, Serialize)]
pub struct EvaluatedRide {
    pub ride_id: RideId,
    pub fare: i64,
    pub completed_at: DateTime<Utc>,
}

/// Rate an arrived ride, complete it, and charge the fare.
///
/// The charge happens inside the status transaction: if the gateway fails,
/// the evaluation and `COMPLETED` event roll back and the ride stays
/// `ARRIVED`.
pub async fn evaluate_ride(
    ride_id: RideId,
    evaluation: i32,
    kernel: &ServerKernel,
) -> Result<EvaluatedRide, RideError> {
    if !(1..=5).contains(&evaluation) {
        return Err(RideError::InvalidEvaluation(evaluation));
    }

    let mut tx = kernel.ride_status.begin().await?;

    let ride = Ride::lock_by_id(ride_id, tx.conn())
        .await?
        .ok_or(RideError::RideNotFound(ride_id))?;

    let latest = RideStatus::latest_label(ride_id, tx.conn()).await?;
    if latest != Some(RideStatusLabel::Arrived) {
        return Err(RideError::UnexpectedStatus {
            expected: RideStatusLabel::Arrived,
            actual: latest,
        });
    }

    Ride::set_evaluation(ride_id, evaluation, tx.conn()).await?;
    let completed = tx.append(ride_id, RideStatusLabel::Completed).await?;

    let token = PaymentToken::find_by_user(ride.user_id, tx.conn())
        .await?
        .ok_or(RideError::PaymentTokenRequired(ride.user_id))?;
    let expected_payments = Ride::count_completed_for_user(ride.user_id, tx.conn()).await?;
    let fare = ride.fare();

    kernel
        .payment_gateway
        .charge(&token.token, fare, expected_payments)
        .await?;

    tx.commit().await?;

    info!(ride_id = %ride_id, evaluation, fare, "Ride completed");
    Ok(EvaluatedRide {
        ride_id,
        fare,
        completed_at: completed.created_at,
    })
}
