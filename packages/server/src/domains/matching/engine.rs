//! Pairs the longest-waiting ride with the nearest eligible chair.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info};

use super::eligibility::EligibilityFilter;
use crate::common::{ChairId, RideId};
use crate::domains::ride_status::{RideStatusError, RideStatusLabel, RideStatusManager};
use crate::domains::rides::Ride;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOutcome {
    Matched { ride_id: RideId, chair_id: ChairId },
    /// No ride is waiting for a chair.
    NoPendingRide,
    /// The oldest waiting ride stays pending; no chair can take it right now.
    NoEligibleChair { ride_id: RideId },
}

#[derive(Error, Debug)]
pub enum MatchingError {
    #[error("ride {0} was assigned concurrently")]
    RideAlreadyAssigned(RideId),

    #[error(transparent)]
    Status(#[from] RideStatusError),

    #[error("matching store error: {0}")]
    Store(#[from] sqlx::Error),
}

pub struct MatchingEngine {
    ride_status: Arc<RideStatusManager>,
    candidate_pool: Option<i64>,
}

impl MatchingEngine {
    pub fn new(ride_status: Arc<RideStatusManager>, candidate_pool: Option<i64>) -> Self {
        Self {
            ride_status,
            candidate_pool,
        }
    }

    /// One matching attempt.
    ///
    /// Claiming the ride, choosing the chair, assigning it, and appending
    /// `MATCHED` happen in one transaction; on any error it rolls back and
    /// nothing changes. Concurrent engines skip each other's locked rides and
    /// chairs, so no chair ends up with two incomplete rides.
    pub async fn run_once(&self) -> Result<MatchOutcome, MatchingError> {
        let mut tx = self.ride_status.begin().await?;

        let Some(ride) = Ride::claim_oldest_pending(tx.conn()).await? else {
            debug!("no pending ride to match");
            return Ok(MatchOutcome::NoPendingRide);
        };

        let candidates =
            EligibilityFilter::candidates(tx.conn(), ride.pickup(), self.candidate_pool).await?;

        let mut chosen = None;
        for candidate in candidates {
            if EligibilityFilter::claim_if_idle(candidate.chair_id, tx.conn()).await? {
                chosen = Some(candidate);
                break;
            }
        }

        let Some(candidate) = chosen else {
            debug!(ride_id = %ride.id, "no eligible chair for pending ride");
            return Ok(MatchOutcome::NoEligibleChair { ride_id: ride.id });
        };

        if !Ride::assign_chair(ride.id, candidate.chair_id, tx.conn()).await? {
            return Err(MatchingError::RideAlreadyAssigned(ride.id));
        }
        tx.append(ride.id, RideStatusLabel::Matched).await?;
        tx.commit().await?;

        info!(
            ride_id = %ride.id,
            chair_id = %candidate.chair_id,
            distance = candidate.distance,
            "Ride matched"
        );
        Ok(MatchOutcome::Matched {
            ride_id: ride.id,
            chair_id: candidate.chair_id,
        })
    }
}
