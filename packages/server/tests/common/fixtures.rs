//! Test fixtures for creating test data.
//!
//! These fixtures use the model methods directly to create test data.

use anyhow::Result;
use dispatch_core::common::{ChairId, Coordinate, RideId, UserId};
use dispatch_core::domains::accounts::{Owner, User};
use dispatch_core::domains::chairs::{Chair, ChairLocation};
use dispatch_core::domains::ride_status::{RideStatusLabel, RideStatusManager};
use dispatch_core::domains::rides::{PaymentToken, Ride};
use sqlx::PgPool;
use uuid::Uuid;

/// Create a requester with a unique username and a payment token.
pub async fn create_user(pool: &PgPool) -> Result<UserId> {
    let user = User::create(&format!("user-{}", Uuid::new_v4()), pool).await?;
    PaymentToken::upsert(user.id, &format!("token-{}", user.id), pool).await?;
    Ok(user.id)
}

/// Create an active chair (with its own owner) reporting the given location.
pub async fn create_active_chair(pool: &PgPool, at: Coordinate) -> Result<ChairId> {
    let chair_id = create_chair(pool, true).await?;
    ChairLocation::create(chair_id, at, pool).await?;
    Ok(chair_id)
}

/// Create a chair with no location.
pub async fn create_chair(pool: &PgPool, is_active: bool) -> Result<ChairId> {
    let owner = Owner::create(&format!("owner-{}", Uuid::new_v4()), pool).await?;
    let chair = Chair::create(owner.id, "test chair", "model-x", pool).await?;
    if is_active {
        Chair::set_active(chair.id, true, pool).await?;
    }
    Ok(chair.id)
}

/// Insert a pending ride for a fresh requester.
pub async fn create_pending_ride(pool: &PgPool, pickup: Coordinate) -> Result<RideId> {
    let user_id = create_user(pool).await?;
    let mut conn = pool.acquire().await?;
    let ride = Ride::create(user_id, pickup, Coordinate::new(100, 100), &mut conn).await?;
    Ok(ride.id)
}

/// Insert a ride already assigned to `chair_id` with the given statuses
/// recorded, bypassing the matching engine.
pub async fn create_assigned_ride(
    pool: &PgPool,
    statuses: &RideStatusManager,
    chair_id: ChairId,
    labels: &[RideStatusLabel],
) -> Result<RideId> {
    let ride_id = create_pending_ride(pool, Coordinate::new(0, 0)).await?;
    let mut conn = pool.acquire().await?;
    Ride::assign_chair(ride_id, chair_id, &mut conn).await?;
    for label in labels {
        statuses.append(ride_id, *label).await?;
    }
    Ok(ride_id)
}
