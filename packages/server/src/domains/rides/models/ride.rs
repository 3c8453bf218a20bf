use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgConnection, PgExecutor};

use crate::common::{ChairId, Coordinate, RideId, UserId};
use crate::domains::ride_status::RideStatusLabel;

/// Base fare charged for every ride.
pub const INITIAL_FARE: i64 = 500;
/// Fare added per unit of Manhattan distance between pickup and destination.
pub const FARE_PER_DISTANCE: i64 = 100;

const RIDE_COLUMNS: &str = "id, user_id, chair_id, pickup_latitude, pickup_longitude, \
     destination_latitude, destination_longitude, evaluation, created_at, updated_at";

/// A transportation request. Pending while `chair_id` is `None`; the chair is
/// assigned once by the matching engine and never changed afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Ride {
    pub id: RideId,
    pub user_id: UserId,
    pub chair_id: Option<ChairId>,
    pub pickup_latitude: i32,
    pub pickup_longitude: i32,
    pub destination_latitude: i32,
    pub destination_longitude: i32,
    pub evaluation: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Ride {
    pub fn pickup(&self) -> Coordinate {
        Coordinate::new(self.pickup_latitude, self.pickup_longitude)
    }

    pub fn destination(&self) -> Coordinate {
        Coordinate::new(self.destination_latitude, self.destination_longitude)
    }

    pub fn is_pending(&self) -> bool {
        self.chair_id.is_none()
    }

    pub fn fare(&self) -> i64 {
        calculate_fare(self.pickup(), self.destination())
    }

    pub async fn create(
        user_id: UserId,
        pickup: Coordinate,
        destination: Coordinate,
        conn: &mut PgConnection,
    ) -> sqlx::Result<Self> {
        sqlx::query_as::<_, Self>(&format!(
            r#"
            INSERT INTO rides (id, user_id, pickup_latitude, pickup_longitude,
                               destination_latitude, destination_longitude)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {RIDE_COLUMNS}
            "#
        ))
        .bind(RideId::new())
        .bind(user_id)
        .bind(pickup.latitude)
        .bind(pickup.longitude)
        .bind(destination.latitude)
        .bind(destination.longitude)
        .fetch_one(conn)
        .await
    }

    pub async fn find_by_id<'e, E>(id: RideId, executor: E) -> sqlx::Result<Option<Self>>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Self>(&format!("SELECT {RIDE_COLUMNS} FROM rides WHERE id = $1"))
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Row-locks the ride for the rest of the transaction.
    pub async fn lock_by_id(id: RideId, conn: &mut PgConnection) -> sqlx::Result<Option<Self>> {
        sqlx::query_as::<_, Self>(&format!(
            "SELECT {RIDE_COLUMNS} FROM rides WHERE id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(conn)
        .await
    }

    /// A requester's rides, newest first.
    pub async fn find_by_user<'e, E>(user_id: UserId, executor: E) -> sqlx::Result<Vec<Self>>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Self>(&format!(
            "SELECT {RIDE_COLUMNS} FROM rides WHERE user_id = $1 ORDER BY created_at DESC, id DESC"
        ))
        .bind(user_id)
        .fetch_all(executor)
        .await
    }

    /// Lock and return the longest-waiting ride with no chair.
    ///
    /// Rides already locked by a concurrent matcher are skipped, so two
    /// matchers never work on the same ride.
    pub async fn claim_oldest_pending(conn: &mut PgConnection) -> sqlx::Result<Option<Self>> {
        sqlx::query_as::<_, Self>(&format!(
            r#"
            SELECT {RIDE_COLUMNS}
            FROM rides
            WHERE chair_id IS NULL
            ORDER BY created_at ASC, id ASC
            LIMIT 1
            FOR NO KEY UPDATE SKIP LOCKED
            "#
        ))
        .fetch_optional(conn)
        .await
    }

    /// Set the chair of a pending ride. Returns `false` if the ride already
    /// had one.
    pub async fn assign_chair(
        id: RideId,
        chair_id: ChairId,
        conn: &mut PgConnection,
    ) -> sqlx::Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE rides
            SET chair_id = $1, updated_at = clock_timestamp()
            WHERE id = $2 AND chair_id IS NULL
            "#,
        )
        .bind(chair_id)
        .bind(id)
        .execute(conn)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    pub async fn set_evaluation(
        id: RideId,
        evaluation: i32,
        conn: &mut PgConnection,
    ) -> sqlx::Result<()> {
        sqlx::query(
            "UPDATE rides SET evaluation = $1, updated_at = clock_timestamp() WHERE id = $2",
        )
        .bind(evaluation)
        .bind(id)
        .execute(conn)
        .await?;
        Ok(())
    }

    /// The chair's unfinished ride, row-locked. Rides can be assigned out of
    /// creation order, so this goes by lifecycle progress and assignment time.
    pub async fn lock_current_for_chair(
        chair_id: ChairId,
        conn: &mut PgConnection,
    ) -> sqlx::Result<Option<Self>> {
        sqlx::query_as::<_, Self>(&format!(
            r#"
            SELECT {RIDE_COLUMNS}
            FROM rides r
            WHERE r.chair_id = $1
              AND (
                  SELECT COUNT(DISTINCT rs.status)
                  FROM ride_statuses rs
                  WHERE rs.ride_id = r.id
              ) < $2
            ORDER BY r.updated_at DESC, r.id DESC
            LIMIT 1
            FOR UPDATE
            "#
        ))
        .bind(chair_id)
        .bind(RideStatusLabel::lifecycle_len() as i64)
        .fetch_optional(conn)
        .await
    }

    /// Whether the requester has any ride that has not reached the terminal
    /// status yet (pending rides included).
    pub async fn user_has_unfinished(user_id: UserId, conn: &mut PgConnection) -> sqlx::Result<bool> {
        sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1
                FROM rides r
                WHERE r.user_id = $1
                  AND NOT EXISTS (
                      SELECT 1 FROM ride_statuses rs
                      WHERE rs.ride_id = r.id AND rs.status = $2
                  )
            )
            "#,
        )
        .bind(user_id)
        .bind(terminal_label().as_str())
        .fetch_one(conn)
        .await
    }

    /// Number of the requester's rides that reached the terminal status.
    pub async fn count_completed_for_user(
        user_id: UserId,
        conn: &mut PgConnection,
    ) -> sqlx::Result<i64> {
        sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(DISTINCT r.id)
            FROM rides r
            JOIN ride_statuses rs ON rs.ride_id = r.id
            WHERE r.user_id = $1 AND rs.status = $2
            "#,
        )
        .bind(user_id)
        .bind(terminal_label().as_str())
        .fetch_one(conn)
        .await
    }

    /// Of the given chairs, those with an assigned ride that has recorded
    /// fewer distinct statuses than the full lifecycle.
    pub async fn chairs_with_unfinished_rides(
        chair_ids: &[ChairId],
        conn: &mut PgConnection,
    ) -> sqlx::Result<Vec<ChairId>> {
        if chair_ids.is_empty() {
            return Ok(Vec::new());
        }

        sqlx::query_scalar::<_, ChairId>(
            r#"
            SELECT DISTINCT r.chair_id
            FROM rides r
            WHERE r.chair_id = ANY($1)
              AND (
                  SELECT COUNT(DISTINCT rs.status)
                  FROM ride_statuses rs
                  WHERE rs.ride_id = r.id
              ) < $2
            "#,
        )
        .bind(chair_ids)
        .bind(RideStatusLabel::lifecycle_len() as i64)
        .fetch_all(conn)
        .await
    }
}

fn terminal_label() -> RideStatusLabel {
    RideStatusLabel::LIFECYCLE[RideStatusLabel::LIFECYCLE.len() - 1]
}

pub fn calculate_fare(pickup: Coordinate, destination: Coordinate) -> i64 {
    INITIAL_FARE + FARE_PER_DISTANCE * pickup.distance_to(&destination)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fare_is_base_plus_distance() {
        let fare = calculate_fare(Coordinate::new(0, 0), Coordinate::new(10, 10));
        assert_eq!(fare, INITIAL_FARE + 20 * FARE_PER_DISTANCE);
    }

    #[test]
    fn same_point_costs_only_the_base_fare() {
        let here = Coordinate::new(-5, 12);
        assert_eq!(calculate_fare(here, here), INITIAL_FARE);
    }

    #[test]
    fn terminal_label_is_completed() {
        assert!(terminal_label().is_terminal());
    }
}
