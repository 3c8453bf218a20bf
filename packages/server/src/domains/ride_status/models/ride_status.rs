use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgConnection, PgExecutor};

use crate::common::{RideId, RideStatusId};
use crate::domains::ride_status::RideStatusLabel;

/// One append-only lifecycle event of a ride.
///
/// Rows are never updated except to set `app_sent_at` / `chair_sent_at`, each
/// at most once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct RideStatus {
    pub id: RideStatusId,
    pub ride_id: RideId,
    #[sqlx(try_from = "String")]
    pub status: RideStatusLabel,
    pub created_at: DateTime<Utc>,
    /// When the event was surfaced to the requester's client.
    pub app_sent_at: Option<DateTime<Utc>>,
    /// When the event was surfaced to the chair's client.
    pub chair_sent_at: Option<DateTime<Utc>>,
}

impl RideStatus {
    /// Insert a new event. Repeating a label is allowed.
    pub async fn append(
        ride_id: RideId,
        status: RideStatusLabel,
        conn: &mut PgConnection,
    ) -> sqlx::Result<Self> {
        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO ride_statuses (id, ride_id, status)
            VALUES ($1, $2, $3)
            RETURNING id, ride_id, status, created_at, app_sent_at, chair_sent_at
            "#,
        )
        .bind(RideStatusId::new())
        .bind(ride_id)
        .bind(status.as_str())
        .fetch_one(conn)
        .await
    }

    /// Set `app_sent_at` if still unset.
    ///
    /// Returns the owning ride when a row changed, `None` when the event was
    /// already delivered (or does not exist).
    pub async fn mark_app_sent(
        id: RideStatusId,
        conn: &mut PgConnection,
    ) -> sqlx::Result<Option<RideId>> {
        sqlx::query_scalar::<_, RideId>(
            r#"
            UPDATE ride_statuses
            SET app_sent_at = clock_timestamp()
            WHERE id = $1 AND app_sent_at IS NULL
            RETURNING ride_id
            "#,
        )
        .bind(id)
        .fetch_optional(conn)
        .await
    }

    /// Set `chair_sent_at` if still unset. See [`RideStatus::mark_app_sent`].
    pub async fn mark_chair_sent(
        id: RideStatusId,
        conn: &mut PgConnection,
    ) -> sqlx::Result<Option<RideId>> {
        sqlx::query_scalar::<_, RideId>(
            r#"
            UPDATE ride_statuses
            SET chair_sent_at = clock_timestamp()
            WHERE id = $1 AND chair_sent_at IS NULL
            RETURNING ride_id
            "#,
        )
        .bind(id)
        .fetch_optional(conn)
        .await
    }

    /// All events of a ride in creation order. Empty if none were recorded.
    pub async fn history<'e, E>(ride_id: RideId, executor: E) -> sqlx::Result<Vec<Self>>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Self>(
            r#"
            SELECT id, ride_id, status, created_at, app_sent_at, chair_sent_at
            FROM ride_statuses
            WHERE ride_id = $1
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(ride_id)
        .fetch_all(executor)
        .await
    }

    pub async fn find_by_id<'e, E>(id: RideStatusId, executor: E) -> sqlx::Result<Option<Self>>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Self>(
            r#"
            SELECT id, ride_id, status, created_at, app_sent_at, chair_sent_at
            FROM ride_statuses
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(executor)
        .await
    }

    /// Latest label read directly from the store, bypassing the cache.
    ///
    /// Used inside write transactions that must validate a transition against
    /// committed state.
    pub async fn latest_label(
        ride_id: RideId,
        conn: &mut PgConnection,
    ) -> sqlx::Result<Option<RideStatusLabel>> {
        let label = sqlx::query_scalar::<_, String>(
            r#"
            SELECT status
            FROM ride_statuses
            WHERE ride_id = $1
            ORDER BY created_at DESC, id DESC
            LIMIT 1
            "#,
        )
        .bind(ride_id)
        .fetch_optional(conn)
        .await?;

        label
            .map(|raw| {
                raw.parse::<RideStatusLabel>()
                    .map_err(|e| sqlx::Error::Decode(Box::new(e)))
            })
            .transpose()
    }
}
