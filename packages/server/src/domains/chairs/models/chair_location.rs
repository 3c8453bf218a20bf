use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;

use crate::common::{ChairId, ChairLocationId, Coordinate};

/// A position report. The most recent row per chair is its current location.
#[derive(sqlx::FromRow, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChairLocation {
    pub id: ChairLocationId,
    pub chair_id: ChairId,
    pub latitude: i32,
    pub longitude: i32,
    pub created_at: DateTime<Utc>,
}

impl ChairLocation {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }

    pub async fn create<'e, E>(
        chair_id: ChairId,
        at: Coordinate,
        executor: E,
    ) -> sqlx::Result<Self>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO chair_locations (id, chair_id, latitude, longitude)
            VALUES ($1, $2, $3, $4)
            RETURNING id, chair_id, latitude, longitude, created_at
            "#,
        )
        .bind(ChairLocationId::new())
        .bind(chair_id)
        .bind(at.latitude)
        .bind(at.longitude)
        .fetch_one(executor)
        .await
    }

    pub async fn latest_for_chair<'e, E>(chair_id: ChairId, executor: E) -> sqlx::Result<Option<Self>>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Self>(
            r#"
            SELECT id, chair_id, latitude, longitude, created_at
            FROM chair_locations
            WHERE chair_id = $1
            ORDER BY created_at DESC, id DESC
            LIMIT 1
            "#,
        )
        .bind(chair_id)
        .fetch_optional(executor)
        .await
    }
}
