//! Which chairs may take a ride, nearest first.
//!
//! A chair is eligible when it is active, has reported a location, and every
//! ride it was ever assigned has recorded the full lifecycle of distinct
//! status labels. Chairs with no assigned rides are eligible.

use std::collections::HashSet;

use sqlx::PgConnection;
use tracing::debug;

use crate::common::{ChairId, Coordinate};
use crate::domains::chairs::Chair;
use crate::domains::rides::Ride;

#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::FromRow)]
pub struct Candidate {
    pub chair_id: ChairId,
    /// Manhattan distance from the chair's latest location to the pickup.
    pub distance: i64,
}

pub struct EligibilityFilter;

impl EligibilityFilter {
    /// Eligible chairs for a pickup point, ranked by distance then chair id.
    ///
    /// `pool_size` narrows the scan to the nearest active chairs before busy
    /// chairs are removed, so fewer than `pool_size` may come back even when
    /// more idle chairs exist further out. `None` scans every active chair.
    pub async fn candidates(
        conn: &mut PgConnection,
        pickup: Coordinate,
        pool_size: Option<i64>,
    ) -> sqlx::Result<Vec<Candidate>> {
        let nearest = Self::nearest_active(conn, pickup, pool_size).await?;
        let chair_ids: Vec<ChairId> = nearest.iter().map(|c| c.chair_id).collect();
        let busy: HashSet<ChairId> = Ride::chairs_with_unfinished_rides(&chair_ids, conn)
            .await?
            .into_iter()
            .collect();

        debug!(
            active = nearest.len(),
            busy = busy.len(),
            "computed matching candidates"
        );
        Ok(rank_candidates(nearest, &busy))
    }

    /// Lock a candidate chair for the rest of the transaction and confirm,
    /// against committed data, that it is still active and idle.
    ///
    /// A chair locked by a concurrent matcher is skipped rather than waited
    /// on; that matcher is about to give it a ride.
    pub async fn claim_if_idle(chair_id: ChairId, conn: &mut PgConnection) -> sqlx::Result<bool> {
        let Some(chair) = Chair::try_lock(chair_id, conn).await? else {
            debug!(chair_id = %chair_id, "chair locked elsewhere, skipping");
            return Ok(false);
        };
        if !chair.is_active {
            return Ok(false);
        }

        let busy = Ride::chairs_with_unfinished_rides(&[chair_id], conn).await?;
        Ok(busy.is_empty())
    }

    async fn nearest_active(
        conn: &mut PgConnection,
        pickup: Coordinate,
        pool_size: Option<i64>,
    ) -> sqlx::Result<Vec<Candidate>> {
        // LIMIT NULL means no limit.
        sqlx::query_as::<_, Candidate>(
            r#"
            SELECT c.id AS chair_id,
                   ABS(l.latitude::bigint - $1) + ABS(l.longitude::bigint - $2) AS distance
            FROM chairs c
            JOIN LATERAL (
                SELECT latitude, longitude
                FROM chair_locations cl
                WHERE cl.chair_id = c.id
                ORDER BY cl.created_at DESC, cl.id DESC
                LIMIT 1
            ) l ON TRUE
            WHERE c.is_active
            ORDER BY distance ASC, c.id ASC
            LIMIT $3
            "#,
        )
        .bind(i64::from(pickup.latitude))
        .bind(i64::from(pickup.longitude))
        .bind(pool_size)
        .fetch_all(conn)
        .await
    }
}

/// Order by distance, ties by chair id, and drop busy chairs.
pub fn rank_candidates(mut chairs: Vec<Candidate>, busy: &HashSet<ChairId>) -> Vec<Candidate> {
    chairs.retain(|c| !busy.contains(&c.chair_id));
    chairs.sort_by_key(|c| (c.distance, c.chair_id));
    chairs
}
