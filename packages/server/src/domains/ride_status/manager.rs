//! Status writes and cached status reads.
//!
//! All writes to `ride_statuses` go through a [`StatusTransaction`]. It records
//! which rides were touched and invalidates their cache entries only after
//! the transaction commits. Invalidating earlier would let a concurrent reader
//! reload a snapshot without the new row and keep serving it for a full TTL.

use std::sync::Arc;
use std::time::Duration;

use sqlx::{PgConnection, PgPool, Postgres, Transaction};
use tracing::{debug, warn};

use super::cache::{PgStatusHistorySource, StatusCache, StatusHistory};
use super::error::{RideStatusError, Result};
use super::models::RideStatus;
use super::RideStatusLabel;
use crate::common::{RideId, RideStatusId};

/// Which client an event is delivered to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Audience {
    Requester,
    Chair,
}

impl Audience {
    fn is_pending(&self, status: &RideStatus) -> bool {
        match self {
            Audience::Requester => status.app_sent_at.is_none(),
            Audience::Chair => status.chair_sent_at.is_none(),
        }
    }
}

/// A database transaction whose status writes invalidate the cache on commit.
///
/// Dropping it without calling [`StatusTransaction::commit`] rolls back and
/// leaves the cache untouched.
pub struct StatusTransaction {
    tx: Transaction<'static, Postgres>,
    cache: Arc<StatusCache>,
    touched: Vec<RideId>,
}

impl StatusTransaction {
    /// The underlying connection, for non-status statements that must commit
    /// atomically with the status writes.
    pub fn conn(&mut self) -> &mut PgConnection {
        &mut self.tx
    }

    pub async fn append(&mut self, ride_id: RideId, status: RideStatusLabel) -> Result<RideStatus> {
        let row = RideStatus::append(ride_id, status, &mut self.tx).await?;
        self.touch(ride_id);
        Ok(row)
    }

    /// Returns whether the timestamp was set by this call.
    pub async fn mark_app_sent(&mut self, id: RideStatusId) -> Result<bool> {
        let ride_id = RideStatus::mark_app_sent(id, &mut self.tx).await?;
        Ok(ride_id.map(|ride_id| self.touch(ride_id)).is_some())
    }

    /// Returns whether the timestamp was set by this call.
    pub async fn mark_chair_sent(&mut self, id: RideStatusId) -> Result<bool> {
        let ride_id = RideStatus::mark_chair_sent(id, &mut self.tx).await?;
        Ok(ride_id.map(|ride_id| self.touch(ride_id)).is_some())
    }

    pub async fn commit(self) -> Result<()> {
        let StatusTransaction { tx, cache, touched } = self;
        tx.commit().await?;
        for ride_id in touched {
            cache.invalidate(ride_id);
        }
        Ok(())
    }

    fn touch(&mut self, ride_id: RideId) {
        if !self.touched.contains(&ride_id) {
            self.touched.push(ride_id);
        }
    }
}

pub struct RideStatusManager {
    pool: PgPool,
    cache: Arc<StatusCache>,
}

impl RideStatusManager {
    /// Manager backed by a cache that loads from `pool`.
    pub fn new(pool: PgPool, ttl: Duration) -> Self {
        let source = Arc::new(PgStatusHistorySource::new(pool.clone()));
        Self::with_cache(pool, Arc::new(StatusCache::new(source, ttl)))
    }

    pub fn with_cache(pool: PgPool, cache: Arc<StatusCache>) -> Self {
        Self { pool, cache }
    }

    pub fn cache(&self) -> &Arc<StatusCache> {
        &self.cache
    }

    pub async fn begin(&self) -> Result<StatusTransaction> {
        Ok(StatusTransaction {
            tx: self.pool.begin().await?,
            cache: self.cache.clone(),
            touched: Vec::new(),
        })
    }

    // =========================================================================
    // Single-statement writes
    // =========================================================================

    pub async fn append(&self, ride_id: RideId, status: RideStatusLabel) -> Result<RideStatus> {
        let mut tx = self.begin().await?;
        let row = tx.append(ride_id, status).await?;
        tx.commit().await?;
        Ok(row)
    }

    /// Idempotent: a second call leaves the first timestamp in place.
    pub async fn mark_delivered_to_requester(&self, id: RideStatusId) -> Result<()> {
        let mut tx = self.begin().await?;
        tx.mark_app_sent(id).await?;
        tx.commit().await
    }

    /// Idempotent: a second call leaves the first timestamp in place.
    pub async fn mark_delivered_to_chair(&self, id: RideStatusId) -> Result<()> {
        let mut tx = self.begin().await?;
        tx.mark_chair_sent(id).await?;
        tx.commit().await
    }

    // =========================================================================
    // Cached reads
    // =========================================================================

    pub async fn history(&self, ride_id: RideId) -> Result<StatusHistory> {
        Ok(self.cache.get(ride_id).await?)
    }

    pub async fn latest_status(&self, ride_id: RideId) -> Result<RideStatusLabel> {
        let history = self.history(ride_id).await?;
        match history.last() {
            Some(latest) => Ok(latest.status),
            None => {
                debug!(ride_id = %ride_id, "no status recorded for ride");
                Err(RideStatusError::NoMatchingStatus)
            }
        }
    }

    pub async fn next_undelivered_for_requester(&self, ride_id: RideId) -> Result<RideStatus> {
        self.next_undelivered(ride_id, Audience::Requester).await
    }

    pub async fn next_undelivered_for_chair(&self, ride_id: RideId) -> Result<RideStatus> {
        self.next_undelivered(ride_id, Audience::Chair).await
    }

    async fn next_undelivered(&self, ride_id: RideId, audience: Audience) -> Result<RideStatus> {
        let history = self.history(ride_id).await?;
        history
            .iter()
            .find(|status| audience.is_pending(status))
            .cloned()
            .ok_or_else(|| {
                debug!(ride_id = %ride_id, ?audience, "no undelivered status");
                RideStatusError::NoMatchingStatus
            })
    }

    // =========================================================================
    // Notification polling
    // =========================================================================

    /// Hand the requester its next undelivered event and mark it delivered.
    pub async fn deliver_to_requester(&self, ride_id: RideId) -> Result<RideStatus> {
        self.deliver(ride_id, Audience::Requester).await
    }

    /// Hand the chair its next undelivered event and mark it delivered.
    pub async fn deliver_to_chair(&self, ride_id: RideId) -> Result<RideStatus> {
        self.deliver(ride_id, Audience::Chair).await
    }

    async fn deliver(&self, ride_id: RideId, audience: Audience) -> Result<RideStatus> {
        // A cached history can still list an event another poller just
        // delivered; retry once against a reloaded history in that case.
        for _ in 0..2 {
            let next = self.next_undelivered(ride_id, audience).await?;

            let mut tx = self.begin().await?;
            let marked = match audience {
                Audience::Requester => tx.mark_app_sent(next.id).await?,
                Audience::Chair => tx.mark_chair_sent(next.id).await?,
            };
            tx.commit().await?;

            if marked {
                return Ok(next);
            }
            self.cache.invalidate(ride_id);
        }

        warn!(ride_id = %ride_id, ?audience, "status delivered concurrently twice in a row");
        Err(RideStatusError::NoMatchingStatus)
    }
}
