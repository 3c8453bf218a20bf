//! Read-through cache of per-ride status histories.
//!
//! Each ride gets a [`Slot`]: an async mutex around the cached history plus a
//! generation counter.
//!
//! - A reader locks the slot. If the entry is unexpired and was loaded at the
//!   current generation it is returned as is. Otherwise the reader reloads
//!   from the [`StatusHistorySource`] while still holding the lock, so other
//!   readers of the same ride wait for that single load instead of issuing
//!   their own.
//! - [`StatusCache::invalidate`] only bumps the generation. It never waits on
//!   an in-flight load, and a load that started before the bump is stored
//!   under the old generation, so the next reader reloads instead of trusting
//!   a snapshot that may predate the write.
//!
//! Writers must call `invalidate` after their transaction commits; see
//! [`super::manager::StatusTransaction`].

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

use super::models::RideStatus;
use crate::common::RideId;

/// Shared, immutable view of a ride's status events in creation order.
pub type StatusHistory = Arc<Vec<RideStatus>>;

/// Where the cache loads authoritative histories from.
#[async_trait]
pub trait StatusHistorySource: Send + Sync {
    async fn load_history(&self, ride_id: RideId) -> sqlx::Result<Vec<RideStatus>>;
}

/// Loads histories from the primary database.
pub struct PgStatusHistorySource {
    pool: PgPool,
}

impl PgStatusHistorySource {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StatusHistorySource for PgStatusHistorySource {
    async fn load_history(&self, ride_id: RideId) -> sqlx::Result<Vec<RideStatus>> {
        RideStatus::history(ride_id, &self.pool).await
    }
}

struct Entry {
    history: StatusHistory,
    expires_at: Instant,
    generation: u64,
}

#[derive(Default)]
struct Slot {
    generation: AtomicU64,
    entry: tokio::sync::Mutex<Option<Entry>>,
}

pub struct StatusCache {
    source: Arc<dyn StatusHistorySource>,
    ttl: Duration,
    slots: Mutex<HashMap<RideId, Arc<Slot>>>,
}

impl StatusCache {
    pub fn new(source: Arc<dyn StatusHistorySource>, ttl: Duration) -> Self {
        Self {
            source,
            ttl,
            slots: Mutex::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns the ride's history, loading it on a miss or after expiry.
    pub async fn get(&self, ride_id: RideId) -> sqlx::Result<StatusHistory> {
        let slot = self.slot(ride_id);
        let mut entry = slot.entry.lock().await;

        // Read before loading: an invalidation racing the load must win.
        let generation = slot.generation.load(Ordering::Acquire);
        if let Some(cached) = entry.as_ref() {
            if cached.generation == generation && cached.expires_at > Instant::now() {
                return Ok(cached.history.clone());
            }
        }

        debug!(ride_id = %ride_id, generation, "loading ride status history");
        let history: StatusHistory = Arc::new(self.source.load_history(ride_id).await?);
        *entry = Some(Entry {
            history: history.clone(),
            expires_at: Instant::now() + self.ttl,
            generation,
        });

        Ok(history)
    }

    /// Force the next read of `ride_id` to reload from the source.
    pub fn invalidate(&self, ride_id: RideId) {
        // No slot means no reader has started loading this ride yet, so any
        // future load already observes the committed write.
        if let Some(slot) = self.lock_slots().get(&ride_id) {
            slot.generation.fetch_add(1, Ordering::AcqRel);
        }
    }

    /// Drop slots whose entry has expired and that nobody is using.
    ///
    /// Returns the number of slots removed.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut slots = self.lock_slots();
        let before = slots.len();

        slots.retain(|_, slot| {
            // The map holds the only reference, so no reader can be waiting on
            // this slot and no invalidation can be lost by removing it.
            if Arc::strong_count(slot) > 1 {
                return true;
            }
            match slot.entry.try_lock() {
                Ok(entry) => entry.as_ref().is_some_and(|e| e.expires_at > now),
                Err(_) => true,
            }
        });

        before - slots.len()
    }

    pub fn len(&self) -> usize {
        self.lock_slots().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn slot(&self, ride_id: RideId) -> Arc<Slot> {
        self.lock_slots().entry(ride_id).or_default().clone()
    }

    fn lock_slots(&self) -> std::sync::MutexGuard<'_, HashMap<RideId, Arc<Slot>>> {
        // Slot bookkeeping never panics mid-update, so a poisoned map is intact.
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
