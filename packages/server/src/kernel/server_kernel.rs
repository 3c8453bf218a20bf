// ServerKernel - core infrastructure with all dependencies
//
// The ServerKernel holds the database pools, the status manager with its
// cache, the matching engine, and the payment gateway behind a trait so tests
// can swap it out.

use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;

use super::BasePaymentGateway;
use crate::domains::matching::MatchingEngine;
use crate::domains::ride_status::RideStatusManager;

/// ServerKernel holds all server dependencies
pub struct ServerKernel {
    /// Primary pool. All writes and all status reads go here.
    pub db_pool: PgPool,
    /// Pool for listing queries that tolerate replica lag. Same as `db_pool`
    /// when no replica is configured.
    pub read_pool: PgPool,
    pub ride_status: Arc<RideStatusManager>,
    pub matching: MatchingEngine,
    pub payment_gateway: Arc<dyn BasePaymentGateway>,
}

impl ServerKernel {
    pub fn new(
        db_pool: PgPool,
        read_pool: Option<PgPool>,
        status_cache_ttl: Duration,
        candidate_pool: Option<i64>,
        payment_gateway: Arc<dyn BasePaymentGateway>,
    ) -> Self {
        let ride_status = Arc::new(RideStatusManager::new(db_pool.clone(), status_cache_ttl));
        let matching = MatchingEngine::new(ride_status.clone(), candidate_pool);

        Self {
            read_pool: read_pool.unwrap_or_else(|| db_pool.clone()),
            db_pool,
            ride_status,
            matching,
            payment_gateway,
        }
    }
}
