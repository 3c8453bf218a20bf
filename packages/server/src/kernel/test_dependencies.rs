// TestDependencies - mock implementations for testing
//
// Provides mock services that can be injected into ServerKernel for tests.

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use super::{BasePaymentGateway, PaymentError, ServerKernel};

// =============================================================================
// Mock Payment Gateway
// =============================================================================

/// Arguments captured from a charge call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChargeCall {
    pub token: String,
    pub amount: i64,
    pub expected_payments: i64,
}

#[derive(Clone, Default)]
pub struct MockPaymentGateway {
    calls: Arc<Mutex<Vec<ChargeCall>>>,
    fail: bool,
}

impl MockPaymentGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every charge is rejected as if the gateway lost the payment.
    pub fn failing() -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            fail: true,
        }
    }

    pub fn calls(&self) -> Vec<ChargeCall> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

#[async_trait]
impl BasePaymentGateway for MockPaymentGateway {
    async fn charge(
        &self,
        token: &str,
        amount: i64,
        expected_payments: i64,
    ) -> Result<(), PaymentError> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).push(ChargeCall {
            token: token.to_string(),
            amount,
            expected_payments,
        });

        if self.fail {
            return Err(PaymentError::Mismatch {
                expected: expected_payments,
                actual: expected_payments - 1,
            });
        }
        Ok(())
    }
}

// =============================================================================
// TestDependencies
// =============================================================================

pub struct TestDependencies {
    pub payment_gateway: MockPaymentGateway,
    pub status_cache_ttl: Duration,
    pub candidate_pool: Option<i64>,
}

impl TestDependencies {
    pub fn new() -> Self {
        Self {
            payment_gateway: MockPaymentGateway::new(),
            status_cache_ttl: Duration::from_secs(1),
            candidate_pool: None,
        }
    }

    pub fn mock_payments(mut self, gateway: MockPaymentGateway) -> Self {
        self.payment_gateway = gateway;
        self
    }

    pub fn status_cache_ttl(mut self, ttl: Duration) -> Self {
        self.status_cache_ttl = ttl;
        self
    }

    pub fn candidate_pool(mut self, limit: i64) -> Self {
        self.candidate_pool = Some(limit);
        self
    }

    /// Convert into a ServerKernel for testing
    pub fn into_kernel(self, db_pool: PgPool) -> Arc<ServerKernel> {
        Arc::new(ServerKernel::new(
            db_pool,
            None,
            self.status_cache_ttl,
            self.candidate_pool,
            Arc::new(self.payment_gateway),
        ))
    }
}

impl Default for TestDependencies {
    fn default() -> Self {
        Self::new()
    }
}
