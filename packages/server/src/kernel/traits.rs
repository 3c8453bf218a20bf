// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.

use async_trait::async_trait;

use super::payment_gateway::PaymentError;

// =============================================================================
// Payment Gateway Trait (Infrastructure - fare charging)
// =============================================================================

#[async_trait]
pub trait BasePaymentGateway: Send + Sync {
    /// Charge `amount` against the requester's payment token.
    ///
    /// `expected_payments` is how many payments the gateway should hold for
    /// this token once the charge lands; it lets an implementation confirm a
    /// charge whose response was lost.
    async fn charge(&self, token: &str, amount: i64, expected_payments: i64)
        -> Result<(), PaymentError>;
}
