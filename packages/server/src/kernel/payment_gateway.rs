//! HTTP client for the external payment gateway.
//!
//! `POST /payments` sometimes fails even though the charge went through, so a
//! non-204 response is reconciled with `GET /payments`: if the gateway holds
//! as many payments as the requester has completed rides, the charge counts
//! as done. Everything else is retried under the [`RetryPolicy`].

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error};

use super::retry::RetryPolicy;
use super::traits::BasePaymentGateway;

#[derive(Error, Debug)]
pub enum PaymentError {
    #[error("payment gateway request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("[GET /payments] unexpected status code ({0})")]
    UnexpectedStatus(u16),

    #[error("unexpected number of payments: {expected} != {actual}. errored upstream")]
    Mismatch { expected: i64, actual: i64 },
}

#[derive(Debug, Serialize)]
struct PostPaymentRequest {
    amount: i64,
}

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct PaymentRecord {
    amount: i64,
    status: String,
}

pub struct HttpPaymentGateway {
    client: reqwest::Client,
    base_url: String,
    retry: RetryPolicy,
}

impl HttpPaymentGateway {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_retry(base_url, RetryPolicy::default())
    }

    pub fn with_retry(base_url: impl Into<String>, retry: RetryPolicy) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            retry,
        }
    }

    fn payments_url(&self) -> String {
        format!("{}/payments", self.base_url)
    }

    async fn attempt(&self, token: &str, amount: i64, expected: i64) -> Result<(), PaymentError> {
        let response = self
            .client
            .post(self.payments_url())
            .bearer_auth(token)
            .json(&PostPaymentRequest { amount })
            .send()
            .await?;

        if response.status() == StatusCode::NO_CONTENT {
            return Ok(());
        }
        debug!(status = %response.status(), "payment post not confirmed, reconciling");

        let listing = self
            .client
            .get(self.payments_url())
            .bearer_auth(token)
            .send()
            .await?;

        // GET /payments answers 200 regardless of gateway trouble.
        if listing.status() != StatusCode::OK {
            return Err(PaymentError::UnexpectedStatus(listing.status().as_u16()));
        }

        let payments: Vec<PaymentRecord> = listing.json().await?;
        let actual = payments.len() as i64;
        if actual != expected {
            return Err(PaymentError::Mismatch { expected, actual });
        }

        Ok(())
    }
}

#[async_trait]
impl BasePaymentGateway for HttpPaymentGateway {
    async fn charge(
        &self,
        token: &str,
        amount: i64,
        expected_payments: i64,
    ) -> Result<(), PaymentError> {
        self.retry
            .run("payment_gateway.charge", || {
                self.attempt(token, amount, expected_payments)
            })
            .await
            .inspect_err(|e| error!(amount, error = %e, "payment failed after retries"))
    }
}
