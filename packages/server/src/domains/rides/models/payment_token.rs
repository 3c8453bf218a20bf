use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;

use crate::common::UserId;

/// The payment-gateway token a requester registered for charging fares.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct PaymentToken {
    pub user_id: UserId,
    pub token: String,
    pub created_at: DateTime<Utc>,
}

impl PaymentToken {
    /// Register or replace the requester's token.
    pub async fn upsert<'e, E>(user_id: UserId, token: &str, executor: E) -> sqlx::Result<Self>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO payment_tokens (user_id, token)
            VALUES ($1, $2)
            ON CONFLICT (user_id) DO UPDATE SET token = EXCLUDED.token, created_at = NOW()
            RETURNING user_id, token, created_at
            "#,
        )
        .bind(user_id)
        .bind(token)
        .fetch_one(executor)
        .await
    }

    pub async fn find_by_user<'e, E>(user_id: UserId, executor: E) -> sqlx::Result<Option<Self>>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Self>(
            "SELECT user_id, token, created_at FROM payment_tokens WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(executor)
        .await
    }
}
