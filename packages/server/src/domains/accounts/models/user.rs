use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;

use crate::common::UserId;

/// A requester account.
#[derive(sqlx::FromRow, Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub async fn create<'e, E>(username: &str, executor: E) -> sqlx::Result<Self>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Self>(
            "INSERT INTO users (id, username) VALUES ($1, $2) RETURNING id, username, created_at",
        )
        .bind(UserId::new())
        .bind(username)
        .fetch_one(executor)
        .await
    }

    pub async fn find_by_id<'e, E>(id: UserId, executor: E) -> sqlx::Result<Option<Self>>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Self>("SELECT id, username, created_at FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Row-lock the user for the rest of the transaction. Serializes ride
    /// intake per requester.
    pub async fn lock_by_id<'e, E>(id: UserId, executor: E) -> sqlx::Result<Option<Self>>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Self>(
            "SELECT id, username, created_at FROM users WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(executor)
        .await
    }
}
