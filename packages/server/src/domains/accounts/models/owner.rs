use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;

use crate::common::OwnerId;

/// The operator a chair belongs to.
#[derive(sqlx::FromRow, Debug, Clone, Serialize, Deserialize)]
pub struct Owner {
    pub id: OwnerId,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl Owner {
    pub async fn create<'e, E>(name: &str, executor: E) -> sqlx::Result<Self>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Self>(
            "INSERT INTO owners (id, name) VALUES ($1, $2) RETURNING id, name, created_at",
        )
        .bind(OwnerId::new())
        .bind(name)
        .fetch_one(executor)
        .await
    }

    pub async fn find_by_id<'e, E>(id: OwnerId, executor: E) -> sqlx::Result<Option<Self>>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Self>("SELECT id, name, created_at FROM owners WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await
    }
}
