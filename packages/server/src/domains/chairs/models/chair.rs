use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgConnection, PgExecutor};

use crate::common::{ChairId, OwnerId};

const CHAIR_COLUMNS: &str = "id, owner_id, name, model, is_active, created_at, updated_at";

/// A vehicle that can be assigned rides while active.
#[derive(sqlx::FromRow, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chair {
    pub id: ChairId,
    pub owner_id: OwnerId,
    pub name: String,
    pub model: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Chair {
    /// Register a chair. New chairs start inactive.
    pub async fn create<'e, E>(
        owner_id: OwnerId,
        name: &str,
        model: &str,
        executor: E,
    ) -> sqlx::Result<Self>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Self>(&format!(
            r#"
            INSERT INTO chairs (id, owner_id, name, model)
            VALUES ($1, $2, $3, $4)
            RETURNING {CHAIR_COLUMNS}
            "#
        ))
        .bind(ChairId::new())
        .bind(owner_id)
        .bind(name)
        .bind(model)
        .fetch_one(executor)
        .await
    }

    pub async fn find_by_id<'e, E>(id: ChairId, executor: E) -> sqlx::Result<Option<Self>>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Self>(&format!("SELECT {CHAIR_COLUMNS} FROM chairs WHERE id = $1"))
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    pub async fn list_by_owner<'e, E>(owner_id: OwnerId, executor: E) -> sqlx::Result<Vec<Self>>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Self>(&format!(
            "SELECT {CHAIR_COLUMNS} FROM chairs WHERE owner_id = $1 ORDER BY created_at, id"
        ))
        .bind(owner_id)
        .fetch_all(executor)
        .await
    }

    /// Returns `None` if the chair does not exist.
    pub async fn set_active<'e, E>(
        id: ChairId,
        is_active: bool,
        executor: E,
    ) -> sqlx::Result<Option<Self>>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Self>(&format!(
            r#"
            UPDATE chairs
            SET is_active = $1, updated_at = NOW()
            WHERE id = $2
            RETURNING {CHAIR_COLUMNS}
            "#
        ))
        .bind(is_active)
        .bind(id)
        .fetch_optional(executor)
        .await
    }

    /// Lock the chair row unless another transaction already holds it.
    ///
    /// `None` means the chair is missing or currently locked elsewhere. The
    /// lock is `NO KEY UPDATE` so it does not collide with the key-share locks
    /// that location inserts take on the chair row.
    pub async fn try_lock(id: ChairId, conn: &mut PgConnection) -> sqlx::Result<Option<Self>> {
        sqlx::query_as::<_, Self>(&format!(
            "SELECT {CHAIR_COLUMNS} FROM chairs WHERE id = $1 FOR NO KEY UPDATE SKIP LOCKED"
        ))
        .bind(id)
        .fetch_optional(conn)
        .await
    }
}
