use anyhow::Context;
use axum::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

/// Ingredient record in the database. Names are free text; duplicates allowed.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Ingredient {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub created_at: OffsetDateTime,
}

#[async_trait]
pub trait IngredientRepo: Send + Sync {
    async fn insert(&self, user_id: Uuid, name: &str) -> anyhow::Result<Ingredient>;
    /// Newest first.
    async fn list_by_user(&self, user_id: Uuid) -> anyhow::Result<Vec<Ingredient>>;
    /// Removes every ingredient of `user_id`, returning how many went.
    async fn delete_all_for_user(&self, user_id: Uuid) -> anyhow::Result<u64>;
    /// `false` when `id` does not exist or belongs to someone else.
    async fn delete_for_user(&self, user_id: Uuid, id: Uuid) -> anyhow::Result<bool>;
}

#[derive(Clone)]
pub struct PgIngredientRepo {
    db: PgPool,
}

impl PgIngredientRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl IngredientRepo for PgIngredientRepo {
    async fn insert(&self, user_id: Uuid, name: &str) -> anyhow::Result<Ingredient> {
        let row = sqlx::query_as::<_, Ingredient>(
            r#"
            INSERT INTO ingredients (user_id, name)
            VALUES ($1, $2)
            RETURNING id, user_id, name, created_at
            "#,
        )
        .bind(user_id)
        .bind(name)
        .fetch_one(&self.db)
        .await
        .context("insert ingredient")?;
        Ok(row)
    }

    async fn list_by_user(&self, user_id: Uuid) -> anyhow::Result<Vec<Ingredient>> {
        let rows = sqlx::query_as::<_, Ingredient>(
            r#"
            SELECT id, user_id, name, created_at
            FROM ingredients
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await
        .context("list ingredients")?;
        Ok(rows)
    }

    async fn delete_all_for_user(&self, user_id: Uuid) -> anyhow::Result<u64> {
        let res = sqlx::query("DELETE FROM ingredients WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.db)
            .await
            .context("delete ingredients")?;
        Ok(res.rows_affected())
    }

    async fn delete_for_user(&self, user_id: Uuid, id: Uuid) -> anyhow::Result<bool> {
        let res = sqlx::query("DELETE FROM ingredients WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.db)
            .await
            .context("delete ingredient")?;
        Ok(res.rows_affected() == 1)
    }
}
