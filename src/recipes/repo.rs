use anyhow::Context;
use axum::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::repo_types::{NewRecipe, Recipe};

#[async_trait]
pub trait RecipeRepo: Send + Sync {
    async fn insert(&self, recipe: NewRecipe) -> anyhow::Result<Recipe>;
    /// Newest first.
    async fn list_by_user(&self, user_id: Uuid) -> anyhow::Result<Vec<Recipe>>;
    async fn find_for_user(&self, user_id: Uuid, id: Uuid) -> anyhow::Result<Option<Recipe>>;
}

#[derive(Clone)]
pub struct PgRecipeRepo {
    db: PgPool,
}

impl PgRecipeRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RecipeRepo for PgRecipeRepo {
    async fn insert(&self, recipe: NewRecipe) -> anyhow::Result<Recipe> {
        let row = sqlx::query_as::<_, Recipe>(
            r#"
            INSERT INTO recipes (user_id, title, ingredients, recipe_text)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, title, ingredients, recipe_text, created_at
            "#,
        )
        .bind(recipe.user_id)
        .bind(&recipe.title)
        .bind(&recipe.ingredients)
        .bind(&recipe.recipe_text)
        .fetch_one(&self.db)
        .await
        .context("insert recipe")?;
        Ok(row)
    }

    async fn list_by_user(&self, user_id: Uuid) -> anyhow::Result<Vec<Recipe>> {
        let rows = sqlx::query_as::<_, Recipe>(
            r#"
            SELECT id, user_id, title, ingredients, recipe_text, created_at
            FROM recipes
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await
        .context("list recipes")?;
        Ok(rows)
    }

    async fn find_for_user(&self, user_id: Uuid, id: Uuid) -> anyhow::Result<Option<Recipe>> {
        let row = sqlx::query_as::<_, Recipe>(
            r#"
            SELECT id, user_id, title, ingredients, recipe_text, created_at
            FROM recipes
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.db)
        .await
        .context("find recipe")?;
        Ok(row)
    }
}
