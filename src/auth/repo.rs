use anyhow::Context;
use axum::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::repo_types::User;

#[async_trait]
pub trait UserRepo: Send + Sync {
    /// Returns the user for `email`, creating it on first sign-in.
    async fn find_or_create_by_email(&self, email: &str) -> anyhow::Result<User>;
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>>;
    /// Records a magic link as used. `false` when it already was.
    async fn redeem_magic_link(&self, jti: Uuid) -> anyhow::Result<bool>;
}

#[derive(Clone)]
pub struct PgUserRepo {
    db: PgPool,
}

impl PgUserRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepo for PgUserRepo {
    async fn find_or_create_by_email(&self, email: &str) -> anyhow::Result<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email)
            VALUES ($1)
            ON CONFLICT (email) DO UPDATE SET email = EXCLUDED.email
            RETURNING id, email, created_at
            "#,
        )
        .bind(email)
        .fetch_one(&self.db)
        .await
        .context("upsert user")?;
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"SELECT id, email, created_at FROM users WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .context("find user")?;
        Ok(user)
    }

    async fn redeem_magic_link(&self, jti: Uuid) -> anyhow::Result<bool> {
        let res = sqlx::query(
            r#"INSERT INTO magic_link_uses (jti) VALUES ($1) ON CONFLICT (jti) DO NOTHING"#,
        )
        .bind(jti)
        .execute(&self.db)
        .await
        .context("redeem magic link")?;
        Ok(res.rows_affected() == 1)
    }
}
