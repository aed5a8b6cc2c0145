use crate::auth::mailer::{LinkMailer, LogMailer, SmtpMailer};
use crate::auth::repo::{PgUserRepo, UserRepo};
use crate::config::{AppConfig, MailConfig};
use crate::db;
use crate::ingredients::repo::{IngredientRepo, PgIngredientRepo};
use crate::llm::{gemini::GeminiProvider, CompletionProvider};
use crate::recipes::repo::{PgRecipeRepo, RecipeRepo};
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub users: Arc<dyn UserRepo>,
    pub ingredients: Arc<dyn IngredientRepo>,
    pub recipes: Arc<dyn RecipeRepo>,
    pub completions: Arc<dyn CompletionProvider>,
    pub mailer: Arc<dyn LinkMailer>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let db = db::connect(&config).await?;
        db::run_migrations(&db).await;

        let completions =
            Arc::new(GeminiProvider::new(config.gemini.clone())?) as Arc<dyn CompletionProvider>;

        let mailer: Arc<dyn LinkMailer> = match &config.mail {
            MailConfig::Smtp(smtp) => Arc::new(SmtpMailer::new(smtp)?),
            MailConfig::Log => {
                tracing::warn!("MAIL_TRANSPORT=log: magic links will not be delivered");
                Arc::new(LogMailer)
            }
        };

        Ok(Self::from_parts(config, db, completions, mailer))
    }

    pub fn from_parts(
        config: Arc<AppConfig>,
        db: PgPool,
        completions: Arc<dyn CompletionProvider>,
        mailer: Arc<dyn LinkMailer>,
    ) -> Self {
        Self {
            config,
            users: Arc::new(PgUserRepo::new(db.clone())),
            ingredients: Arc::new(PgIngredientRepo::new(db.clone())),
            recipes: Arc::new(PgRecipeRepo::new(db)),
            completions,
            mailer,
        }
    }
}
