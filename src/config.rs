use std::str::FromStr;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
    pub refresh_ttl_minutes: i64,
    pub magic_link_ttl_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub api_base: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    /// `From:` mailbox, e.g. `PantryChef <no-reply@example.com>`.
    pub from: String,
    pub timeout_secs: u64,
}

/// How sign-in links leave the service. `Log` is for local development only
/// and never delivers the link.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "transport", rename_all = "snake_case")]
pub enum MailConfig {
    Smtp(SmtpConfig),
    Log,
}

impl MailConfig {
    fn from_env() -> anyhow::Result<Self> {
        match env_or("MAIL_TRANSPORT", "smtp").as_str() {
            "smtp" => {
                let username = std::env::var("SMTP_USERNAME")?;
                Ok(Self::Smtp(SmtpConfig {
                    host: std::env::var("SMTP_HOST")?,
                    port: env_parse("SMTP_PORT", 587),
                    password: std::env::var("SMTP_PASSWORD")?,
                    from: env_or("MAIL_FROM", &username),
                    username,
                    timeout_secs: env_parse("SMTP_TIMEOUT_SECS", 10),
                }))
            }
            "log" => Ok(Self::Log),
            other => anyhow::bail!("unknown MAIL_TRANSPORT {other:?}, expected smtp or log"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    /// Base URL of the web front-end; magic links point at `<public_url>/auth/callback`.
    pub public_url: String,
    pub jwt: JwtConfig,
    pub gemini: GeminiConfig,
    pub mail: MailConfig,
}

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
            issuer: env_or("JWT_ISSUER", "pantrychef"),
            audience: env_or("JWT_AUDIENCE", "pantrychef-users"),
            ttl_minutes: env_parse("JWT_TTL_MINUTES", 60),
            refresh_ttl_minutes: env_parse("JWT_REFRESH_TTL_MINUTES", 60 * 24 * 14),
            magic_link_ttl_minutes: env_parse("MAGIC_LINK_TTL_MINUTES", 15),
        };
        let gemini = GeminiConfig {
            api_key: std::env::var("GEMINI_API_KEY")?,
            model: env_or("GEMINI_MODEL", DEFAULT_MODEL),
            api_base: env_or("GEMINI_API_BASE", DEFAULT_GEMINI_API_BASE),
            timeout_secs: env_parse("GEMINI_TIMEOUT_SECS", 120),
        };
        Ok(Self {
            database_url,
            public_url: env_or("APP_PUBLIC_URL", "http://localhost:5173"),
            jwt,
            gemini,
            mail: MailConfig::from_env()?,
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.into())
}

fn env_parse<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}
