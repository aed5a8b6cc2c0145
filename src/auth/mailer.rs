use std::time::Duration;

use anyhow::Context;
use axum::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox, MultiPart, SinglePart},
    transport::smtp::authentication::Credentials,
    Message, SmtpTransport, Transport,
};
use tracing::{error, info, warn};

use crate::config::SmtpConfig;

const SUBJECT: &str = "Your PantryChef sign-in link";

/// Delivers sign-in links.
#[async_trait]
pub trait LinkMailer: Send + Sync {
    async fn send_magic_link(&self, email: &str, link: &str) -> anyhow::Result<()>;
}

/// Sends links over SMTP with STARTTLS.
#[derive(Clone)]
pub struct SmtpMailer {
    transport: SmtpTransport,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn new(config: &SmtpConfig) -> anyhow::Result<Self> {
        let from: Mailbox = config.from.parse().context("parse MAIL_FROM")?;
        let creds = Credentials::new(config.username.clone(), config.password.clone());

        let transport = SmtpTransport::starttls_relay(&config.host)
            .context("build smtp transport")?
            .credentials(creds)
            .port(config.port)
            .timeout(Some(Duration::from_secs(config.timeout_secs)))
            .build();

        info!(host = %config.host, port = config.port, "smtp mailer initialized");
        Ok(Self { transport, from })
    }

    fn build_message(&self, email: &str, link: &str) -> anyhow::Result<Message> {
        let to: Mailbox = email.parse().context("parse recipient")?;

        let plain = format!(
            "Sign in to PantryChef\n\nOpen this link to sign in:\n\n{link}\n\n\
             The link works once and expires soon. If you did not ask for it, ignore this email."
        );
        let html = format!(
            r#"<html>
  <body style="font-family: Arial, sans-serif;">
    <h2>Sign in to PantryChef</h2>
    <p><a href="{link}">Sign in</a></p>
    <p style="color: #666; font-size: 12px;">
      The link works once and expires soon. If you did not ask for it, ignore this email.
    </p>
  </body>
</html>"#
        );

        Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(SUBJECT)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(plain),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(html),
                    ),
            )
            .context("build magic link email")
    }
}

#[async_trait]
impl LinkMailer for SmtpMailer {
    async fn send_magic_link(&self, email: &str, link: &str) -> anyhow::Result<()> {
        let message = self.build_message(email, link)?;

        // SmtpTransport blocks
        let transport = self.transport.clone();
        let result = tokio::task::spawn_blocking(move || transport.send(&message))
            .await
            .context("smtp send task")?;

        match result {
            Ok(_) => {
                info!(to = %email, "magic link email sent");
                Ok(())
            }
            Err(e) => {
                error!(error = %e, to = %email, "magic link email failed");
                Err(e).context("send magic link email")
            }
        }
    }
}

/// Local development only: accepts every link and delivers none of them.
#[derive(Debug, Clone, Default)]
pub struct LogMailer;

#[async_trait]
impl LinkMailer for LogMailer {
    async fn send_magic_link(&self, email: &str, _link: &str) -> anyhow::Result<()> {
        warn!(to = %email, "MAIL_TRANSPORT=log, magic link not delivered");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn smtp_config(from: &str) -> SmtpConfig {
        SmtpConfig {
            host: "smtp.example.com".into(),
            port: 587,
            username: "mailer@example.com".into(),
            password: "secret".into(),
            from: from.into(),
            timeout_secs: 10,
        }
    }

    #[test]
    fn smtp_mailer_builds_from_config() {
        assert!(SmtpMailer::new(&smtp_config("PantryChef <no-reply@example.com>")).is_ok());
    }

    #[test]
    fn invalid_sender_is_a_config_error() {
        let err = SmtpMailer::new(&smtp_config("not an address")).err().unwrap();
        assert!(err.to_string().contains("MAIL_FROM"));
    }

    #[test]
    fn message_is_addressed_to_the_requester() {
        let mailer = SmtpMailer::new(&smtp_config("PantryChef <no-reply@example.com>")).unwrap();
        let message = mailer
            .build_message("cook@example.com", "http://localhost:5173/auth/callback?token=t")
            .unwrap();

        let envelope = message.envelope();
        let to: Vec<String> = envelope.to().iter().map(ToString::to_string).collect();
        assert_eq!(to, vec!["cook@example.com"]);
        assert_eq!(envelope.from().unwrap().to_string(), "no-reply@example.com");
    }

    #[test]
    fn bad_recipient_fails_before_sending() {
        let mailer = SmtpMailer::new(&smtp_config("no-reply@example.com")).unwrap();
        assert!(mailer.build_message("nope", "http://x").is_err());
    }

    #[tokio::test]
    async fn log_mailer_accepts_links() {
        LogMailer
            .send_magic_link("cook@example.com", "http://x/auth/callback?token=t")
            .await
            .unwrap();
    }
}
