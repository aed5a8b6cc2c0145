use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Type of JWT issued by the service.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    Access,
    Refresh,
    MagicLink,
}

/// Session token payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,       // user ID
    pub iat: usize,      // issued at (unix timestamp)
    pub exp: usize,      // expires at (unix timestamp)
    pub iss: String,
    pub aud: String,
    pub kind: TokenKind, // access or refresh
}

/// Magic-link payload; the user may not exist yet, so it carries the email.
/// `jti` is recorded on first use so a link signs in once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkClaims {
    pub jti: Uuid,
    pub email: String,
    pub iat: usize,
    pub exp: usize,
    pub iss: String,
    pub aud: String,
    pub kind: TokenKind,
}
