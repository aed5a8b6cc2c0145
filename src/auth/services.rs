use lazy_static::lazy_static;
use regex::Regex;

pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Link the front-end opens to finish sign-in.
pub(crate) fn magic_link_url(public_url: &str, token: &str) -> String {
    format!("{}/auth/callback?token={}", public_url.trim_end_matches('/'), token)
}
