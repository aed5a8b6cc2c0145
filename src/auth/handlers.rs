use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{error, info, instrument, warn};

use super::{
    dto::{
        AuthResponse, MagicLinkRequest, MagicLinkResponse, PublicUser, RefreshRequest,
        VerifyRequest,
    },
    extractors::AuthUser,
    jwt::JwtKeys,
    repo_types::User,
    services::{is_valid_email, magic_link_url, normalize_email},
};
use crate::{error::ApiError, state::AppState};

pub const LINK_SENT: &str = "Check your email for a login link.";
const INVALID_LINK: &str = "Invalid or expired link";

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/magic-link", post(request_magic_link))
        .route("/auth/verify", post(verify))
        .route("/auth/refresh", post(refresh))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/me", get(get_me))
}

fn issue_pair(keys: &JwtKeys, user: User) -> Result<AuthResponse, ApiError> {
    let access_token = keys.sign_access(user.id).map_err(|e| {
        error!(error = %e, "jwt sign access failed");
        ApiError::Internal(e)
    })?;
    let refresh_token = keys.sign_refresh(user.id).map_err(|e| {
        error!(error = %e, "jwt sign refresh failed");
        ApiError::Internal(e)
    })?;
    Ok(AuthResponse {
        access_token,
        refresh_token,
        user: PublicUser {
            id: user.id,
            email: user.email,
        },
    })
}

#[instrument(skip(state, payload))]
pub async fn request_magic_link(
    State(state): State<AppState>,
    Json(payload): Json<MagicLinkRequest>,
) -> Result<(StatusCode, Json<MagicLinkResponse>), ApiError> {
    let email = normalize_email(&payload.email);
    if !is_valid_email(&email) {
        warn!(email = %email, "invalid email");
        return Err(ApiError::BadRequest("Invalid email".into()));
    }

    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign_magic_link(&email).map_err(|e| {
        error!(error = %e, "jwt sign magic link failed");
        ApiError::Internal(e)
    })?;
    let link = magic_link_url(&state.config.public_url, &token);

    state.mailer.send_magic_link(&email, &link).await.map_err(|e| {
        error!(error = %e, email = %email, "sending magic link failed");
        ApiError::Internal(e)
    })?;

    info!(email = %email, "magic link requested");
    Ok((
        StatusCode::ACCEPTED,
        Json(MagicLinkResponse {
            message: LINK_SENT.into(),
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn verify(
    State(state): State<AppState>,
    Json(payload): Json<VerifyRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let keys = JwtKeys::from_ref(&state);
    let claims = keys.verify_magic_link(&payload.token).map_err(|e| {
        warn!(error = %e, "magic link rejected");
        ApiError::Unauthorized(INVALID_LINK.into())
    })?;

    let first_use = state.users.redeem_magic_link(claims.jti).await.map_err(|e| {
        error!(error = %e, "redeem_magic_link failed");
        ApiError::Internal(e)
    })?;
    if !first_use {
        warn!(jti = %claims.jti, "magic link reused");
        return Err(ApiError::Unauthorized(INVALID_LINK.into()));
    }

    let user = state
        .users
        .find_or_create_by_email(&claims.email)
        .await
        .map_err(|e| {
            error!(error = %e, "find_or_create_by_email failed");
            ApiError::Internal(e)
        })?;

    info!(user_id = %user.id, email = %user.email, "user signed in");
    Ok(Json(issue_pair(&keys, user)?))
}

#[instrument(skip(state, payload))]
pub async fn refresh(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let keys = JwtKeys::from_ref(&state);
    let claims = keys
        .verify_refresh(&payload.refresh_token)
        .map_err(|e| ApiError::Unauthorized(e.to_string()))?;

    let user = state
        .users
        .find_by_id(claims.sub)
        .await
        .map_err(ApiError::Internal)?
        .ok_or_else(|| ApiError::Unauthorized("User not found".into()))?;

    Ok(Json(issue_pair(&keys, user)?))
}

#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<PublicUser>, ApiError> {
    let user = state
        .users
        .find_by_id(user_id)
        .await
        .map_err(|e| {
            error!(error = %e, user_id = %user_id, "find_by_id failed");
            ApiError::Internal(e)
        })?
        .ok_or_else(|| ApiError::Unauthorized("User not found".into()))?;

    Ok(Json(PublicUser {
        id: user.id,
        email: user.email,
    }))
}
