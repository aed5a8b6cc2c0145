use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use uuid::Uuid;
use tracing::{error, info, instrument};

use super::dto::{DeletedResponse, IngredientView, NewIngredientRequest};
use crate::{auth::extractors::AuthUser, error::ApiError, state::AppState};

pub fn ingredient_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/ingredients",
            get(list_ingredients)
                .post(add_ingredient)
                .delete(clear_ingredients),
        )
        .route("/ingredients/:id", delete(delete_ingredient))
}

#[instrument(skip(state))]
pub async fn list_ingredients(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<IngredientView>>, ApiError> {
    let rows = state.ingredients.list_by_user(user_id).await.map_err(|e| {
        error!(error = %e, %user_id, "list_ingredients failed");
        ApiError::Internal(e)
    })?;
    Ok(Json(rows.into_iter().map(IngredientView::from).collect()))
}

#[instrument(skip(state, payload))]
pub async fn add_ingredient(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<NewIngredientRequest>,
) -> Result<(StatusCode, Json<IngredientView>), ApiError> {
    let name = payload.name.trim();
    if name.is_empty() {
        return Err(ApiError::BadRequest("name is required".into()));
    }

    let row = state.ingredients.insert(user_id, name).await.map_err(|e| {
        error!(error = %e, %user_id, "insert ingredient failed");
        ApiError::Internal(e)
    })?;
    Ok((StatusCode::CREATED, Json(row.into())))
}

/// Empties the caller's pantry; the client does this after a recipe is saved.
#[instrument(skip(state))]
pub async fn clear_ingredients(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<DeletedResponse>, ApiError> {
    let deleted = state
        .ingredients
        .delete_all_for_user(user_id)
        .await
        .map_err(|e| {
            error!(error = %e, %user_id, "delete ingredients failed");
            ApiError::Internal(e)
        })?;
    info!(%user_id, deleted, "ingredients cleared");
    Ok(Json(DeletedResponse { deleted }))
}

/// Removes one of the caller's ingredients; the client uses this for the
/// ingredients a saved recipe was generated from.
#[instrument(skip(state))]
pub async fn delete_ingredient(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<DeletedResponse>, ApiError> {
    let deleted = state
        .ingredients
        .delete_for_user(user_id, id)
        .await
        .map_err(|e| {
            error!(error = %e, %user_id, %id, "delete ingredient failed");
            ApiError::Internal(e)
        })?;
    if !deleted {
        return Err(ApiError::NotFound("Ingredient not found".into()));
    }
    Ok(Json(DeletedResponse { deleted: 1 }))
}
