use axum::{
    extract::{rejection::JsonRejection, Path, State},
    routing::{get, post},
    Json, Router,
};
use tracing::{error, instrument, warn};
use uuid::Uuid;

use super::dto::{GenerateRequest, GenerateResponse, RecipeView, REQUIRED_FIELDS};
use super::services::generate_and_save;
use crate::{auth::extractors::AuthUser, error::ApiError, state::AppState};

pub fn generate_routes() -> Router<AppState> {
    Router::new().route("/generate", post(generate))
}

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/recipes", get(list_recipes))
        .route("/recipes/:id", get(get_recipe))
}

/// POST /generate { user_id, ingredients[] }
#[instrument(skip(state, payload))]
pub async fn generate(
    State(state): State<AppState>,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Json<GenerateResponse>, ApiError> {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(e) => {
            warn!(error = %e, "unreadable generate body");
            return Err(ApiError::BadRequest(REQUIRED_FIELDS.into()));
        }
    };

    let Some((user_id, ingredients)) = request.validate() else {
        warn!("generate request missing user_id or ingredients");
        return Err(ApiError::BadRequest(REQUIRED_FIELDS.into()));
    };

    let recipe = generate_and_save(&state, &user_id, ingredients).await?;
    Ok(Json(GenerateResponse::from(&recipe)))
}

#[instrument(skip(state))]
pub async fn list_recipes(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<RecipeView>>, ApiError> {
    let recipes = state.recipes.list_by_user(user_id).await.map_err(|e| {
        error!(error = %e, %user_id, "list_recipes failed");
        ApiError::Internal(e)
    })?;
    Ok(Json(recipes.into_iter().map(RecipeView::from).collect()))
}

#[instrument(skip(state))]
pub async fn get_recipe(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<RecipeView>, ApiError> {
    match state.recipes.find_for_user(user_id, id).await {
        Ok(Some(recipe)) => Ok(Json(recipe.into())),
        Ok(None) => Err(ApiError::NotFound("Recipe not found".into())),
        Err(e) => {
            error!(error = %e, %user_id, %id, "get_recipe failed");
            Err(ApiError::Internal(e))
        }
    }
}
