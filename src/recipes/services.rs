use anyhow::Context;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use super::repo_types::{NewRecipe, Recipe};
use crate::{error::ApiError, state::AppState};

/// Title used when the model output has no non-blank line at all.
pub const FALLBACK_TITLE: &str = "simple recipe";

pub fn build_prompt(ingredients: &[String]) -> String {
    format!(
        "You are a friendly cooking assistant.
Using ONLY these ingredients: {}, plus basics like salt, oil, and water,
create a very simple recipe.

Include:
- A short title
- A 1–2 line description
- Ingredients list
- 4–6 very simple steps
",
        ingredients.join(", ")
    )
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRecipe {
    pub title: String,
    pub recipe_text: String,
}

/// First non-blank line is the title, the remaining non-blank lines
/// (trimmed) joined by `\n` are the body. Best effort: output without a
/// clean leading title line is stored as-is.
pub fn split_title_and_body(raw: &str) -> ParsedRecipe {
    let mut lines = raw
        .trim()
        .split('\n')
        .map(str::trim)
        .filter(|l| !l.is_empty());

    let title = lines.next().unwrap_or(FALLBACK_TITLE).to_string();
    let recipe_text = lines.collect::<Vec<_>>().join("\n");
    ParsedRecipe { title, recipe_text }
}

pub fn encode_ingredients(ingredients: &[String]) -> anyhow::Result<String> {
    serde_json::to_string(ingredients).context("encode ingredients")
}

/// Reads the stored `ingredients` column. Accepts a JSON array, a JSON
/// string wrapping a JSON array, and otherwise keeps the raw text as the
/// only entry.
pub fn decode_ingredients(raw: &str) -> Vec<String> {
    if let Ok(list) = serde_json::from_str::<Vec<String>>(raw) {
        return list;
    }
    if let Ok(inner) = serde_json::from_str::<String>(raw) {
        if let Ok(list) = serde_json::from_str::<Vec<String>>(&inner) {
            return list;
        }
    }
    let raw = raw.trim();
    if raw.is_empty() {
        return Vec::new();
    }
    warn!(raw = %raw, "stored ingredients are not a JSON array");
    vec![raw.to_string()]
}

/// Prompt the provider, split its answer and write exactly one row.
///
/// `user_id` is only parsed when the row is written, so an id that is not a
/// UUID fails like any other rejected insert.
pub async fn generate_and_save(
    state: &AppState,
    user_id: &str,
    ingredients: Vec<String>,
) -> Result<Recipe, ApiError> {
    let prompt = build_prompt(&ingredients);

    let raw = state.completions.complete(&prompt).await.map_err(|e| {
        error!(error = %e, %user_id, model = state.completions.model(), "completion failed");
        ApiError::Internal(e.into())
    })?;
    debug!(%user_id, response_len = raw.len(), "completion received");

    let parsed = split_title_and_body(&raw);
    let encoded = encode_ingredients(&ingredients)?;

    let user_id = Uuid::parse_str(user_id).map_err(|e| {
        error!(error = %e, %user_id, "user_id is not a uuid");
        ApiError::SaveFailed(anyhow::Error::new(e).context("parse user_id"))
    })?;

    let recipe = state
        .recipes
        .insert(NewRecipe {
            user_id,
            title: parsed.title,
            ingredients: encoded,
            recipe_text: parsed.recipe_text,
        })
        .await
        .map_err(|e| {
            error!(error = %e, %user_id, "insert recipe failed");
            ApiError::SaveFailed(e)
        })?;

    info!(recipe_id = %recipe.id, %user_id, "recipe generated and saved");
    Ok(recipe)
}
