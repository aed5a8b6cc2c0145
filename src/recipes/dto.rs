use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use super::repo_types::Recipe;
use super::services::decode_ingredients;

pub const REQUIRED_FIELDS: &str = "user_id and ingredients[] required";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerateRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ingredients: Option<Vec<String>>,
}

impl GenerateRequest {
    /// `None` when `user_id` is missing or empty, or `ingredients` is missing or empty.
    ///
    /// `user_id` is not parsed here: a whitespace-only or non-UUID id still
    /// reaches the model and then fails the insert. Entries of `ingredients`
    /// must be strings; anything else is rejected when the body is decoded.
    pub fn validate(self) -> Option<(String, Vec<String>)> {
        let user_id = self.user_id.filter(|s| !s.is_empty())?;
        let ingredients = self.ingredients.filter(|i| !i.is_empty())?;
        Some((user_id, ingredients))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub title: String,
    pub recipe_text: String,
    pub saved: bool,
    pub id: Uuid,
}

impl From<&Recipe> for GenerateResponse {
    fn from(r: &Recipe) -> Self {
        Self {
            title: r.title.clone(),
            recipe_text: r.recipe_text.clone(),
            saved: true,
            id: r.id,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecipeView {
    pub id: Uuid,
    pub title: String,
    pub recipe_text: String,
    pub ingredients: Vec<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<Recipe> for RecipeView {
    fn from(r: Recipe) -> Self {
        Self {
            ingredients: decode_ingredients(&r.ingredients),
            id: r.id,
            title: r.title,
            recipe_text: r.recipe_text,
            created_at: r.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn req(user_id: Option<&str>, ingredients: Option<Vec<&str>>) -> GenerateRequest {
        GenerateRequest {
            user_id: user_id.map(Into::into),
            ingredients: ingredients.map(|v| v.into_iter().map(Into::into).collect()),
        }
    }

    #[test]
    fn validate_accepts_any_non_empty_id_and_list() {
        let id = Uuid::new_v4().to_string();
        let (user_id, ingredients) = req(Some(id.as_str()), Some(vec!["egg", "rice"]))
            .validate()
            .expect("valid");
        assert_eq!(user_id, id);
        assert_eq!(ingredients, vec!["egg", "rice"]);

        assert!(req(Some("not-a-uuid"), Some(vec!["egg"])).validate().is_some());
        assert!(req(Some("  "), Some(vec!["egg"])).validate().is_some());
    }

    #[test]
    fn validate_rejects_missing_or_empty_fields() {
        let id = Uuid::new_v4().to_string();
        let id = id.as_str();
        assert!(req(None, Some(vec!["egg"])).validate().is_none());
        assert!(req(Some(""), Some(vec!["egg"])).validate().is_none());
        assert!(req(Some(id), None).validate().is_none());
        assert!(req(Some(id), Some(vec![])).validate().is_none());
    }

    #[test]
    fn non_string_ingredients_do_not_deserialize() {
        let res = serde_json::from_str::<GenerateRequest>(r#"{"user_id": "x", "ingredients": [1, 2]}"#);
        assert!(res.is_err());
    }

    #[test]
    fn non_array_ingredients_do_not_deserialize() {
        let res = serde_json::from_str::<GenerateRequest>(
            r#"{"user_id": "x", "ingredients": "tomato, basil"}"#,
        );
        assert!(res.is_err());
    }
}
