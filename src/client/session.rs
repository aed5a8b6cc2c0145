use std::sync::{
    atomic::{AtomicBool, Ordering},
    Mutex, MutexGuard, PoisonError,
};

use tracing::warn;
use uuid::Uuid;

use super::{api::CookbookApi, ClientError};
use crate::auth::dto::{AuthResponse, PublicUser};
use crate::recipes::dto::{GenerateRequest, GenerateResponse, RecipeView};

#[derive(Debug, Clone)]
struct Tokens {
    access: String,
    refresh: String,
}

/// What a front-end renders. Every field is refetched from the server after
/// a mutation; nothing is updated optimistically.
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    pub user: Option<PublicUser>,
    pub draft: String,
    pub ingredients: Vec<String>,
    ingredient_ids: Vec<Uuid>,
    pub recipes: Vec<RecipeView>,
    pub selected: Option<RecipeView>,
    pub last_generated: Option<GenerateResponse>,
}

pub struct CookbookSession<A> {
    api: A,
    view: Mutex<ViewState>,
    tokens: Mutex<Option<Tokens>>,
    generating: AtomicBool,
    clear_pantry_after_save: bool,
}

/// Clears the in-flight flag however `generate` exits.
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl<A: CookbookApi> CookbookSession<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            view: Mutex::new(ViewState::default()),
            tokens: Mutex::new(None),
            generating: AtomicBool::new(false),
            clear_pantry_after_save: true,
        }
    }

    /// Keep the pantry after a recipe is saved instead of removing the
    /// ingredients it was made from.
    pub fn keep_pantry_after_save(mut self) -> Self {
        self.clear_pantry_after_save = false;
        self
    }

    fn view_mut(&self) -> MutexGuard<'_, ViewState> {
        self.view.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn signed_in(&self) -> Result<(Uuid, String), ClientError> {
        let user_id = self.view_mut().user.as_ref().map(|u| u.id);
        let access = self
            .tokens
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|t| t.access.clone());
        match (user_id, access) {
            (Some(id), Some(access)) => Ok((id, access)),
            _ => Err(ClientError::NotSignedIn),
        }
    }

    pub fn view(&self) -> ViewState {
        self.view_mut().clone()
    }

    pub fn is_generating(&self) -> bool {
        self.generating.load(Ordering::SeqCst)
    }

    /// Mirrors the enabled state of the generate control.
    pub fn can_generate(&self) -> bool {
        let view = self.view_mut();
        view.user.is_some() && !view.ingredients.is_empty() && !self.is_generating()
    }

    /// `Ok(None)` when the email is blank and nothing was sent.
    pub async fn request_magic_link(&self, email: &str) -> Result<Option<String>, ClientError> {
        let email = email.trim();
        if email.is_empty() {
            return Ok(None);
        }
        let res = self.api.request_magic_link(email).await?;
        Ok(Some(res.message))
    }

    fn store_session(&self, auth: AuthResponse) -> PublicUser {
        *self.tokens.lock().unwrap_or_else(PoisonError::into_inner) = Some(Tokens {
            access: auth.access_token,
            refresh: auth.refresh_token,
        });
        self.view_mut().user = Some(auth.user.clone());
        auth.user
    }

    pub async fn complete_sign_in(&self, token: &str) -> Result<PublicUser, ClientError> {
        let auth = self.api.verify_magic_link(token).await?;
        let user = self.store_session(auth);

        self.load_ingredients().await?;
        self.load_recipes().await?;
        Ok(user)
    }

    /// Swaps the stored refresh token for a new token pair.
    pub async fn refresh_session(&self) -> Result<PublicUser, ClientError> {
        let refresh = self
            .tokens
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|t| t.refresh.clone())
            .ok_or(ClientError::NotSignedIn)?;
        let auth = self.api.refresh_session(&refresh).await?;
        Ok(self.store_session(auth))
    }

    pub fn sign_out(&self) {
        *self.tokens.lock().unwrap_or_else(PoisonError::into_inner) = None;
        *self.view_mut() = ViewState::default();
    }

    pub fn set_draft(&self, text: &str) {
        self.view_mut().draft = text.to_string();
    }

    pub async fn load_ingredients(&self) -> Result<(), ClientError> {
        let (_, access) = self.signed_in()?;
        let rows = self.api.list_ingredients(&access).await?;
        let mut view = self.view_mut();
        view.ingredient_ids = rows.iter().map(|i| i.id).collect();
        view.ingredients = rows.into_iter().map(|i| i.name).collect();
        Ok(())
    }

    pub async fn load_recipes(&self) -> Result<(), ClientError> {
        let (_, access) = self.signed_in()?;
        let recipes = self.api.list_recipes(&access).await?;
        self.view_mut().recipes = recipes;
        Ok(())
    }

    /// Adds the trimmed draft; a blank draft is ignored.
    pub async fn add_ingredient(&self) -> Result<(), ClientError> {
        let name = self.view_mut().draft.trim().to_string();
        if name.is_empty() {
            return Ok(());
        }
        let (_, access) = self.signed_in()?;
        self.api.add_ingredient(&access, &name).await?;
        self.view_mut().draft.clear();
        self.load_ingredients().await
    }

    pub async fn generate(&self) -> Result<GenerateResponse, ClientError> {
        let (user_id, access) = self.signed_in()?;
        let (ingredients, used_ids) = {
            let view = self.view_mut();
            (view.ingredients.clone(), view.ingredient_ids.clone())
        };
        if ingredients.is_empty() {
            return Err(ClientError::NoIngredients);
        }
        if self
            .generating
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(ClientError::Busy);
        }
        let _in_flight = InFlight(&self.generating);

        let request = GenerateRequest {
            user_id: Some(user_id.to_string()),
            ingredients: Some(ingredients),
        };
        let generated = self.api.generate(&request).await?;
        self.view_mut().last_generated = Some(generated.clone());

        // The recipe is saved; refresh failures only leave stale lists behind.
        // Ingredients added elsewhere meanwhile were not sent and stay.
        if self.clear_pantry_after_save {
            for id in used_ids {
                if let Err(e) = self.api.delete_ingredient(&access, id).await {
                    warn!(error = %e, ingredient_id = %id, "removing used ingredient failed");
                }
            }
        }
        if let Err(e) = self.load_ingredients().await {
            warn!(error = %e, "reloading ingredients failed");
        }
        if let Err(e) = self.load_recipes().await {
            warn!(error = %e, "reloading recipes failed");
        }
        Ok(generated)
    }

    /// Opens the modal for a loaded recipe; unknown ids leave it closed.
    pub fn select_recipe(&self, id: Uuid) -> Option<RecipeView> {
        let mut view = self.view_mut();
        view.selected = view.recipes.iter().find(|r| r.id == id).cloned();
        view.selected.clone()
    }

    pub fn close_recipe(&self) {
        self.view_mut().selected = None;
    }
}
