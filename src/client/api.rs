use axum::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use uuid::Uuid;

use super::ClientError;
use crate::auth::dto::{
    AuthResponse, MagicLinkRequest, MagicLinkResponse, RefreshRequest, VerifyRequest,
};
use crate::error::ErrorBody;
use crate::ingredients::dto::{DeletedResponse, IngredientView, NewIngredientRequest};
use crate::recipes::dto::{GenerateRequest, GenerateResponse, RecipeView};

/// Everything the view layer needs from the server.
#[async_trait]
pub trait CookbookApi: Send + Sync {
    async fn request_magic_link(&self, email: &str) -> Result<MagicLinkResponse, ClientError>;
    async fn verify_magic_link(&self, token: &str) -> Result<AuthResponse, ClientError>;
    async fn refresh_session(&self, refresh_token: &str) -> Result<AuthResponse, ClientError>;
    async fn list_ingredients(&self, access_token: &str) -> Result<Vec<IngredientView>, ClientError>;
    async fn add_ingredient(&self, access_token: &str, name: &str) -> Result<IngredientView, ClientError>;
    async fn delete_ingredient(&self, access_token: &str, id: Uuid) -> Result<(), ClientError>;
    async fn list_recipes(&self, access_token: &str) -> Result<Vec<RecipeView>, ClientError>;
    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse, ClientError>;
}

pub struct HttpCookbookApi {
    base_url: String,
    client: Client,
}

impl HttpCookbookApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, client }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, ClientError> {
        decode(request.send().await?).await
    }
}

/// Success bodies decode as `T`; anything else surfaces the server's
/// `error` string, or "Unknown" when there is none.
async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    if response.status().is_success() {
        return Ok(response.json::<T>().await?);
    }
    let message = response
        .json::<ErrorBody>()
        .await
        .map(|b| b.error)
        .unwrap_or_else(|_| "Unknown".to_string());
    Err(ClientError::Server(message))
}

#[async_trait]
impl CookbookApi for HttpCookbookApi {
    async fn request_magic_link(&self, email: &str) -> Result<MagicLinkResponse, ClientError> {
        let body = MagicLinkRequest {
            email: email.to_string(),
        };
        Self::send(self.client.post(self.url("/auth/magic-link")).json(&body)).await
    }

    async fn verify_magic_link(&self, token: &str) -> Result<AuthResponse, ClientError> {
        let body = VerifyRequest {
            token: token.to_string(),
        };
        Self::send(self.client.post(self.url("/auth/verify")).json(&body)).await
    }

    async fn refresh_session(&self, refresh_token: &str) -> Result<AuthResponse, ClientError> {
        let body = RefreshRequest {
            refresh_token: refresh_token.to_string(),
        };
        Self::send(self.client.post(self.url("/auth/refresh")).json(&body)).await
    }

    async fn list_ingredients(&self, access_token: &str) -> Result<Vec<IngredientView>, ClientError> {
        Self::send(self.client.get(self.url("/ingredients")).bearer_auth(access_token)).await
    }

    async fn add_ingredient(&self, access_token: &str, name: &str) -> Result<IngredientView, ClientError> {
        let body = NewIngredientRequest {
            name: name.to_string(),
        };
        Self::send(
            self.client
                .post(self.url("/ingredients"))
                .bearer_auth(access_token)
                .json(&body),
        )
        .await
    }

    async fn delete_ingredient(&self, access_token: &str, id: Uuid) -> Result<(), ClientError> {
        let url = self.url(&format!("/ingredients/{}", id));
        let _: DeletedResponse = Self::send(self.client.delete(url).bearer_auth(access_token)).await?;
        Ok(())
    }

    async fn list_recipes(&self, access_token: &str) -> Result<Vec<RecipeView>, ClientError> {
        Self::send(self.client.get(self.url("/recipes")).bearer_auth(access_token)).await
    }

    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse, ClientError> {
        Self::send(self.client.post(self.url("/generate")).json(request)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_dropped() {
        let api = HttpCookbookApi::new("http://localhost:5000/");
        assert_eq!(api.url("/generate"), "http://localhost:5000/generate");
    }
}
