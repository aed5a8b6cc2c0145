//! Client side of the cookbook: an HTTP transport and the view state a
//! front-end renders from.

pub mod api;
pub mod session;

pub use api::{CookbookApi, HttpCookbookApi};
pub use session::{CookbookSession, ViewState};

use thiserror::Error;

/// `Display` strings are the messages shown to the user.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Please login first.")]
    NotSignedIn,

    #[error("Add at least one ingredient.")]
    NoIngredients,

    #[error("A recipe is already being generated.")]
    Busy,

    #[error("Failed: {0}")]
    Server(String),

    #[error("Network/server error")]
    Transport(#[from] reqwest::Error),
}
