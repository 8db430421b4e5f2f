use axum::{
    extract::{Query, State},
    response::Redirect,
};
use serde::Deserialize;

use crate::{server::AppState, success, warning};

use super::ApiError;

#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    code: Option<String>,
    error: Option<String>,
}

/// Redirects the browser to Spotify's authorization page.
pub async fn login(State(state): State<AppState>) -> Result<Redirect, ApiError> {
    let url = state
        .auth
        .authorize_url()
        .map_err(|e| ApiError::from_error("Error building authorization url", e))?;
    Ok(Redirect::to(&url))
}

/// Exchanges the authorization code, stores the token and returns to `/`.
pub async fn callback(
    Query(params): Query<CallbackParams>,
    State(state): State<AppState>,
) -> Result<Redirect, ApiError> {
    if let Some(error) = params.error {
        warning!("Spotify authorization denied: {}", error);
        return Err(ApiError::BadRequest(format!("Authorization failed: {}", error)));
    }

    let Some(code) = params.code.filter(|c| !c.is_empty()) else {
        return Err(ApiError::BadRequest("Missing authorization code".into()));
    };

    let token = state
        .auth
        .exchange_code(&code)
        .await
        .map_err(|e| ApiError::from_error("Error retrieving access token", e))?;

    if let Err(e) = state.tokens.set(token).await {
        warning!("Failed to save token to cache: {}", e);
    }

    success!("Authentication successful!");
    Ok(Redirect::to("/"))
}
