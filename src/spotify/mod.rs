//! # Spotify Integration Module
//!
//! This module wraps the parts of the Spotify Web API tunegrab needs: the OAuth
//! authorization code flow, the user's playlists, playlist track pages and
//! single track lookups.
//!
//! ## Architecture
//!
//! ```text
//! Route layer / CLI
//!          ↓
//! Spotify Integration Layer
//!     ├── Authentication (authorization code + refresh)
//!     ├── Playlists (listing, paginated track enumeration)
//!     └── Tracks (single lookup for cover art)
//!          ↓
//! HTTP Layer (reqwest, JSON)
//!          ↓
//! Spotify Web API
//! ```
//!
//! ## Credentials
//!
//! No function in this module reads or stores token state on its own. Every
//! Web API call receives the [`Token`](crate::types::Token) to use as an
//! argument; obtaining and refreshing it is the job of
//! [`TokenManager`](crate::management::TokenManager).
//!
//! ## Error Handling
//!
//! Non-success statuses are turned into [`Error::Http`](crate::error::Error)
//! through `error_for_status`. Listing calls (user playlists and playlist
//! track pages) go through the [`retry`](crate::retry) wrapper; the single
//! track lookup is not retried.
//!
//! ## Usage Patterns
//!
//! ```rust
//! let spotify = SpotifyApi::new(&settings);
//! let token = tokens.valid_token(&auth).await?;
//!
//! let playlists = spotify.user_playlists(&token).await?;
//! let tracks = spotify.playlist_tracks(&token, &playlists[0].id, Some(100)).await?;
//! ```

pub mod auth;
pub mod playlists;
pub mod tracks;

use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::{
    config::Settings,
    error::Result,
    retry::RetryPolicy,
    types::Token,
};

pub use auth::SpotifyAuth;

/// Client for the Spotify Web API.
#[derive(Debug, Clone)]
pub struct SpotifyApi {
    client: Client,
    api_url: String,
    retry: RetryPolicy,
}

impl SpotifyApi {
    pub fn new(settings: &Settings) -> Self {
        Self::with_base_url(&settings.api_url, settings.retry)
    }

    pub fn with_base_url(api_url: &str, retry: RetryPolicy) -> Self {
        Self {
            client: Client::new(),
            api_url: api_url.trim_end_matches('/').to_string(),
            retry,
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        token: &Token,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let response = self
            .client
            .get(format!("{}{}", self.api_url, path))
            .bearer_auth(&token.access_token)
            .query(query)
            .send()
            .await?
            .error_for_status()?;

        Ok(response.json::<T>().await?)
    }
}
