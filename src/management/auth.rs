use std::path::PathBuf;

use chrono::Utc;
use tokio::sync::Mutex;

use crate::{
    error::{Error, Result},
    spotify::SpotifyAuth,
    types::Token,
    warning,
};

/// Seconds before expiry at which a token is already treated as expired.
const EXPIRY_MARGIN: u64 = 240;

/// Holds the current Spotify token and hands out valid copies of it.
///
/// Refreshing happens here, outside the Web API client: callers ask for
/// [`valid_token`](Self::valid_token) and pass the result explicitly.
pub struct TokenManager {
    token: Mutex<Option<Token>>,
    path: Option<PathBuf>,
}

impl TokenManager {
    /// A manager that keeps the token in memory only.
    pub fn in_memory(token: Option<Token>) -> Self {
        TokenManager {
            token: Mutex::new(token),
            path: None,
        }
    }

    /// Creates a manager persisting to `path`, starting from the token cached
    /// there if any.
    pub async fn load(path: PathBuf) -> Self {
        let token = match async_fs::read_to_string(&path).await {
            Ok(content) => match serde_json::from_str::<Token>(&content) {
                Ok(token) => Some(token),
                Err(e) => {
                    warning!("Ignoring unreadable token cache {}: {}", path.display(), e);
                    None
                }
            },
            Err(_) => None,
        };

        TokenManager {
            token: Mutex::new(token),
            path: Some(path),
        }
    }

    pub async fn set(&self, token: Token) -> Result<()> {
        let mut lock = self.token.lock().await;
        *lock = Some(token.clone());
        drop(lock);

        self.persist(&token).await
    }

    pub async fn is_authenticated(&self) -> bool {
        self.token.lock().await.is_some()
    }

    /// Returns a token that is not about to expire.
    ///
    /// An expiring token is refreshed through `auth` and the new token is
    /// stored and persisted. If the refresh fails the current token is returned
    /// and Spotify gets to decide whether it is still accepted.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotAuthenticated`] when no login happened yet.
    pub async fn valid_token(&self, auth: &SpotifyAuth) -> Result<Token> {
        let mut lock = self.token.lock().await;
        let Some(token) = lock.clone() else {
            return Err(Error::NotAuthenticated);
        };

        if !Self::is_expired(&token) {
            return Ok(token);
        }

        match auth.refresh(&token).await {
            Ok(new_token) => {
                *lock = Some(new_token.clone());
                drop(lock);
                if let Err(e) = self.persist(&new_token).await {
                    warning!("Failed to save refreshed token: {}", e);
                }
                Ok(new_token)
            }
            Err(e) => {
                warning!("Token refresh failed: {}", e);
                Ok(token)
            }
        }
    }

    pub fn is_expired(token: &Token) -> bool {
        let now = Utc::now().timestamp() as u64;
        now + EXPIRY_MARGIN >= token.obtained_at + token.expires_in
    }

    async fn persist(&self, token: &Token) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            async_fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string_pretty(token)?;
        async_fs::write(path, json).await?;
        Ok(())
    }
}
