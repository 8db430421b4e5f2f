use chrono::Utc;
use reqwest::Client;
use url::Url;

use crate::{
    config::Settings,
    error::{Error, Result},
    types::{Token, TokenResponse},
};

/// OAuth 2.0 authorization code flow against Spotify's accounts service.
///
/// Holds the client credentials and endpoints. It never stores tokens itself:
/// callers keep the returned [`Token`] in a
/// [`TokenManager`](crate::management::TokenManager) and pass it explicitly to
/// every Web API call.
#[derive(Debug, Clone)]
pub struct SpotifyAuth {
    client: Client,
    client_id: String,
    client_secret: String,
    redirect_uri: String,
    scope: String,
    auth_url: String,
    token_url: String,
}

impl SpotifyAuth {
    pub fn new(settings: &Settings) -> Self {
        Self {
            client: Client::new(),
            client_id: settings.client_id.clone(),
            client_secret: settings.client_secret.clone(),
            redirect_uri: settings.redirect_uri.clone(),
            scope: settings.scope.clone(),
            auth_url: settings.auth_url.clone(),
            token_url: settings.token_url.clone(),
        }
    }

    /// Builds the URL the user is redirected to for granting access.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::Config`] when the configured authorization URL is
    /// not a valid absolute URL.
    ///
    /// # Example
    ///
    /// ```
    /// let url = auth.authorize_url()?;
    /// // https://accounts.spotify.com/authorize?client_id=...&response_type=code&...
    /// ```
    pub fn authorize_url(&self) -> Result<String> {
        let url = Url::parse_with_params(
            &self.auth_url,
            &[
                ("client_id", self.client_id.as_str()),
                ("response_type", "code"),
                ("redirect_uri", self.redirect_uri.as_str()),
                ("scope", self.scope.as_str()),
            ],
        )
        .map_err(|e| Error::Config(format!("invalid auth url {}: {}", self.auth_url, e)))?;

        Ok(url.into())
    }

    /// Exchanges an authorization code for an access token.
    ///
    /// Completes the OAuth flow by posting the code received on the callback
    /// route together with the redirect URI. The client is authenticated with
    /// HTTP basic credentials.
    ///
    /// # Arguments
    ///
    /// * `code` - Authorization code received from the OAuth callback
    ///
    /// # Errors
    ///
    /// Returns [`Error::TokenExchange`] when Spotify rejects the code and
    /// [`Error::Http`] on network failures.
    pub async fn exchange_code(&self, code: &str) -> Result<Token> {
        let response = self
            .token_request(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", &self.redirect_uri),
            ])
            .await?;

        let refresh_token = response
            .refresh_token
            .ok_or_else(|| Error::TokenExchange("response without refresh token".into()))?;

        Ok(Token {
            access_token: response.access_token,
            refresh_token,
            scope: response.scope,
            expires_in: response.expires_in,
            obtained_at: Utc::now().timestamp() as u64,
        })
    }

    /// Refreshes an expired access token using its refresh token.
    ///
    /// Spotify may or may not rotate the refresh token. When the response
    /// carries none the previous one is kept.
    ///
    /// # Arguments
    ///
    /// * `token` - Token holding a valid refresh token
    pub async fn refresh(&self, token: &Token) -> Result<Token> {
        let response = self
            .token_request(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", &token.refresh_token),
            ])
            .await?;

        Ok(Token {
            access_token: response.access_token,
            refresh_token: response
                .refresh_token
                .unwrap_or_else(|| token.refresh_token.clone()),
            scope: if response.scope.is_empty() {
                token.scope.clone()
            } else {
                response.scope
            },
            expires_in: response.expires_in,
            obtained_at: Utc::now().timestamp() as u64,
        })
    }

    async fn token_request(&self, form: &[(&str, &str)]) -> Result<TokenResponse> {
        let response = self
            .client
            .post(&self.token_url)
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::TokenExchange(format!("{}: {}", status, body)));
        }

        Ok(response.json::<TokenResponse>().await?)
    }
}
