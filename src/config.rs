//! Configuration management for tunegrab.
//!
//! This module handles loading and accessing configuration values from environment
//! variables and `.env` files. It provides a centralized way to manage application
//! configuration including Spotify API credentials, server settings and download
//! tuning.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the working directory
//! 3. `.env` file in the local data directory
//! 4. Application defaults (where applicable)

use std::{env, path::PathBuf, str::FromStr};

use crate::{
    error::{Error, Result},
    retry::RetryPolicy,
};

/// Loads environment variables from `.env` files.
///
/// Reads `.env` from the working directory first and then from the
/// platform-specific local data directory under `tunegrab/.env`. Values that
/// are already set are never overridden, so the working directory wins over the
/// data directory and the real environment wins over both. Missing files are
/// skipped silently.
///
/// # Directory Structure
///
/// - Linux: `~/.local/share/tunegrab/.env`
/// - macOS: `~/Library/Application Support/tunegrab/.env`
/// - Windows: `%LOCALAPPDATA%/tunegrab/.env`
///
/// # Errors
///
/// Returns an error if the data directory cannot be created or an existing
/// `.env` file cannot be parsed.
///
/// # Example
///
/// ```
/// use tunegrab::config;
///
/// #[tokio::main]
/// async fn main() {
///     if let Err(e) = config::load_env().await {
///         eprintln!("Configuration error: {}", e);
///     }
/// }
/// ```
pub async fn load_env() -> Result<()> {
    if let Err(e) = dotenv::dotenv() {
        if !e.not_found() {
            return Err(Error::Config(e.to_string()));
        }
    }

    let path = data_dir().join(".env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent).await?;
    }

    if path.is_file() {
        dotenv::from_path(&path).map_err(|e| Error::Config(e.to_string()))?;
    }
    Ok(())
}

/// Returns the application's local data directory (`<data_local_dir>/tunegrab`).
pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("tunegrab");
    path
}

/// Returns the path where the Spotify token is cached between runs.
pub fn token_cache_path() -> PathBuf {
    data_dir().join("cache/token.json")
}

/// Returns the Spotify API client ID for authentication.
///
/// Retrieves the `SPOTIFY_CLIENT_ID` environment variable which contains the
/// client ID obtained when registering the application with Spotify's
/// developer platform.
///
/// # Errors
///
/// Returns [`Error::Config`] if the variable is not set.
pub fn spotify_client_id() -> Result<String> {
    required("SPOTIFY_CLIENT_ID")
}

/// Returns the Spotify API client secret for authentication.
///
/// Retrieves the `SPOTIFY_CLIENT_SECRET` environment variable. It is sent as
/// HTTP basic credentials when exchanging authorization codes and refreshing
/// tokens.
///
/// # Security Note
///
/// The client secret should be kept confidential and never exposed in logs
/// or version control.
///
/// # Errors
///
/// Returns [`Error::Config`] if the variable is not set.
pub fn spotify_client_secret() -> Result<String> {
    required("SPOTIFY_CLIENT_SECRET")
}

/// Returns the Spotify OAuth redirect URI.
///
/// Must match the redirect URI registered in the Spotify application settings.
/// Defaults to `http://localhost:3000/callback`.
pub fn spotify_redirect_uri() -> String {
    env_or("SPOTIFY_REDIRECT_URI", "http://localhost:3000/callback")
}

/// Returns the space separated Spotify scopes requested during login.
pub fn spotify_scope() -> String {
    env_or(
        "SPOTIFY_SCOPE",
        "user-read-private user-read-email playlist-read-private",
    )
}

/// Returns the Spotify OAuth authorization URL.
pub fn spotify_apiauth_url() -> String {
    env_or("SPOTIFY_AUTH_URL", "https://accounts.spotify.com/authorize")
}

/// Returns the Spotify OAuth token exchange URL.
pub fn spotify_apitoken_url() -> String {
    env_or("SPOTIFY_TOKEN_URL", "https://accounts.spotify.com/api/token")
}

/// Returns the Spotify Web API base URL.
pub fn spotify_apiurl() -> String {
    env_or("SPOTIFY_API_URL", "https://api.spotify.com/v1")
}

/// Returns the address the HTTP server binds to, built from `HOST` and `PORT`.
///
/// # Example
///
/// ```
/// let addr = server_addr()?; // e.g., "0.0.0.0:3000"
/// ```
pub fn server_addr() -> Result<String> {
    let host = env_or("HOST", "0.0.0.0");
    let port: u16 = parsed("PORT")?.unwrap_or(3000);
    Ok(format!("{}:{}", host, port))
}

/// Full runtime configuration assembled from the environment.
#[derive(Debug, Clone)]
pub struct Settings {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub scope: String,
    pub auth_url: String,
    pub token_url: String,
    pub api_url: String,
    pub server_addr: String,
    pub downloads_dir: PathBuf,
    pub public_dir: PathBuf,
    pub token_cache: Option<PathBuf>,
    pub ytdlp_path: String,
    /// Page size used when listing a playlist's tracks for display.
    pub list_page_size: Option<u32>,
    /// Page size used when enumerating a playlist for download, `None` keeps
    /// the Web API default.
    pub download_page_size: Option<u32>,
    pub batch_concurrency: usize,
    pub retry: RetryPolicy,
}

impl Settings {
    /// Reads every setting from the environment, applying defaults.
    ///
    /// # Errors
    ///
    /// Fails when the Spotify credentials are missing or a numeric variable
    /// cannot be parsed.
    pub fn from_env() -> Result<Self> {
        let retries: u32 = parsed("RETRY_COUNT")?.unwrap_or(3);
        let batch_concurrency: usize = parsed("BATCH_CONCURRENCY")?.unwrap_or(5);
        if batch_concurrency == 0 {
            return Err(Error::Config("BATCH_CONCURRENCY must be at least 1".into()));
        }

        Ok(Self {
            client_id: spotify_client_id()?,
            client_secret: spotify_client_secret()?,
            redirect_uri: spotify_redirect_uri(),
            scope: spotify_scope(),
            auth_url: spotify_apiauth_url(),
            token_url: spotify_apitoken_url(),
            api_url: spotify_apiurl(),
            server_addr: server_addr()?,
            downloads_dir: PathBuf::from(env_or("DOWNLOADS_DIR", "downloads")),
            public_dir: PathBuf::from(env_or("PUBLIC_DIR", "public")),
            token_cache: Some(token_cache_path()),
            ytdlp_path: env_or("YTDLP_PATH", "yt-dlp"),
            list_page_size: Some(parsed("LIST_PAGE_SIZE")?.unwrap_or(100)),
            download_page_size: parsed("DOWNLOAD_PAGE_SIZE")?,
            batch_concurrency,
            retry: RetryPolicy::default().with_retries(retries),
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn required(key: &str) -> Result<String> {
    env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| Error::Config(format!("{} must be set", key)))
}

fn parsed<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(v) if !v.trim().is_empty() => v
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| Error::Config(format!("{}: {}", key, e))),
        _ => Ok(None),
    }
}
