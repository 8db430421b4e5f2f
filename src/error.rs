use thiserror::Error;

/// Errors produced by the downloader, the Spotify client and the media layer.
#[derive(Debug, Error)]
pub enum Error {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("tagging failed: {0}")]
    Tag(#[from] lofty::error::LoftyError),

    #[error("not authenticated, visit /login first")]
    NotAuthenticated,

    #[error("token exchange failed: {0}")]
    TokenExchange(String),

    #[error("cannot continue pagination from {0}")]
    Pagination(String),

    #[error("track {0} is not available on Spotify")]
    TrackUnavailable(String),

    #[error("no video found for {0}")]
    NoVideoMatch(String),

    #[error("yt-dlp failed: {0}")]
    Extraction(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, Error>;
