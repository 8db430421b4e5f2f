use std::{net::SocketAddr, str::FromStr, sync::Arc};

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, services::ServeDir};

use crate::{
    api,
    config::Settings,
    download::Downloader,
    error::{Error, Result},
    management::TokenManager,
    media::{VideoSource, YtDlp},
    spotify::{SpotifyApi, SpotifyAuth},
    success,
};

/// Shared state handed to every route handler.
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub auth: Arc<SpotifyAuth>,
    pub spotify: Arc<SpotifyApi>,
    pub tokens: Arc<TokenManager>,
    pub downloader: Arc<Downloader>,
}

impl AppState {
    pub fn new(settings: Settings, tokens: TokenManager, source: Arc<dyn VideoSource>) -> Self {
        let downloader = Downloader::new(source, settings.downloads_dir.clone());
        Self {
            auth: Arc::new(SpotifyAuth::new(&settings)),
            spotify: Arc::new(SpotifyApi::new(&settings)),
            tokens: Arc::new(tokens),
            downloader: Arc::new(downloader),
            settings: Arc::new(settings),
        }
    }

    /// Builds the production state: yt-dlp as video source and the token
    /// cached on disk, if any.
    pub async fn from_settings(settings: Settings) -> Self {
        let tokens = match &settings.token_cache {
            Some(path) => TokenManager::load(path.clone()).await,
            None => TokenManager::in_memory(None),
        };
        let source = Arc::new(YtDlp::new(settings.ytdlp_path.clone()));
        Self::new(settings, tokens, source)
    }
}

pub fn router(state: AppState) -> Router {
    let downloads = ServeDir::new(&state.settings.downloads_dir);
    let public = ServeDir::new(&state.settings.public_dir);

    Router::new()
        .route("/health", get(api::health))
        .route("/login", get(api::login))
        .route("/callback", get(api::callback))
        .route("/list-playlists", get(api::list_playlists))
        .route("/list-tracks/{playlist_id}", get(api::list_tracks))
        .route("/download-track", post(api::download_track))
        .route("/download-playlist", post(api::download_playlist))
        .route("/list-downloads", get(api::list_downloads))
        .nest_service("/downloads", downloads)
        .fallback_service(public)
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Creates the downloads directory and serves the API until the process stops.
pub async fn start_api_server(settings: Settings) -> Result<()> {
    let addr = SocketAddr::from_str(&settings.server_addr)
        .map_err(|e| Error::Config(format!("invalid server address: {}", e)))?;

    let state = AppState::from_settings(settings).await;
    state.downloader.ensure_downloads_dir().await?;

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    success!("Server running on http://{}", listener.local_addr()?);

    axum::serve(listener, router(state)).await?;
    Ok(())
}
