use axum::{
    extract::{State, rejection::JsonRejection},
    response::Json,
};

use crate::{
    download,
    error::Error,
    info,
    server::AppState,
    types::{DownloadPlaylistRequest, DownloadTrackRequest, DownloadTrackResponse, Track},
    utils, warning,
};

use super::ApiError;

fn required(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Unreadable bodies are treated as empty so field validation answers them.
fn body_or_default<T: Default>(body: Result<Json<T>, JsonRejection>) -> T {
    match body {
        Ok(Json(body)) => body,
        Err(rejection) => {
            warning!("Ignoring unreadable request body: {}", rejection.body_text());
            T::default()
        }
    }
}

/// Downloads one track: search, extract, fetch the cover from Spotify, tag.
///
/// The video is resolved before Spotify is contacted, so an unmatched track
/// answers 404 without needing a login. The work runs on its own task and
/// completes even if the client goes away.
pub async fn download_track(
    State(state): State<AppState>,
    body: Result<Json<DownloadTrackRequest>, JsonRejection>,
) -> Result<Json<DownloadTrackResponse>, ApiError> {
    let body = body_or_default(body);
    let (Some(track_id), Some(track_name), Some(artist_name)) = (
        required(body.track_id),
        required(body.track_name),
        required(body.artist_name),
    ) else {
        return Err(ApiError::BadRequest(
            "trackId, trackName, and artistName are required".into(),
        ));
    };

    tokio::spawn(fetch_track(state, track_id, track_name, artist_name))
        .await
        .map_err(|e| ApiError::from_error("Error downloading track", Error::Task(e)))?
}

async fn fetch_track(
    state: AppState,
    track_id: String,
    track_name: String,
    artist_name: String,
) -> Result<Json<DownloadTrackResponse>, ApiError> {
    const FAILURE: &str = "Error downloading track";

    let video = state
        .downloader
        .resolve(&track_name, &artist_name)
        .await
        .map_err(|e| ApiError::from_error(FAILURE, e))?
        .ok_or_else(|| {
            ApiError::from_error(FAILURE, Error::NoVideoMatch(format!("{} {}", track_name, artist_name)))
        })?;
    info!("Found video {} for {}", video.url, track_name);

    let token = state
        .tokens
        .valid_token(&state.auth)
        .await
        .map_err(|e| ApiError::from_error(FAILURE, e))?;
    let cover_url = state
        .spotify
        .track(&token, &track_id)
        .await
        .map_err(|e| ApiError::from_error(FAILURE, e))?
        .cover_url;

    let track = Track {
        id: track_id,
        name: track_name,
        artist: artist_name,
        cover_url,
    };
    state
        .downloader
        .fetch_and_tag(&video, &track)
        .await
        .map_err(|e| ApiError::from_error(FAILURE, e))?;

    Ok(Json(DownloadTrackResponse {
        message: format!("Downloaded: {}", track.name),
        file_url: utils::download_url(&track.name),
    }))
}

/// Downloads every track of a playlist, five at a time by default.
///
/// Per-track failures are only logged; the response confirms the batch once
/// it finished. The batch runs on its own task, a disconnecting client does
/// not stop it.
pub async fn download_playlist(
    State(state): State<AppState>,
    body: Result<Json<DownloadPlaylistRequest>, JsonRejection>,
) -> Result<String, ApiError> {
    let Some(playlist_id) = required(body_or_default(body).playlist_id) else {
        return Err(ApiError::BadRequest("playlistId is required".into()));
    };

    tokio::spawn(fetch_playlist(state, playlist_id))
        .await
        .map_err(|e| ApiError::from_error("Error downloading playlist", Error::Task(e)))?
}

async fn fetch_playlist(state: AppState, playlist_id: String) -> Result<String, ApiError> {
    const FAILURE: &str = "Error downloading playlist";

    let token = state
        .tokens
        .valid_token(&state.auth)
        .await
        .map_err(|e| ApiError::from_error(FAILURE, e))?;
    let tracks = state
        .spotify
        .playlist_tracks(&token, &playlist_id, state.settings.download_page_size)
        .await
        .map_err(|e| ApiError::from_error(FAILURE, e))?;

    let report = state
        .downloader
        .download_batch(tracks, state.settings.batch_concurrency, |_, _| {})
        .await;
    info!(
        "Playlist {}: {} downloaded, {} without match, {} failed",
        playlist_id, report.downloaded, report.no_match, report.failed
    );

    Ok(format!("Downloaded all tracks from playlist: {}", playlist_id))
}

pub async fn list_downloads(State(state): State<AppState>) -> Result<Json<Vec<String>>, ApiError> {
    let files = download::list_downloads(state.downloader.downloads_dir())
        .await
        .map_err(|e| ApiError::from_error("Error listing downloads", e))?;
    Ok(Json(files))
}
