use axum::{
    extract::{Path, State},
    response::Json,
};

use crate::{
    server::AppState,
    types::{PlaylistSummary, TrackSummary},
};

use super::ApiError;

pub async fn list_playlists(
    State(state): State<AppState>,
) -> Result<Json<Vec<PlaylistSummary>>, ApiError> {
    let token = state
        .tokens
        .valid_token(&state.auth)
        .await
        .map_err(|e| ApiError::from_error("Error fetching playlists", e))?;

    let playlists = state
        .spotify
        .user_playlists(&token)
        .await
        .map_err(|e| ApiError::from_error("Error fetching playlists", e))?;

    Ok(Json(playlists))
}

pub async fn list_tracks(
    Path(playlist_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Vec<TrackSummary>>, ApiError> {
    let token = state
        .tokens
        .valid_token(&state.auth)
        .await
        .map_err(|e| ApiError::from_error("Error fetching tracks", e))?;

    let tracks = state
        .spotify
        .playlist_tracks(&token, &playlist_id, state.settings.list_page_size)
        .await
        .map_err(|e| ApiError::from_error("Error fetching tracks", e))?;

    Ok(Json(tracks.iter().map(TrackSummary::from).collect()))
}
