use tabled::Table;

use crate::{
    config::Settings,
    error,
    server::AppState,
    types::{PlaylistTableRow, Token, TrackTableRow},
    warning,
};

pub async fn playlists(settings: Settings) {
    let state = AppState::from_settings(settings).await;
    let token = valid_token(&state).await;

    match state.spotify.user_playlists(&token).await {
        Ok(playlists) => {
            let table_rows: Vec<PlaylistTableRow> = playlists
                .into_iter()
                .map(|p| PlaylistTableRow {
                    id: p.id,
                    name: p.name,
                })
                .collect();

            println!("{}", Table::new(table_rows));
        }
        Err(e) => warning!("Failed to fetch playlists. Err: {}", e),
    }
}

pub async fn tracks(settings: Settings, playlist_id: String) {
    let state = AppState::from_settings(settings).await;
    let token = valid_token(&state).await;

    match state
        .spotify
        .playlist_tracks(&token, &playlist_id, state.settings.list_page_size)
        .await
    {
        Ok(tracks) => {
            let table_rows: Vec<TrackTableRow> = tracks
                .into_iter()
                .map(|t| TrackTableRow {
                    id: t.id,
                    name: t.name,
                    artist: t.artist,
                })
                .collect();

            println!("{}", Table::new(table_rows));
        }
        Err(e) => warning!("Failed to fetch tracks of {}. Err: {}", playlist_id, e),
    }
}

pub(super) async fn valid_token(state: &AppState) -> Token {
    match state.tokens.valid_token(&state.auth).await {
        Ok(token) => token,
        Err(e) => {
            error!(
                "Failed to load token. Please run tunegrab serve --open and log in\n Error: {}",
                e
            );
        }
    }
}
