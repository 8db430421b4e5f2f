use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tabled::Table;

use crate::{
    config::Settings, download, error, info, server::AppState, success, types::DownloadTableRow,
    warning,
};

use super::playlists::valid_token;

pub async fn download(settings: Settings, playlist_id: String) {
    let state = AppState::from_settings(settings).await;
    let token = valid_token(&state).await;

    if let Err(e) = state.downloader.ensure_downloads_dir().await {
        error!("Cannot create downloads directory. Err: {}", e);
    }

    let spinner = ProgressBar::new_spinner();
    spinner.set_message("Fetching playlist tracks...");
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner.set_style(
        ProgressStyle::with_template("{spinner:.blue} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );

    let tracks = match state
        .spotify
        .playlist_tracks(&token, &playlist_id, state.settings.download_page_size)
        .await
    {
        Ok(tracks) => tracks,
        Err(e) => {
            spinner.finish_and_clear();
            error!("Failed to fetch tracks of {}. Err: {}", playlist_id, e);
        }
    };
    spinner.finish_and_clear();

    info!("Downloading {} tracks from {}", tracks.len(), playlist_id);

    let pb = ProgressBar::new(tracks.len() as u64);
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );

    let report = state
        .downloader
        .download_batch(tracks, state.settings.batch_concurrency, |track, _| {
            pb.inc(1);
            pb.set_message(track.name.clone());
        })
        .await;
    pb.finish_and_clear();

    success!(
        "{} downloaded, {} without match, {} failed",
        report.downloaded,
        report.no_match,
        report.failed
    );
}

pub async fn downloads(settings: Settings) {
    match download::list_downloads(&settings.downloads_dir).await {
        Ok(files) if files.is_empty() => info!("No downloads yet."),
        Ok(files) => {
            let table_rows: Vec<DownloadTableRow> = files
                .into_iter()
                .map(|file| DownloadTableRow { file })
                .collect();
            println!("{}", Table::new(table_rows));
        }
        Err(e) => warning!(
            "Failed to list {}. Err: {}",
            settings.downloads_dir.display(),
            e
        ),
    }
}
