//! Track download orchestration.
//!
//! A track goes through three steps: resolve a video for `<name> <artist>`,
//! fetch the media (audio extraction and cover art) and write the metadata.
//! [`Downloader::download_batch`] runs that pipeline over a whole playlist with
//! a bounded number of tracks in flight.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use futures::stream::{self, StreamExt};
use reqwest::Client;

use crate::{
    error::Result,
    info,
    media::{self, VideoSource},
    success,
    types::{Track, VideoMatch},
    utils, warning,
};

/// Files produced for one track before tagging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadedAsset {
    pub audio: PathBuf,
    pub cover: Option<PathBuf>,
}

/// Result of running the pipeline for a single track.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackOutcome {
    Downloaded(PathBuf),
    NoMatch,
}

/// Per-item counts of a batch run. Only used for logging and the CLI.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub downloaded: usize,
    pub no_match: usize,
    pub failed: usize,
}

pub struct Downloader {
    source: Arc<dyn VideoSource>,
    http: Client,
    downloads_dir: PathBuf,
}

impl Downloader {
    pub fn new(source: Arc<dyn VideoSource>, downloads_dir: PathBuf) -> Self {
        Self {
            source,
            http: Client::new(),
            downloads_dir,
        }
    }

    pub fn downloads_dir(&self) -> &Path {
        &self.downloads_dir
    }

    /// Creates the downloads directory if it does not exist yet.
    pub async fn ensure_downloads_dir(&self) -> Result<()> {
        async_fs::create_dir_all(&self.downloads_dir).await?;
        Ok(())
    }

    /// Picks the first search hit for `<name> <artist>`, `None` when there is none.
    pub async fn resolve(&self, name: &str, artist: &str) -> Result<Option<VideoMatch>> {
        let query = format!("{} {}", name, artist);
        let mut hits = self.source.search(&query).await?;
        if hits.is_empty() {
            return Ok(None);
        }
        Ok(Some(hits.swap_remove(0)))
    }

    /// Extracts the audio of `video` and downloads the track's cover art.
    ///
    /// Both files are named after the track's display name. Without a cover
    /// URL only the audio is produced.
    pub async fn fetch_media(&self, video: &VideoMatch, track: &Track) -> Result<DownloadedAsset> {
        let audio = utils::audio_path(&self.downloads_dir, &track.name);
        self.source.extract_audio(video, &audio).await?;
        info!("Downloaded: {}", track.name);

        let cover = match &track.cover_url {
            Some(url) => {
                let cover = utils::cover_path(&self.downloads_dir, &track.name);
                if let Err(e) = media::fetch_cover(&self.http, url, &cover).await {
                    remove_partial(&cover).await;
                    return Err(e);
                }
                Some(cover)
            }
            None => None,
        };

        Ok(DownloadedAsset { audio, cover })
    }

    /// Fetches media for an already resolved video and tags the result.
    pub async fn fetch_and_tag(&self, video: &VideoMatch, track: &Track) -> Result<PathBuf> {
        let asset = self.fetch_media(video, track).await?;
        media::embed_metadata(
            asset.audio.clone(),
            track.name.clone(),
            track.artist.clone(),
            asset.cover,
        )
        .await?;
        Ok(asset.audio)
    }

    /// Runs resolve, fetch and tag for one track.
    pub async fn download_track(&self, track: &Track) -> Result<TrackOutcome> {
        match self.resolve(&track.name, &track.artist).await? {
            Some(video) => Ok(TrackOutcome::Downloaded(
                self.fetch_and_tag(&video, track).await?,
            )),
            None => Ok(TrackOutcome::NoMatch),
        }
    }

    /// Downloads every track with at most `limit` pipelines in flight.
    ///
    /// Tracks are started in input order; completion order is unspecified.
    /// A failing or unmatched track never stops the others, its outcome is
    /// logged and counted. `on_done` is called once per finished track.
    pub async fn download_batch<F>(&self, tracks: Vec<Track>, limit: usize, mut on_done: F) -> BatchReport
    where
        F: FnMut(&Track, &Result<TrackOutcome>),
    {
        let mut report = BatchReport::default();

        let mut results = stream::iter(tracks)
            .map(|track| async move {
                let outcome = self.download_track(&track).await;
                (track, outcome)
            })
            .buffer_unordered(limit.max(1));

        while let Some((track, outcome)) = results.next().await {
            match &outcome {
                Ok(TrackOutcome::Downloaded(path)) => {
                    report.downloaded += 1;
                    success!("Downloaded {} to {}", track.name, path.display());
                }
                Ok(TrackOutcome::NoMatch) => {
                    report.no_match += 1;
                    info!("No video found for: {} by {}", track.name, track.artist);
                }
                Err(e) => {
                    report.failed += 1;
                    warning!("Failed to download {} by {}: {}", track.name, track.artist, e);
                }
            }
            on_done(&track, &outcome);
        }

        report
    }
}

/// Lists the mp3 files in `dir`, sorted by name.
pub async fn list_downloads(dir: &Path) -> Result<Vec<String>> {
    let mut entries = async_fs::read_dir(dir).await?;
    let mut files = Vec::new();

    while let Some(entry) = entries.next().await {
        let name = entry?.file_name().to_string_lossy().into_owned();
        if utils::is_mp3(&name) {
            files.push(name);
        }
    }

    files.sort();
    Ok(files)
}

async fn remove_partial(path: &Path) {
    if let Err(e) = async_fs::remove_file(path).await {
        if e.kind() != std::io::ErrorKind::NotFound {
            warning!("Error deleting cover art file {}: {}", path.display(), e);
        }
    }
}
