#![allow(dead_code)]

use std::{
    collections::HashSet,
    path::Path,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use axum::{
    Json, Router,
    extract::{Path as UrlPath, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{Value, json};
use tunegrab::{
    config::Settings,
    error::{Error, Result},
    media::VideoSource,
    retry::RetryPolicy,
    types::{Token, Track, VideoMatch},
};

pub const COVER_BYTES: &[u8] = b"\xFF\xD8\xFF\xE0fake-jpeg-cover";

/// Ten silent MPEG-1 Layer III frames (128 kbit/s, 44.1 kHz), enough for the
/// tag reader to recognise the file as mp3.
pub fn silent_mp3() -> Vec<u8> {
    let mut data = Vec::new();
    for _ in 0..10 {
        data.extend_from_slice(&[0xFF, 0xFB, 0x90, 0x00]);
        data.extend(std::iter::repeat_n(0u8, 413));
    }
    data
}

pub fn token() -> Token {
    Token {
        access_token: "access".into(),
        refresh_token: "refresh".into(),
        scope: "playlist-read-private".into(),
        expires_in: 3600,
        obtained_at: Utc::now().timestamp() as u64,
    }
}

pub fn expired_token() -> Token {
    Token {
        obtained_at: 0,
        ..token()
    }
}

pub fn fast_retry() -> RetryPolicy {
    RetryPolicy {
        retries: 3,
        factor: 2,
        min_timeout: Duration::from_millis(1),
        max_timeout: Duration::from_millis(10),
    }
}

pub fn settings(base_url: &str, downloads_dir: &Path) -> Settings {
    Settings {
        client_id: "client".into(),
        client_secret: "secret".into(),
        redirect_uri: "http://localhost:3000/callback".into(),
        scope: "playlist-read-private".into(),
        auth_url: format!("{}/authorize", base_url),
        token_url: format!("{}/api/token", base_url),
        api_url: base_url.into(),
        server_addr: "127.0.0.1:0".into(),
        downloads_dir: downloads_dir.to_path_buf(),
        public_dir: downloads_dir.join("public"),
        token_cache: None,
        ytdlp_path: "yt-dlp".into(),
        list_page_size: Some(100),
        download_page_size: None,
        batch_concurrency: 5,
        retry: fast_retry(),
    }
}

pub fn track(id: &str, name: &str, artist: &str) -> Track {
    Track {
        id: id.into(),
        name: name.into(),
        artist: artist.into(),
        cover_url: None,
    }
}

pub fn track_json(id: &str, name: &str, artist: &str, cover_url: Option<&str>) -> Value {
    let images: Vec<Value> = cover_url
        .map(|url| vec![json!({ "url": url, "height": 640, "width": 640 })])
        .unwrap_or_default();
    json!({
        "id": id,
        "name": name,
        "artists": [{ "id": format!("{}-artist", id), "name": artist }],
        "album": { "images": images }
    })
}

/// In-process stand-in for the Spotify accounts service and Web API.
#[derive(Default)]
pub struct FakeSpotify {
    pub base_url: String,
    pub playlists: Vec<(String, String)>,
    pub items: Vec<Value>,
    /// Track page offsets answered with a 500 the first time they are asked for.
    pub fail_offsets: Mutex<HashSet<u32>>,
    pub track_page_requests: AtomicUsize,
}

impl FakeSpotify {
    pub fn with_tracks(count: usize) -> Self {
        FakeSpotify {
            items: (0..count)
                .map(|i| {
                    json!({
                        "track": track_json(&format!("t{}", i), &format!("Track {}", i), "Artist", None)
                    })
                })
                .collect(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Deserialize)]
struct PageParams {
    offset: Option<u32>,
    limit: Option<u32>,
}

/// Binds the fake on an ephemeral port and returns it with its base URL set.
pub async fn spawn_spotify(mut fake: FakeSpotify) -> Arc<FakeSpotify> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    fake.base_url = format!("http://{}", listener.local_addr().unwrap());
    let fake = Arc::new(fake);

    let app = Router::new()
        .route("/me/playlists", get(playlists))
        .route("/playlists/{id}/tracks", get(playlist_tracks))
        .route("/tracks/{id}", get(single_track))
        .route("/cover.jpg", get(cover))
        .route("/api/token", post(token_endpoint))
        .with_state(fake.clone());

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    fake
}

fn next_url(base: &str, path: &str, offset: u32, limit: u32, total: usize) -> Value {
    if ((offset + limit) as usize) < total {
        json!(format!(
            "{}{}?offset={}&limit={}",
            base,
            path,
            offset + limit,
            limit
        ))
    } else {
        Value::Null
    }
}

fn page<T: Clone>(all: &[T], offset: u32, limit: u32) -> Vec<T> {
    all.iter()
        .skip(offset as usize)
        .take(limit as usize)
        .cloned()
        .collect()
}

async fn playlists(
    State(fake): State<Arc<FakeSpotify>>,
    Query(params): Query<PageParams>,
) -> Json<Value> {
    let offset = params.offset.unwrap_or(0);
    let limit = params.limit.unwrap_or(20);
    let items: Vec<Value> = page(&fake.playlists, offset, limit)
        .into_iter()
        .map(|(id, name)| json!({ "id": id, "name": name }))
        .collect();

    Json(json!({
        "items": items,
        "next": next_url(&fake.base_url, "/me/playlists", offset, limit, fake.playlists.len()),
    }))
}

async fn playlist_tracks(
    State(fake): State<Arc<FakeSpotify>>,
    UrlPath(id): UrlPath<String>,
    Query(params): Query<PageParams>,
) -> impl IntoResponse {
    fake.track_page_requests.fetch_add(1, Ordering::SeqCst);
    let offset = params.offset.unwrap_or(0);
    let limit = params.limit.unwrap_or(100);

    if fake.fail_offsets.lock().unwrap().remove(&offset) {
        return (StatusCode::INTERNAL_SERVER_ERROR, "try again").into_response();
    }

    let path = format!("/playlists/{}/tracks", id);
    Json(json!({
        "items": page(&fake.items, offset, limit),
        "next": next_url(&fake.base_url, &path, offset, limit, fake.items.len()),
        "total": fake.items.len(),
    }))
    .into_response()
}

async fn single_track(
    State(fake): State<Arc<FakeSpotify>>,
    UrlPath(id): UrlPath<String>,
) -> Json<Value> {
    let cover = format!("{}/cover.jpg", fake.base_url);
    Json(track_json(&id, "Song", "Artist", Some(&cover)))
}

async fn cover() -> impl IntoResponse {
    ([("content-type", "image/jpeg")], COVER_BYTES)
}

async fn token_endpoint() -> Json<Value> {
    Json(json!({
        "access_token": "fresh-access",
        "token_type": "Bearer",
        "scope": "playlist-read-private",
        "expires_in": 3600,
        "refresh_token": "fresh-refresh"
    }))
}

/// [`VideoSource`] that never leaves the process.
///
/// Every query yields one hit unless it contains one of `missing`; extraction
/// writes [`silent_mp3`] unless the video title contains one of `broken`.
/// A track counts as in flight from the start of its search until its
/// extraction returned (or its search found nothing). Searches and extractions
/// each wait `delay`.
#[derive(Default)]
pub struct StubSource {
    pub missing: Vec<String>,
    pub broken: Vec<String>,
    pub delay: Duration,
    pub searches: AtomicUsize,
    pub extractions: AtomicUsize,
    in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
    extracting: AtomicUsize,
    pub max_extracting: AtomicUsize,
}

impl StubSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn missing(mut self, query: &str) -> Self {
        self.missing.push(query.into());
        self
    }

    pub fn broken(mut self, title: &str) -> Self {
        self.broken.push(title.into());
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[async_trait]
impl VideoSource for StubSource {
    async fn search(&self, query: &str) -> Result<Vec<VideoMatch>> {
        self.searches.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;

        if self.missing.iter().any(|m| query.contains(m.as_str())) {
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            return Ok(Vec::new());
        }
        Ok(vec![VideoMatch {
            id: query.replace(' ', "-"),
            title: query.into(),
            url: format!("https://video.example/{}", query.replace(' ', "-")),
        }])
    }

    async fn extract_audio(&self, video: &VideoMatch, output: &Path) -> Result<()> {
        self.extractions.fetch_add(1, Ordering::SeqCst);
        let now = self.extracting.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_extracting.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;

        let result = if self.broken.iter().any(|b| video.title.contains(b.as_str())) {
            Err(Error::Extraction(format!("cannot extract {}", video.url)))
        } else {
            tokio::fs::write(output, silent_mp3()).await.map_err(Error::from)
        };

        self.extracting.fetch_sub(1, Ordering::SeqCst);
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }
}
