use std::path::{Path, PathBuf};

use url::Url;

/// Extracts the numeric `offset` query parameter from a Spotify `next` URL.
///
/// Returns `None` when the URL cannot be parsed or carries no usable offset.
pub fn offset_from_next_url(next: &str) -> Option<u32> {
    let url = Url::parse(next).ok()?;
    url.query_pairs()
        .find(|(key, _)| key == "offset")
        .and_then(|(_, value)| value.parse().ok())
}

/// Replaces filesystem-unsafe characters with visually similar alternatives.
///
/// Ordinary track names pass through unchanged, only path separators and the
/// characters Windows rejects are swapped.
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' => '⧸',
            '\\' => '⧹',
            ':' => '꞉',
            '*' => '⁎',
            '?' => '？',
            '"' => '″',
            '<' => '‹',
            '>' => '›',
            '|' => '｜',
            '\0' => '_',
            _ => c,
        })
        .collect::<String>()
        .trim()
        .to_string()
}

/// File name (without directory) of the mp3 produced for a track name.
pub fn audio_file_name(track_name: &str) -> String {
    format!("{}.mp3", sanitize_filename(track_name))
}

pub fn audio_path(dir: &Path, track_name: &str) -> PathBuf {
    dir.join(audio_file_name(track_name))
}

pub fn cover_path(dir: &Path, track_name: &str) -> PathBuf {
    dir.join(format!("{}.jpg", sanitize_filename(track_name)))
}

/// URL path under which the static file server exposes a track's mp3.
///
/// The file name is percent-encoded, so `#`, `%` and spaces survive in links.
pub fn download_url(track_name: &str) -> String {
    format!("/downloads/{}", urlencoding::encode(&audio_file_name(track_name)))
}

pub fn is_mp3(file_name: &str) -> bool {
    file_name.ends_with(".mp3")
}
