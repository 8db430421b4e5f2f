use std::path::Path;

use tunegrab::media::ytdlp::{output_template, parse_search_output};
use tunegrab::types::{PlaylistItem, SpotifyTrack, Track, UNKNOWN_ARTIST};
use tunegrab::utils::*;

// Helper function to parse a Web API track object
fn api_track(json: &str) -> SpotifyTrack {
    serde_json::from_str(json).unwrap()
}

#[test]
fn test_offset_from_next_url() {
    assert_eq!(
        offset_from_next_url("https://api.spotify.com/v1/playlists/p1/tracks?offset=100&limit=100"),
        Some(100)
    );
    assert_eq!(
        offset_from_next_url("https://api.spotify.com/v1/me/playlists?limit=50&offset=50"),
        Some(50)
    );

    // Missing or unusable offsets
    assert_eq!(offset_from_next_url("https://api.spotify.com/v1/me/playlists?limit=50"), None);
    assert_eq!(offset_from_next_url("https://api.spotify.com/v1/me/playlists?offset=abc"), None);
    assert_eq!(offset_from_next_url("not a url"), None);
}

#[test]
fn test_sanitize_filename_keeps_ordinary_names() {
    assert_eq!(sanitize_filename("Song"), "Song");
    assert_eq!(sanitize_filename("Don't Stop Me Now"), "Don't Stop Me Now");
    assert_eq!(sanitize_filename("Café (Live) [2019]"), "Café (Live) [2019]");
}

#[test]
fn test_sanitize_filename_replaces_unsafe_characters() {
    let sanitized = sanitize_filename("AC/DC: Back in Black?");

    assert!(!sanitized.contains('/'));
    assert!(!sanitized.contains(':'));
    assert!(!sanitized.contains('?'));
    assert!(sanitized.starts_with("AC"));
    assert!(sanitized.ends_with("Back in Black？"));

    // Surrounding whitespace is dropped
    assert_eq!(sanitize_filename("  Padded  "), "Padded");
}

#[test]
fn test_file_paths() {
    let dir = Path::new("downloads");

    assert_eq!(audio_file_name("Song"), "Song.mp3");
    assert_eq!(audio_path(dir, "Song"), dir.join("Song.mp3"));
    assert_eq!(cover_path(dir, "Song"), dir.join("Song.jpg"));
    assert_eq!(download_url("Song"), "/downloads/Song.mp3");
    assert_eq!(download_url("Two Words"), "/downloads/Two%20Words.mp3");
}

#[test]
fn test_download_url_keeps_fragment_characters() {
    // `#` would otherwise start a fragment in the browser
    assert_eq!(download_url("Track #1"), "/downloads/Track%20%231.mp3");
    assert_eq!(download_url("100% Pure"), "/downloads/100%25%20Pure.mp3");
}

#[test]
fn test_is_mp3() {
    assert!(is_mp3("a.mp3"));
    assert!(!is_mp3("a.jpg"));
    assert!(!is_mp3("mp3"));
    assert!(!is_mp3("a.mp3.part"));
}

#[test]
fn test_track_from_api() {
    let track = Track::from_api(api_track(
        r#"{
            "id": "t1",
            "name": "Song",
            "artists": [{"id": "a1", "name": "First"}, {"id": "a2", "name": "Second"}],
            "album": {"images": [{"url": "https://img/640.jpg", "height": 640, "width": 640},
                                 {"url": "https://img/64.jpg", "height": 64, "width": 64}]}
        }"#,
    ))
    .unwrap();

    // Only the first artist and the first image are kept
    assert_eq!(track.artist, "First");
    assert_eq!(track.cover_url.as_deref(), Some("https://img/640.jpg"));
}

#[test]
fn test_track_from_api_fallbacks() {
    let track = Track::from_api(api_track(r#"{"id": "t1", "name": "Song", "artists": []}"#)).unwrap();
    assert_eq!(track.artist, UNKNOWN_ARTIST);
    assert_eq!(track.cover_url, None);

    // Local files carry no id
    assert!(Track::from_api(api_track(r#"{"id": null, "name": "Local"}"#)).is_none());

    let item: PlaylistItem = serde_json::from_str(r#"{"track": null}"#).unwrap();
    assert!(item.track.is_none());
}

#[test]
fn test_parse_search_output() {
    let stdout = concat!(
        r#"{"id": "abc", "title": "Song (Official Video)", "url": "https://www.youtube.com/watch?v=abc"}"#,
        "\n",
        "garbage line\n",
        "\n",
        r#"{"id": "def", "title": "Song (Live)"}"#,
        "\n"
    );

    let matches = parse_search_output(stdout);

    assert_eq!(matches.len(), 2);
    assert_eq!(matches[0].id, "abc");
    assert_eq!(matches[0].url, "https://www.youtube.com/watch?v=abc");
    assert_eq!(matches[1].url, "https://www.youtube.com/watch?v=def");
    assert!(parse_search_output("").is_empty());
}

#[test]
fn test_output_template() {
    assert_eq!(
        output_template(Path::new("downloads/Song.mp3")),
        Path::new("downloads")
            .join("Song.%(ext)s")
            .to_string_lossy()
    );
    assert_eq!(output_template(Path::new("Song.mp3")), "Song.%(ext)s");
    assert_eq!(output_template(Path::new("100% Pure.mp3")), "100%% Pure.%(ext)s");
}
