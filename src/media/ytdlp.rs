use std::{path::Path, process::Stdio};

use async_trait::async_trait;
use serde::Deserialize;
use tokio::process::Command;

use crate::{
    error::{Error, Result},
    types::VideoMatch,
};

use super::VideoSource;

/// Number of hits requested per search, only the first one is used.
const SEARCH_RESULTS: u32 = 1;

/// [`VideoSource`] backed by the `yt-dlp` command line tool.
///
/// Searching and extraction both run `yt-dlp` as a subprocess, which in turn
/// needs `ffmpeg` on the `PATH` for the mp3 conversion.
#[derive(Debug, Clone)]
pub struct YtDlp {
    binary: String,
}

#[derive(Debug, Deserialize)]
struct SearchEntry {
    id: String,
    title: Option<String>,
    url: Option<String>,
    webpage_url: Option<String>,
}

impl YtDlp {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    async fn run(&self, args: &[&str]) -> Result<Vec<u8>> {
        let output = Command::new(&self.binary)
            .args(args)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| Error::Extraction(format!("cannot run {}: {}", self.binary, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::Extraction(format!(
                "{} exited with {}: {}",
                self.binary,
                output.status,
                stderr.trim()
            )));
        }

        Ok(output.stdout)
    }
}

#[async_trait]
impl VideoSource for YtDlp {
    async fn search(&self, query: &str) -> Result<Vec<VideoMatch>> {
        let search = format!("ytsearch{}:{}", SEARCH_RESULTS, query);
        let stdout = self
            .run(&["--dump-json", "--flat-playlist", "--no-warnings", &search])
            .await?;

        Ok(parse_search_output(&String::from_utf8_lossy(&stdout)))
    }

    async fn extract_audio(&self, video: &VideoMatch, output: &Path) -> Result<()> {
        let template = output_template(output);
        self.run(&[
            "--extract-audio",
            "--audio-format",
            "mp3",
            "--no-playlist",
            "--no-warnings",
            "--output",
            &template,
            &video.url,
        ])
        .await?;

        if !output.is_file() {
            return Err(Error::Extraction(format!(
                "expected {} after extraction",
                output.display()
            )));
        }
        Ok(())
    }
}

/// Parses the JSON-lines output of a flat `ytsearch`, skipping unreadable lines.
pub fn parse_search_output(stdout: &str) -> Vec<VideoMatch> {
    stdout
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| serde_json::from_str::<SearchEntry>(line).ok())
        .map(|entry| {
            let url = entry
                .webpage_url
                .or(entry.url)
                .unwrap_or_else(|| format!("https://www.youtube.com/watch?v={}", entry.id));
            VideoMatch {
                title: entry.title.unwrap_or_default(),
                id: entry.id,
                url,
            }
        })
        .collect()
}

/// Turns `<dir>/<name>.mp3` into the `yt-dlp` template `<dir>/<name>.%(ext)s`.
///
/// `%` in the path is doubled so yt-dlp keeps it literally.
pub fn output_template(output: &Path) -> String {
    let escape = |s: &str| s.replace('%', "%%");
    let stem = output
        .file_stem()
        .map(|s| escape(&s.to_string_lossy()))
        .unwrap_or_default();
    let file = format!("{}.%(ext)s", stem);

    match output.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => Path::new(&escape(&dir.to_string_lossy()))
            .join(file)
            .to_string_lossy()
            .into_owned(),
        _ => file,
    }
}
