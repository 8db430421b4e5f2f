//! Everything that touches media: finding a video for a track, extracting its
//! audio, downloading cover art and writing tags.

pub mod cover;
pub mod tags;
pub mod ytdlp;

use std::path::Path;

use async_trait::async_trait;

use crate::{error::Result, types::VideoMatch};

pub use cover::fetch_cover;
pub use tags::embed_metadata;
pub use ytdlp::YtDlp;

/// A video platform able to search for a track and extract audio from a hit.
#[async_trait]
pub trait VideoSource: Send + Sync {
    /// Returns the search hits for `query` in the platform's ranking order.
    async fn search(&self, query: &str) -> Result<Vec<VideoMatch>>;

    /// Extracts the audio of `video` as mp3 into `output`.
    async fn extract_audio(&self, video: &VideoMatch, output: &Path) -> Result<()>;
}
