use std::path::Path;

use futures::{AsyncWriteExt, StreamExt};
use reqwest::Client;

use crate::error::Result;

/// Streams the image at `url` into `target`.
///
/// Completes once every chunk is written and the file is flushed. A failing
/// request or write leaves a partial file behind for the caller to remove.
pub async fn fetch_cover(client: &Client, url: &str, target: &Path) -> Result<()> {
    let response = client.get(url).send().await?.error_for_status()?;

    let mut file = async_fs::File::create(target).await?;
    let mut body = response.bytes_stream();
    while let Some(chunk) = body.next().await {
        file.write_all(&chunk?).await?;
    }
    file.flush().await?;

    Ok(())
}
