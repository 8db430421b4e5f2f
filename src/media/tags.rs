//! Title, artist and cover art tagging for downloaded audio files.

use std::path::{Path, PathBuf};

use lofty::config::{ParseOptions, WriteOptions};
use lofty::picture::{MimeType, Picture, PictureType};
use lofty::prelude::*;
use lofty::probe::Probe;
use lofty::tag::Tag;

use crate::{error::Result, success, warning};

/// Writes title, artist and (optionally) a front cover into `audio`.
///
/// The primary tag of the file is created when missing; any existing front
/// cover is replaced.
pub fn write_tags(audio: &Path, title: &str, artist: &str, cover: Option<&Path>) -> Result<()> {
    let mut tagged_file = Probe::open(audio)?
        .options(ParseOptions::new().read_properties(false))
        .read()?;

    if tagged_file.primary_tag().is_none() {
        let tag_type = tagged_file.primary_tag_type();
        tagged_file.insert_tag(Tag::new(tag_type));
    }

    let Some(tag) = tagged_file.primary_tag_mut() else {
        return Ok(());
    };

    tag.set_title(title.to_string());
    tag.set_artist(artist.to_string());

    if let Some(cover) = cover {
        let data = std::fs::read(cover)?;
        tag.remove_picture_type(PictureType::CoverFront);
        tag.push_picture(Picture::new_unchecked(
            PictureType::CoverFront,
            Some(MimeType::Jpeg),
            None,
            data,
        ));
    }

    tagged_file.save_to_path(audio, WriteOptions::default())?;
    Ok(())
}

/// Tags `audio` on the blocking pool, then deletes the temporary cover.
///
/// The cover file is removed whether or not tagging succeeded; a failed
/// removal is only logged.
pub async fn embed_metadata(
    audio: PathBuf,
    title: String,
    artist: String,
    cover: Option<PathBuf>,
) -> Result<()> {
    let cover_for_tagging = cover.clone();
    let written = tokio::task::spawn_blocking(move || {
        write_tags(&audio, &title, &artist, cover_for_tagging.as_deref())
    })
    .await;

    if let Some(cover) = cover {
        if let Err(e) = async_fs::remove_file(&cover).await {
            warning!("Error deleting cover art file {}: {}", cover.display(), e);
        }
    }

    written??;
    success!("Metadata written successfully");
    Ok(())
}
