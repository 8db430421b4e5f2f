use crate::{
    error::{Error, Result},
    retry::retry,
    types::{
        GetUserPlaylistsResponse, PlaylistPage, PlaylistSummary, PlaylistTracksResponse, Token,
        Track,
    },
    utils,
};

use super::SpotifyApi;

const PLAYLISTS_PAGE_SIZE: u32 = 50;

impl SpotifyApi {
    /// Lists the playlists of the authenticated user.
    ///
    /// Follows the `next` cursor until the last page, each page fetched through
    /// the retry wrapper.
    pub async fn user_playlists(&self, token: &Token) -> Result<Vec<PlaylistSummary>> {
        let mut playlists = Vec::new();
        let mut offset = 0;

        loop {
            let query = [
                ("limit", PLAYLISTS_PAGE_SIZE.to_string()),
                ("offset", offset.to_string()),
            ];
            let page: GetUserPlaylistsResponse = retry(&self.retry, "user playlists", || {
                self.get_json(token, "/me/playlists", &query)
            })
            .await?;

            playlists.extend(page.items.into_iter().map(|p| PlaylistSummary {
                id: p.id,
                name: p.name,
            }));

            match page.next {
                Some(next) => offset = next_offset(&next)?,
                None => return Ok(playlists),
            }
        }
    }

    /// Fetches a single page of a playlist's tracks.
    ///
    /// `offset` and `limit` are only sent when given, so `None` keeps the Web
    /// API defaults. Items without a playable track are dropped.
    pub async fn playlist_tracks_page(
        &self,
        token: &Token,
        playlist_id: &str,
        offset: Option<u32>,
        limit: Option<u32>,
    ) -> Result<PlaylistPage> {
        let mut query = Vec::new();
        if let Some(offset) = offset {
            query.push(("offset", offset.to_string()));
        }
        if let Some(limit) = limit {
            query.push(("limit", limit.to_string()));
        }

        let res: PlaylistTracksResponse = self
            .get_json(token, &format!("/playlists/{}/tracks", playlist_id), &query)
            .await?;

        let next_offset = match res.next {
            Some(next) => Some(next_offset(&next)?),
            None => None,
        };

        Ok(PlaylistPage {
            tracks: res
                .items
                .into_iter()
                .filter_map(|item| item.track)
                .filter_map(Track::from_api)
                .collect(),
            next_offset,
        })
    }

    /// Enumerates every track of a playlist in playlist order.
    ///
    /// Pages are requested strictly one after another, each through the retry
    /// wrapper, and appended in cursor order. No deduplication is applied.
    pub async fn playlist_tracks(
        &self,
        token: &Token,
        playlist_id: &str,
        limit: Option<u32>,
    ) -> Result<Vec<Track>> {
        let mut tracks = Vec::new();
        let mut offset = None;

        loop {
            let page = retry(&self.retry, "playlist tracks", || {
                self.playlist_tracks_page(token, playlist_id, offset, limit)
            })
            .await?;
            tracks.extend(page.tracks);

            match page.next_offset {
                Some(next) => offset = Some(next),
                None => return Ok(tracks),
            }
        }
    }
}

fn next_offset(next: &str) -> Result<u32> {
    utils::offset_from_next_url(next).ok_or_else(|| Error::Pagination(next.to_string()))
}
