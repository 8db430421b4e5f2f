use crate::{
    error::{Error, Result},
    types::{SpotifyTrack, Token, Track},
};

use super::SpotifyApi;

impl SpotifyApi {
    /// Looks up a single track, mainly for its album cover URL.
    pub async fn track(&self, token: &Token, track_id: &str) -> Result<Track> {
        let track: SpotifyTrack = self
            .get_json(token, &format!("/tracks/{}", track_id), &[])
            .await?;

        Track::from_api(track).ok_or_else(|| Error::TrackUnavailable(track_id.to_string()))
    }
}
