//! # API Module
//!
//! HTTP route handlers of the tunegrab web server. Each handler is a thin
//! adapter: it validates the request, obtains a valid token from the
//! [`TokenManager`](crate::management::TokenManager) and delegates to
//! [`crate::spotify`] or [`crate::download`].
//!
//! ## Endpoints
//!
//! | Method/Path | Handler |
//! |---|---|
//! | `GET /health` | [`health`] |
//! | `GET /login` | [`login`] |
//! | `GET /callback` | [`callback`] |
//! | `GET /list-playlists` | [`list_playlists`] |
//! | `GET /list-tracks/{playlist_id}` | [`list_tracks`] |
//! | `POST /download-track` | [`download_track`] |
//! | `POST /download-playlist` | [`download_playlist`] |
//! | `GET /list-downloads` | [`list_downloads`] |
//!
//! Static files (`/` and `/downloads/*`) are served by the router in
//! [`crate::server`].
//!
//! ## Errors
//!
//! Failures are logged with their cause and answered with a plain-text
//! [`ApiError`]: 400 for missing fields, 401 before login, 404 when no video
//! matches a single track, 500 otherwise.

mod callback;
mod downloads;
mod error;
mod health;
mod playlists;

pub use callback::{callback, login};
pub use downloads::{download_playlist, download_track, list_downloads};
pub use error::ApiError;
pub use health::health;
pub use playlists::{list_playlists, list_tracks};
