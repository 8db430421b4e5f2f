mod download;
mod playlists;
mod serve;

pub use download::download;
pub use download::downloads;
pub use playlists::playlists;
pub use playlists::tracks;
pub use serve::serve;
