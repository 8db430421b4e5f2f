//! Spotify Track Downloader Library
//!
//! This library lets a user authenticate against Spotify, browse playlists and
//! fetch single tracks or whole playlists as mp3 files. Audio is located on a
//! video platform through `yt-dlp`, extracted locally and tagged with title,
//! artist and the album cover.
//!
//! # Modules
//!
//! - `api` - HTTP route handlers
//! - `cli` - Command-line interface implementations
//! - `config` - Configuration management and environment variables
//! - `download` - Track resolver, per-track pipeline and bounded batch downloader
//! - `error` - Error taxonomy shared by all modules
//! - `management` - Token/session storage
//! - `media` - Video search, audio extraction, cover download and tagging
//! - `retry` - Exponential backoff retry wrapper
//! - `server` - HTTP server wiring
//! - `spotify` - Spotify Web API client implementation
//! - `types` - Data structures and type definitions
//! - `utils` - Utility functions and helpers
//!
//! # Example
//!
//! ```
//! use tunegrab::{config, server};
//!
//! #[tokio::main]
//! async fn main() -> tunegrab::error::Result<()> {
//!     config::load_env().await?;
//!     let settings = config::Settings::from_env()?;
//!     server::start_api_server(settings).await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod download;
pub mod error;
pub mod management;
pub mod media;
pub mod retry;
pub mod server;
pub mod spotify;
pub mod types;
pub mod utils;

/// Prints an informational message with a blue bullet point.
///
/// # Example
///
/// ```
/// info!("Searching video for {}", track_name);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
///
/// # Example
///
/// ```
/// success!("Downloaded: {}", track_name);
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Only used for unrecoverable startup failures in the binary. Library code
/// and request handlers report failures through [`warning!`] and return errors.
///
/// # Example
///
/// ```
/// error!("Missing required environment variable: {}", var_name);
/// // Program exits here - code after this will not execute
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// Used for recoverable issues: retried requests, skipped batch items, failed
/// cleanups and route-level failures before a generic response is returned.
///
/// # Example
///
/// ```
/// warning!("Error deleting cover art file {}: {}", path.display(), e);
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
