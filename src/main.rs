use std::path::PathBuf;

use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use tunegrab::{
    cli,
    config::{self, Settings},
    error,
};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  author=env!("CARGO_PKG_AUTHORS"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Run the web server
    Serve(ServeOptions),

    /// List the playlists of the logged in user
    Playlists,

    /// List the tracks of a playlist
    Tracks(PlaylistArg),

    /// Download every track of a playlist as tagged mp3
    Download(PlaylistArg),

    /// List downloaded files
    Downloads,

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct ServeOptions {
    /// Port to listen on, overrides PORT
    #[clap(long)]
    pub port: Option<u16>,

    /// Directory downloaded files are written to, overrides DOWNLOADS_DIR
    #[clap(long)]
    pub downloads_dir: Option<PathBuf>,

    /// Open the login page in the browser once the server is up
    #[clap(long)]
    pub open: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct PlaylistArg {
    /// Spotify playlist id
    pub playlist_id: String,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    if let Err(e) = config::load_env().await {
        error!("Cannot load environment. Err: {}", e);
    }

    let cli = Cli::parse();

    match cli.command {
        Command::Serve(opt) => {
            let mut settings = settings();
            if let Some(port) = opt.port {
                let host = settings
                    .server_addr
                    .rsplit_once(':')
                    .map(|(host, _)| host.to_string())
                    .unwrap_or_else(|| "0.0.0.0".to_string());
                settings.server_addr = format!("{}:{}", host, port);
            }
            if let Some(dir) = opt.downloads_dir {
                settings.downloads_dir = dir;
            }
            cli::serve(settings, opt.open).await
        }
        Command::Playlists => cli::playlists(settings()).await,
        Command::Tracks(opt) => cli::tracks(settings(), opt.playlist_id).await,
        Command::Download(opt) => cli::download(settings(), opt.playlist_id).await,
        Command::Downloads => cli::downloads(settings()).await,
        Command::Completions(opt) => {
            let mut cmd = Cli::command_for_update();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}

fn settings() -> Settings {
    match Settings::from_env() {
        Ok(settings) => settings,
        Err(e) => error!("Invalid configuration. Err: {}", e),
    }
}
