mod config;
mod logging;
mod migration;
mod normalize;
mod spotify;
mod track;
mod youtube;

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use config::{expand_home, Config, YtDlpOptions};
use log::info;
use migration::Migration;
use spotify::{matcher::MatchPolicy, Spotify};
use youtube::{client::YouTube, extractor::ytdlp::YtDlp, playlist_id_from_url, PlaylistSource};

/// Copy a YouTube playlist into a new private Spotify playlist.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Link to the YouTube playlist, or its id
    #[arg(short, long)]
    url: String,

    /// Destination location of JSON files
    #[arg(short, long, default_value = "~/Music/JSON")]
    output: PathBuf,

    /// Do not add to Spotify
    #[arg(long)]
    dryrun: bool,

    /// Save to a specific Spotify playlist (default: the YouTube playlist name)
    #[arg(long)]
    playlist: Option<String>,

    /// Write each video's info JSON to the output directory
    #[arg(long, alias = "store_json")]
    store_json: bool,

    /// Location of the yt-dlp download archive
    #[arg(long, default_value = "~/Music/JSON/archive.log")]
    archive: PathBuf,

    /// Cookies file passed to yt-dlp
    #[arg(long)]
    cookies: PathBuf,

    /// Only add a search result when its artist matches with confidence
    #[arg(long)]
    strict_match: bool,

    /// yt-dlp executable
    #[arg(long, default_value = "yt-dlp")]
    ytdlp: PathBuf,

    /// Console and file log level
    #[arg(long, default_value = "info")]
    log_level: log::LevelFilter,

    /// Path to log file
    #[arg(long, default_value_os_t = logging::log_file_path(env!("CARGO_PKG_NAME")))]
    log_file: PathBuf,
}

impl Args {
    fn ytdlp_options(&self) -> YtDlpOptions {
        YtDlpOptions {
            binary: self.ytdlp.clone(),
            cookies: expand_home(&self.cookies),
            archive: expand_home(&self.archive),
            output: expand_home(&self.output),
            store_json: self.store_json,
        }
    }

    fn policy(&self) -> MatchPolicy {
        if self.strict_match {
            MatchPolicy::ConfidentArtist
        } else {
            MatchPolicy::TopResult
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), anyhow::Error> {
    let args = Args::parse();
    logging::setup_logging(args.log_level, &args.log_file)?;

    let config = Config::from_env()?;

    let youtube = YouTube::new(config.youtube_api_key.clone());
    let ytdlp = YtDlp::new(args.ytdlp_options());
    let spotify = Spotify::authorize(&config.spotify)?;

    let playlist_id = playlist_id_from_url(&args.url);
    info!("Playlist ID: {}", playlist_id);
    info!("URL:{}", args.url);

    let playlist_name = match &args.playlist {
        Some(name) => name.clone(),
        None => youtube
            .playlist_title(&playlist_id)
            .await
            .context("could not read the YouTube playlist name")?,
    };

    let migration = Migration {
        source: &youtube,
        metadata: &ytdlp,
        destination: &spotify,
        policy: args.policy(),
        dry_run: args.dryrun,
    };
    migration.run(&playlist_id, &playlist_name).await;

    Ok(())
}
