use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::mpsc;
use std::time::Duration;
use vlc_now_playing::config::{
    DEFAULT_ARTWORK_PATH, DEFAULT_CURRENT_PATH, DEFAULT_ENDPOINT, DEFAULT_HISTORY_PATH,
    DEFAULT_POLL_INTERVAL_SECS, DEFAULT_SEPARATOR,
};
use vlc_now_playing::player::HttpStatusSource;
use vlc_now_playing::{Poller, PollerConfig};

#[derive(Parser, Debug)]
#[command(name = "vlc-now-playing")]
#[command(about = "Write VLC's now playing info to text files for stream overlays", long_about = None)]
struct Args {
    /// VLC web interface status endpoint
    #[arg(long, env = "VLC_NOW_PLAYING_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    endpoint: String,

    /// VLC web interface password (the user name is always empty)
    #[arg(long, env = "VLC_PASSWORD", default_value = "", hide_env_values = true)]
    password: String,

    /// Seconds between two polls
    #[arg(long, env = "VLC_NOW_PLAYING_INTERVAL", default_value_t = DEFAULT_POLL_INTERVAL_SECS)]
    interval: u64,

    /// Text written after the song info in the current-state file
    #[arg(long, env = "VLC_NOW_PLAYING_SEPARATOR", default_value = DEFAULT_SEPARATOR)]
    separator: String,

    /// Current-state file
    #[arg(long, env = "VLC_NOW_PLAYING_OUTPUT", default_value = DEFAULT_CURRENT_PATH)]
    output: String,

    /// History file
    #[arg(long, env = "VLC_NOW_PLAYING_HISTORY", default_value = DEFAULT_HISTORY_PATH)]
    history: String,

    /// Album art file
    #[arg(long, env = "VLC_NOW_PLAYING_ARTWORK", default_value = DEFAULT_ARTWORK_PATH)]
    artwork: String,

    /// Verbose logging
    #[arg(short = 'v', long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    if args.interval == 0 {
        anyhow::bail!("--interval must be at least 1 second");
    }

    // Expand ~ in paths
    let current_path = PathBuf::from(shellexpand::tilde(&args.output).as_ref());
    let history_path = PathBuf::from(shellexpand::tilde(&args.history).as_ref());
    let artwork_path = PathBuf::from(shellexpand::tilde(&args.artwork).as_ref());

    let config = PollerConfig::new(args.password)
        .with_endpoint(args.endpoint)
        .with_poll_interval(Duration::from_secs(args.interval))
        .with_separator(args.separator)
        .with_outputs(current_path, history_path, artwork_path);

    log::info!("VLC Now Playing");
    log::info!("Current state: {:?}", config.current_path);
    log::info!("History:       {:?}", config.history_path);
    log::info!("Album art:     {:?}", config.artwork_path);

    let source = HttpStatusSource::new(config.endpoint.clone(), config.password.clone())?;
    let poller = Poller::new(config, source);

    // Ctrl+C / SIGTERM end the wait between two polls
    let (shutdown_tx, shutdown_rx) = mpsc::channel();
    ctrlc::set_handler(move || {
        log::info!("Received interrupt signal, shutting down...");
        let _ = shutdown_tx.send(());
    })
    .context("Failed to set Ctrl+C handler")?;

    let state = poller.run(&shutdown_rx);
    if state.is_tracking() {
        log::info!("Last published: {}", state.current_song_info);
    }

    Ok(())
}
