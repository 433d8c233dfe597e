use clap::Parser;
use env_logger::Env;
use log::{error, info};
use mpdscrobble::players::MpdSource;
use mpdscrobble::scrobbler::{Context, ScrobblePoller};
use mpdscrobble::Config;
use std::path::PathBuf;
use std::process;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Last.fm scrobbler for MPD", long_about = None)]
struct Args {
    /// Path to the JSON configuration file
    #[clap(short, long)]
    config: Option<PathBuf>,
}

fn main() {
    // Initialize the logger with default configuration
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => match Config::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                error!("{}", e);
                process::exit(1);
            }
        },
        None => Config::default(),
    };

    if !config.lastfm.enabled {
        info!("Last.fm scrobbling is disabled by configuration, exiting");
        return;
    }

    let running = Arc::new(AtomicBool::new(true));
    let running_flag = running.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        info!("Shutdown signal received");
        running_flag.store(false, Ordering::SeqCst);
    }) {
        error!("Failed to install signal handler: {}", e);
    }

    info!(
        "Scrobbling for MPD at {}:{}",
        config.mpd.host, config.mpd.port
    );

    let mut source = MpdSource::new(&config.mpd.host, config.mpd.port);
    let mut poller = ScrobblePoller::new(&config, Context::new());
    let interval = Duration::from_secs(config.poll_interval_secs.max(1));

    while running.load(Ordering::SeqCst) {
        poller.tick(&mut source);
        thread::sleep(interval);
    }

    info!("Scrobbler stopped");
}
