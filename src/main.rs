//! headway - A transit sign for the terminal.
//!
//! This is the main binary that loads the configuration, starts the feed
//! poller, and launches the TUI application.

use std::fs::{self, File};
use std::sync::Mutex;

use anyhow::Context;
use headway_config::{Config, PollingConfig, persistence};
use headway_feed::{PayloadCache, Poller, Schedule, Source};
use headway_protocol::{HeaderData, ScreenData, dummy::dummy_screen};
use headway_tui::{App, FeedHandle, terminal};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter.
const LOG_ENV: &str = "HEADWAY_LOG";

/// Log file name inside the user data directory.
const LOG_FILE: &str = "headway.log";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("failed to load configuration")?;

    // The terminal belongs to the sign, so logs go to a file.
    if let Err(e) = init_logging() {
        eprintln!("headway: logging disabled: {e:#}");
    }

    let source = match Source::from_config(&config.feed) {
        Ok(source) => Some(source),
        Err(headway_feed::Error::NoSource) => {
            info!("no feed configured, showing the demo screen");
            None
        }
        Err(e) => return Err(e).context("failed to set up the feed"),
    };

    let cache = match PayloadCache::new() {
        Ok(cache) => Some(cache),
        Err(e) => {
            warn!(error = %e, "payload cache unavailable");
            None
        }
    };

    let mut app = App::new(initial_screen(source.as_ref(), cache.as_ref()), &config);

    // Dropping the handle stops the poller, whichever way `run` returns.
    let feed = source.map(|source| {
        let (tx, events) = tokio::sync::mpsc::unbounded_channel();
        let poller = Poller::spawn(source, schedule(&config.polling), cache, tx);
        FeedHandle { poller, events }
    });

    // Install panic hook to restore terminal on panic
    terminal::install_panic_hook();

    let mut terminal = terminal::setup_terminal()?;

    let result = app.run(&mut terminal, feed).await;

    // Always restore terminal, even if app.run() failed
    terminal::restore_terminal(&mut terminal)?;

    result
}

/// Installs a file logger filtered by `HEADWAY_LOG`, `info` by default.
fn init_logging() -> anyhow::Result<()> {
    let dir = persistence::user_data_dir()?;
    fs::create_dir_all(&dir).with_context(|| format!("failed to create {}", dir.display()))?;
    let file = File::options()
        .create(true)
        .append(true)
        .open(dir.join(LOG_FILE))
        .context("failed to open log file")?;

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))?;
    Ok(())
}

/// Picks what to show before the first fetch completes.
///
/// Without a feed this is the demo screen. With one, the last cached payload
/// for the screen is shown if there is one, otherwise an empty screen.
fn initial_screen(source: Option<&Source>, cache: Option<&PayloadCache>) -> ScreenData {
    let Some(source) = source else {
        return dummy_screen();
    };
    let key = source.cache_key();

    if let Some(cache) = cache {
        match cache.load(&key) {
            Ok(Some(cached)) => {
                info!(age_secs = cached.age().as_secs(), "showing cached screen");
                return cached.screen;
            }
            Ok(None) => {}
            Err(e) => warn!(error = %e, "ignoring unreadable cache"),
        }
    }

    ScreenData {
        screen_id: source.screen_id().unwrap_or(&key).to_string(),
        fetched_at: None,
        header: HeaderData {
            title: "Waiting for departures".to_string(),
            title_abbrev: Some("Waiting".to_string()),
        },
        widgets: Vec::new(),
    }
}

/// Builds the poll schedule from the polling configuration.
fn schedule(polling: &PollingConfig) -> Schedule {
    Schedule {
        interval: polling.interval(),
        max_jitter: polling.max_jitter(),
    }
}
