//! Last-good payload cache.
//!
//! A sign that restarts while its network is down should still show the
//! last departures it knew about. Every successful fetch is stored as JSON
//! in the user data directory and read back on startup.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.local/share/headway/       # Linux
//! └── cache/
//!     └── screens/
//!         └── {screen_id}.json
//! ```

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, Utc};
use headway_protocol::ScreenData;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::error::{Error, Result};

/// A cached payload with the time it was stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedScreen {
    /// The payload.
    pub screen: ScreenData,
    /// When the payload was cached.
    pub cached_at: DateTime<Utc>,
}

impl CachedScreen {
    /// Wraps `screen` with the current timestamp.
    #[must_use]
    pub fn new(screen: ScreenData) -> Self {
        Self {
            screen,
            cached_at: Utc::now(),
        }
    }

    /// Returns the age of the cached payload.
    ///
    /// A timestamp in the future (clock skew) counts as zero age.
    #[must_use]
    pub fn age(&self) -> Duration {
        Utc::now()
            .signed_duration_since(self.cached_at)
            .to_std()
            .unwrap_or(Duration::ZERO)
    }

    /// Returns whether the payload is older than `max_age`.
    #[must_use]
    pub fn is_older_than(&self, max_age: Duration) -> bool {
        self.age() > max_age
    }
}

/// On-disk cache of the last good payload per screen.
///
/// # Examples
///
/// ```no_run
/// use headway_feed::PayloadCache;
///
/// # fn example() -> headway_feed::Result<()> {
/// let cache = PayloadCache::new()?;
/// if let Some(cached) = cache.load("bus-stop-1")? {
///     println!("cached {} seconds ago", cached.age().as_secs());
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct PayloadCache {
    base_path: PathBuf,
}

impl PayloadCache {
    /// Creates a cache in the user data directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the data directory cannot be determined or
    /// created.
    #[instrument]
    pub fn new() -> Result<Self> {
        let data_dir = headway_config::persistence::user_data_dir().map_err(|e| {
            Error::Io(std::io::Error::new(std::io::ErrorKind::NotFound, e.to_string()))
        })?;
        Self::with_path(data_dir.join("cache").join("screens"))
    }

    /// Creates a cache at a custom path, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    #[instrument]
    pub fn with_path(base_path: PathBuf) -> Result<Self> {
        if !base_path.exists() {
            debug!(?base_path, "creating cache directory");
            fs::create_dir_all(&base_path)?;
        }
        Ok(Self { base_path })
    }

    /// Loads the payload cached under `key`, usually a
    /// [`Source::cache_key`](crate::Source::cache_key).
    ///
    /// Returns `None` if nothing is cached.
    ///
    /// # Errors
    ///
    /// Returns an error if the cache file exists but cannot be read or
    /// parsed.
    #[instrument(skip(self))]
    pub fn load(&self, key: &str) -> Result<Option<CachedScreen>> {
        let path = self.cache_path(key);
        match fs::read_to_string(&path) {
            Ok(content) => {
                let cached: CachedScreen = serde_json::from_str(&content).map_err(|e| {
                    warn!(?path, error = %e, "failed to parse cache file");
                    Error::Io(std::io::Error::new(
                        std::io::ErrorKind::InvalidData,
                        format!("failed to parse cache file: {e}"),
                    ))
                })?;
                debug!(cached_at = %cached.cached_at, "loaded cached screen");
                Ok(Some(cached))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => {
                warn!(?path, error = %e, "failed to read cache file");
                Err(Error::Io(e))
            }
        }
    }

    /// Stores `screen` as the last good payload under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the cache file cannot be written.
    #[instrument(skip(self, screen), fields(screen_id = %screen.screen_id))]
    pub fn save(&self, key: &str, screen: &ScreenData) -> Result<()> {
        let path = self.cache_path(key);
        let cached = CachedScreen::new(screen.clone());
        let content = serde_json::to_string_pretty(&cached).map_err(|e| {
            Error::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("failed to serialize cache: {e}"),
            ))
        })?;

        fs::write(&path, content)?;
        debug!(?path, "cached screen");
        Ok(())
    }

    /// Returns the cache file path for a screen, with path separators and
    /// dots replaced so the id cannot escape the cache directory.
    fn cache_path(&self, screen_id: &str) -> PathBuf {
        let safe_id = screen_id.replace(['/', '\\', '.'], "_");
        self.base_path.join(format!("{safe_id}.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use headway_protocol::dummy::dummy_screen;
    use tempfile::TempDir;

    fn create_test_cache() -> (PayloadCache, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let cache =
            PayloadCache::with_path(temp_dir.path().join("screens")).expect("Failed to create cache");
        (cache, temp_dir)
    }

    #[test]
    fn cache_path_sanitizes_input() {
        let (cache, _temp) = create_test_cache();
        assert!(cache.cache_path("stop-1").ends_with("stop-1.json"));
        assert!(cache.cache_path("../evil").ends_with("___evil.json"));
    }

    #[test]
    fn load_returns_none_for_missing_cache() {
        let (cache, _temp) = create_test_cache();
        assert!(cache.load("missing").unwrap().is_none());
    }

    #[test]
    fn save_and_load_roundtrip() {
        let (cache, _temp) = create_test_cache();
        let screen = dummy_screen();

        cache.save(&screen.screen_id, &screen).unwrap();
        let cached = cache.load(&screen.screen_id).unwrap().unwrap();
        assert_eq!(cached.screen, screen);
        assert!(!cached.is_older_than(Duration::from_secs(60)));
    }

    #[test]
    fn corrupt_cache_is_an_error() {
        let (cache, _temp) = create_test_cache();
        fs::write(cache.cache_path("bad"), "{").unwrap();
        assert!(matches!(cache.load("bad"), Err(Error::Io(_))));
    }

    #[test]
    fn future_timestamp_has_zero_age() {
        let cached = CachedScreen {
            screen: dummy_screen(),
            cached_at: Utc::now() + chrono::Duration::hours(1),
        };
        assert_eq!(cached.age(), Duration::ZERO);
    }
}
