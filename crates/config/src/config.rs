//! Core configuration struct and loading logic.
//!
//! This module provides the main [`Config`] struct which aggregates all
//! configuration options for the headway sign.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::carousel::{CarouselConfig, ErrorReportConfig};
use crate::error::Result;
use crate::feed::FeedConfig;
use crate::persistence::{find_config_file, read_config_file, write_config_file};
use crate::polling::PollingConfig;

/// Environment variable overriding [`FeedConfig::base_url`].
pub const ENV_BASE_URL: &str = "HEADWAY_BASE_URL";

/// Environment variable overriding [`FeedConfig::screen_id`].
pub const ENV_SCREEN_ID: &str = "HEADWAY_SCREEN_ID";

/// Environment variable overriding [`FeedConfig::api_key`].
pub const ENV_API_KEY: &str = "HEADWAY_API_KEY";

/// The main configuration struct for the headway sign.
///
/// # Examples
///
/// ```
/// use headway_config::{Config, FeedConfig, PollingConfig};
///
/// let config = Config::default();
/// assert!(!config.feed.is_configured());
///
/// let config = Config {
///     feed: FeedConfig::http("https://screens.example.com", "bus-stop-1"),
///     polling: PollingConfig::with_interval(30),
///     ..Default::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Where the screen payload comes from.
    #[serde(default)]
    pub feed: FeedConfig,

    /// How often the payload is refreshed.
    #[serde(default)]
    pub polling: PollingConfig,

    /// Timing of paged content.
    #[serde(default)]
    pub carousel: CarouselConfig,

    /// Rate limiting of error reports.
    #[serde(default)]
    pub errors: ErrorReportConfig,
}

impl Config {
    /// Creates a new default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from the default file locations, then applies
    /// `HEADWAY_*` environment overrides.
    ///
    /// If no configuration file is found, the defaults are used.
    ///
    /// # Errors
    ///
    /// Returns an error if a configuration file is found but cannot be
    /// read or parsed, or if the result fails validation.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use headway_config::Config;
    ///
    /// # fn example() -> headway_config::Result<()> {
    /// let config = Config::load()?;
    /// println!("Poll every {} seconds", config.polling.interval_secs);
    /// # Ok(())
    /// # }
    /// ```
    pub fn load() -> Result<Self> {
        let mut config = match find_config_file() {
            Some(path) => read_config_file(&path)?,
            None => Self::default(),
        };
        config.apply_env(|name| std::env::var(name).ok());
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a specific file.
    ///
    /// Environment overrides are not applied.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if the
    /// result fails validation.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let config: Config = read_config_file(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Saves the configuration to a file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<()> {
        write_config_file(path, self)
    }

    /// Applies feed overrides looked up through `var`.
    ///
    /// Empty values are ignored.
    ///
    /// # Examples
    ///
    /// ```
    /// use headway_config::Config;
    ///
    /// let mut config = Config::default();
    /// config.apply_env(|name| (name == "HEADWAY_SCREEN_ID").then(|| "stop-7".to_string()));
    /// assert_eq!(config.feed.screen_id.as_deref(), Some("stop-7"));
    /// ```
    pub fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        let lookup = |name: &str| var(name).filter(|value| !value.is_empty());

        if let Some(url) = lookup(ENV_BASE_URL) {
            self.feed.base_url = Some(url);
            self.feed.file = None;
        }
        if let Some(id) = lookup(ENV_SCREEN_ID) {
            self.feed.screen_id = Some(id);
        }
        if let Some(key) = lookup(ENV_API_KEY) {
            self.feed.api_key = Some(key);
        }
    }

    /// Validates every section of the configuration.
    ///
    /// # Errors
    ///
    /// Returns the first validation error found.
    pub fn validate(&self) -> Result<()> {
        self.feed.validate()?;
        self.polling.validate()?;
        self.carousel.validate()?;
        self.errors.validate()?;
        Ok(())
    }
}
