//! Payload refresh interval configuration.
//!
//! The sign polls its screen endpoint on a fixed cadence. Every successful
//! poll starts a new data epoch, which restarts fitting for the whole screen,
//! so the interval trades freshness of predictions against layout churn.
//!
//! When `jitter` is enabled each wait is stretched by up to a tenth of the
//! interval, so a fleet of signs restarted together does not poll in lockstep.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default polling interval (15 seconds).
pub const DEFAULT_POLLING_INTERVAL: u32 = 15;

/// Minimum allowed polling interval (5 seconds).
pub const MIN_POLLING_INTERVAL: u32 = 5;

/// Maximum allowed polling interval (5 minutes).
pub const MAX_POLLING_INTERVAL: u32 = 300;

/// Configuration for polling behavior.
///
/// # Examples
///
/// ```
/// use headway_config::PollingConfig;
///
/// let config = PollingConfig::default();
/// assert_eq!(config.interval_secs, 15);
/// assert!(config.jitter);
///
/// let config = PollingConfig::fixed(30);
/// assert_eq!(config.interval().as_secs(), 30);
/// assert!(!config.jitter);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollingConfig {
    /// The polling interval in seconds.
    #[serde(default = "default_interval")]
    pub interval_secs: u32,

    /// Whether to spread polls with a small random delay.
    #[serde(default = "default_jitter")]
    pub jitter: bool,
}

fn default_interval() -> u32 {
    DEFAULT_POLLING_INTERVAL
}

fn default_jitter() -> bool {
    true
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval_secs: DEFAULT_POLLING_INTERVAL,
            jitter: true,
        }
    }
}

impl PollingConfig {
    /// Creates a polling configuration with the given interval and jitter.
    ///
    /// # Examples
    ///
    /// ```
    /// use headway_config::PollingConfig;
    ///
    /// let config = PollingConfig::with_interval(30);
    /// assert_eq!(config.interval_secs, 30);
    /// assert!(config.jitter);
    /// ```
    #[must_use]
    pub fn with_interval(interval_secs: u32) -> Self {
        Self {
            interval_secs,
            jitter: true,
        }
    }

    /// Creates a polling configuration without jitter.
    #[must_use]
    pub fn fixed(interval_secs: u32) -> Self {
        Self {
            interval_secs,
            jitter: false,
        }
    }

    /// Returns the interval as a [`Duration`].
    #[must_use]
    pub fn interval(&self) -> Duration {
        Duration::from_secs(u64::from(self.interval_secs))
    }

    /// Returns the largest extra delay jitter may add to one wait.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::time::Duration;
    /// use headway_config::PollingConfig;
    ///
    /// assert_eq!(PollingConfig::with_interval(20).max_jitter(), Duration::from_secs(2));
    /// assert_eq!(PollingConfig::fixed(20).max_jitter(), Duration::ZERO);
    /// ```
    #[must_use]
    pub fn max_jitter(&self) -> Duration {
        if self.jitter {
            self.interval() / 10
        } else {
            Duration::ZERO
        }
    }

    /// Validates the polling configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPollingInterval`](crate::ConfigError::InvalidPollingInterval)
    /// if the interval is outside
    /// [`MIN_POLLING_INTERVAL`]`..=`[`MAX_POLLING_INTERVAL`] seconds.
    ///
    /// # Examples
    ///
    /// ```
    /// use headway_config::PollingConfig;
    ///
    /// assert!(PollingConfig::with_interval(15).validate().is_ok());
    /// assert!(PollingConfig::with_interval(1).validate().is_err());
    /// assert!(PollingConfig::with_interval(600).validate().is_err());
    /// ```
    pub fn validate(&self) -> crate::Result<()> {
        if !(MIN_POLLING_INTERVAL..=MAX_POLLING_INTERVAL).contains(&self.interval_secs) {
            return Err(crate::ConfigError::InvalidPollingInterval {
                reason: format!(
                    "interval {} is outside {MIN_POLLING_INTERVAL}..={MAX_POLLING_INTERVAL} seconds",
                    self.interval_secs
                ),
            });
        }
        Ok(())
    }
}
