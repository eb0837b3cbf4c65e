//! Paging cadence and error reporting configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Default time per page of a fixed-cadence carousel (8 seconds).
pub const DEFAULT_PAGE_INTERVAL_MS: u64 = 8_000;

/// Default ceiling on how long one page is shown (10 seconds).
pub const DEFAULT_MAX_PAGE_DURATION_MS: u64 = 10_000;

/// Default time for a full pass over all pages (30 seconds).
pub const DEFAULT_TOTAL_CYCLE_MS: u64 = 30_000;

/// Shortest allowed page ceiling (1 second).
pub const MIN_PAGE_DURATION_MS: u64 = 1_000;

/// Timing of paged content.
///
/// Carousels that page a variable number of pages show each page for
/// `min(max_page_duration, total_cycle / pages)`. Alerts page at the fixed
/// `page_interval`.
///
/// # Examples
///
/// ```
/// use headway_config::CarouselConfig;
///
/// let config = CarouselConfig::default();
/// assert_eq!(config.max_page_duration().as_secs(), 10);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarouselConfig {
    /// Time per page for fixed-cadence carousels, in milliseconds.
    #[serde(default = "default_page_interval")]
    pub page_interval_ms: u64,

    /// Ceiling on how long any one page is shown, in milliseconds.
    #[serde(default = "default_max_page_duration")]
    pub max_page_duration_ms: u64,

    /// Time for a full pass over all pages, in milliseconds.
    #[serde(default = "default_total_cycle")]
    pub total_cycle_ms: u64,
}

fn default_page_interval() -> u64 {
    DEFAULT_PAGE_INTERVAL_MS
}

fn default_max_page_duration() -> u64 {
    DEFAULT_MAX_PAGE_DURATION_MS
}

fn default_total_cycle() -> u64 {
    DEFAULT_TOTAL_CYCLE_MS
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            page_interval_ms: DEFAULT_PAGE_INTERVAL_MS,
            max_page_duration_ms: DEFAULT_MAX_PAGE_DURATION_MS,
            total_cycle_ms: DEFAULT_TOTAL_CYCLE_MS,
        }
    }
}

impl CarouselConfig {
    /// Returns the fixed page interval.
    #[must_use]
    pub fn page_interval(&self) -> Duration {
        Duration::from_millis(self.page_interval_ms)
    }

    /// Returns the page duration ceiling.
    #[must_use]
    pub fn max_page_duration(&self) -> Duration {
        Duration::from_millis(self.max_page_duration_ms)
    }

    /// Returns the full cycle duration.
    #[must_use]
    pub fn total_cycle(&self) -> Duration {
        Duration::from_millis(self.total_cycle_ms)
    }

    /// Validates the carousel timing.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidCarousel`] if any duration is zero or
    /// the page ceiling is below one second.
    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: String| Err(ConfigError::InvalidCarousel { reason });

        if self.page_interval_ms == 0 {
            return invalid("page_interval_ms must be positive".to_string());
        }
        if self.total_cycle_ms == 0 {
            return invalid("total_cycle_ms must be positive".to_string());
        }
        if self.max_page_duration_ms < MIN_PAGE_DURATION_MS {
            return invalid(format!(
                "max_page_duration_ms {} is below {MIN_PAGE_DURATION_MS}",
                self.max_page_duration_ms
            ));
        }
        Ok(())
    }
}

/// Default window in which repeated errors are reported once (1 minute).
pub const DEFAULT_ERROR_TTL_SECS: u64 = 60;

/// Rate limiting of error reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorReportConfig {
    /// Seconds during which an error with the same signature is reported at
    /// most once.
    #[serde(default = "default_error_ttl")]
    pub ttl_secs: u64,
}

fn default_error_ttl() -> u64 {
    DEFAULT_ERROR_TTL_SECS
}

impl Default for ErrorReportConfig {
    fn default() -> Self {
        Self {
            ttl_secs: DEFAULT_ERROR_TTL_SECS,
        }
    }
}

impl ErrorReportConfig {
    /// Returns the report window.
    #[must_use]
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }

    /// Validates the report window.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidErrorTtl`] if the window is zero.
    pub fn validate(&self) -> Result<()> {
        if self.ttl_secs == 0 {
            return Err(ConfigError::InvalidErrorTtl);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(CarouselConfig::default().validate().is_ok());
        assert!(ErrorReportConfig::default().validate().is_ok());
    }

    #[test]
    fn short_page_ceiling_rejected() {
        let config = CarouselConfig {
            max_page_duration_ms: 999,
            ..CarouselConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidCarousel { .. })
        ));
    }

    #[test]
    fn zero_durations_rejected() {
        let config = CarouselConfig {
            total_cycle_ms: 0,
            ..CarouselConfig::default()
        };
        assert!(config.validate().is_err());

        let config = CarouselConfig {
            page_interval_ms: 0,
            ..CarouselConfig::default()
        };
        assert!(config.validate().is_err());

        assert!(ErrorReportConfig { ttl_secs: 0 }.validate().is_err());
    }

    #[test]
    fn deserialize_partial() {
        let config: CarouselConfig = serde_json::from_str(r#"{"total_cycle_ms": 12000}"#).unwrap();
        assert_eq!(config.total_cycle().as_secs(), 12);
        assert_eq!(config.page_interval_ms, DEFAULT_PAGE_INTERVAL_MS);
    }
}
