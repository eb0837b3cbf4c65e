//! Screen feed source configuration.
//!
//! A sign reads its payload either from the screens HTTP API or from a local
//! JSON file. With neither configured the sign shows built-in sample data.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Where the screen payload comes from.
///
/// # Examples
///
/// ```
/// use headway_config::FeedConfig;
///
/// let feed = FeedConfig::http("https://screens.example.com", "bus-stop-1");
/// assert!(feed.validate().is_ok());
///
/// let feed = FeedConfig { screen_id: None, ..feed };
/// assert!(feed.validate().is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Base URL of the screens API, e.g. `https://screens.example.com`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Identifier of the screen to fetch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screen_id: Option<String>,

    /// Local payload file, read on every poll instead of the API.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,

    /// API key sent with every request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

impl FeedConfig {
    /// Creates an HTTP feed for `screen_id` at `base_url`.
    #[must_use]
    pub fn http(base_url: impl Into<String>, screen_id: impl Into<String>) -> Self {
        Self {
            base_url: Some(base_url.into()),
            screen_id: Some(screen_id.into()),
            ..Self::default()
        }
    }

    /// Creates a feed that reads a local file.
    #[must_use]
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            file: Some(path.into()),
            ..Self::default()
        }
    }

    /// Returns `true` if any source is configured.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.base_url.is_some() || self.file.is_some()
    }

    /// Validates the feed source.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidFeed`] if both a URL and a file are set,
    /// if a URL is set without a screen id, or if the URL is not HTTP(S).
    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: &str| ConfigError::InvalidFeed {
            reason: reason.to_string(),
        };

        match (&self.base_url, &self.file) {
            (Some(_), Some(_)) => Err(invalid("set either base_url or file, not both")),
            (Some(url), None) => {
                if !(url.starts_with("http://") || url.starts_with("https://")) {
                    return Err(invalid("base_url must start with http:// or https://"));
                }
                if self.screen_id.as_deref().is_none_or(str::is_empty) {
                    return Err(invalid("screen_id is required with base_url"));
                }
                Ok(())
            }
            (None, _) => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_feed_is_valid() {
        let feed = FeedConfig::default();
        assert!(!feed.is_configured());
        assert!(feed.validate().is_ok());
    }

    #[test]
    fn file_feed_is_valid() {
        let feed = FeedConfig::file("screen.json");
        assert!(feed.is_configured());
        assert!(feed.validate().is_ok());
    }

    #[test]
    fn ambiguous_feed_is_rejected() {
        let feed = FeedConfig {
            file: Some("screen.json".into()),
            ..FeedConfig::http("https://example.com", "s")
        };
        assert!(matches!(feed.validate(), Err(ConfigError::InvalidFeed { .. })));
    }

    #[test]
    fn non_http_url_is_rejected() {
        let feed = FeedConfig::http("ftp://example.com", "s");
        assert!(feed.validate().is_err());
    }

    #[test]
    fn api_key_not_serialized_when_none() {
        let json = serde_json::to_string(&FeedConfig::http("https://example.com", "s")).unwrap();
        assert!(!json.contains("api_key"));
    }
}
