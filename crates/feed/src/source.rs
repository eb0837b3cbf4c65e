//! Payload sources.
//!
//! A [`Source`] is where the poller gets each payload from: the screens API,
//! a local JSON file (handy for kiosks fed by another process), or a fixed
//! in-memory payload.

use std::path::PathBuf;

use headway_config::FeedConfig;
use headway_protocol::ScreenData;
use secrecy::SecretString;
use tracing::{debug, instrument};

use crate::client::FeedClient;
use crate::error::{Error, Result};

/// Where screen payloads come from.
#[derive(Debug, Clone)]
pub enum Source {
    /// The screens HTTP API.
    Http {
        /// The API client.
        client: FeedClient,
        /// The screen to fetch.
        screen_id: String,
    },
    /// A JSON file, re-read on every fetch.
    File(PathBuf),
    /// A fixed payload.
    Static(Box<ScreenData>),
}

impl Source {
    /// Builds a source from the feed configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoSource`] if neither a URL with a screen id nor a
    /// file is configured, and [`Error::Http`] if the client cannot be built.
    ///
    /// # Examples
    ///
    /// ```
    /// use headway_config::FeedConfig;
    /// use headway_feed::{Error, Source};
    ///
    /// let source = Source::from_config(&FeedConfig::file("screen.json")).unwrap();
    /// assert!(matches!(source, Source::File(_)));
    ///
    /// assert!(matches!(Source::from_config(&FeedConfig::default()), Err(Error::NoSource)));
    /// ```
    pub fn from_config(config: &FeedConfig) -> Result<Self> {
        if let Some(path) = &config.file {
            return Ok(Self::File(path.clone()));
        }
        match (&config.base_url, &config.screen_id) {
            (Some(base_url), Some(screen_id)) => {
                let api_key = config.api_key.clone().map(SecretString::from);
                Ok(Self::Http {
                    client: FeedClient::new(base_url.as_str(), api_key)?,
                    screen_id: screen_id.clone(),
                })
            }
            _ => Err(Error::NoSource),
        }
    }

    /// Returns the screen id this source serves, when known up front.
    #[must_use]
    pub fn screen_id(&self) -> Option<&str> {
        match self {
            Self::Http { screen_id, .. } => Some(screen_id),
            Self::File(_) => None,
            Self::Static(screen) => Some(&screen.screen_id),
        }
    }

    /// Returns the key payloads from this source are cached under.
    ///
    /// File sources have no screen id until read, so they are keyed by file
    /// name.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::path::PathBuf;
    /// use headway_feed::Source;
    ///
    /// let source = Source::File(PathBuf::from("/srv/signs/lobby.json"));
    /// assert_eq!(source.cache_key(), "lobby");
    /// ```
    #[must_use]
    pub fn cache_key(&self) -> String {
        match self {
            Self::File(path) => path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_default(),
            _ => self.screen_id().unwrap_or_default().to_string(),
        }
    }

    /// Fetches one payload.
    ///
    /// # Errors
    ///
    /// Returns the transport, I/O, or decode error of the underlying source.
    #[instrument(skip(self))]
    pub async fn fetch(&self) -> Result<ScreenData> {
        match self {
            Self::Http { client, screen_id } => client.fetch_screen(screen_id).await,
            Self::File(path) => {
                let content = tokio::fs::read_to_string(path).await?;
                let screen = ScreenData::from_json(&content)?;
                debug!(?path, widgets = screen.widgets.len(), "read screen file");
                Ok(screen)
            }
            Self::Static(screen) => Ok(screen.as_ref().clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use headway_protocol::dummy::dummy_screen;
    use tempfile::TempDir;

    #[test]
    fn from_config_http() {
        let config = FeedConfig::http("https://screens.example.com", "stop-1");
        let source = Source::from_config(&config).unwrap();
        assert_eq!(source.screen_id(), Some("stop-1"));
    }

    #[test]
    fn from_config_without_screen_id() {
        let config = FeedConfig {
            screen_id: None,
            ..FeedConfig::http("https://screens.example.com", "stop-1")
        };
        assert!(matches!(Source::from_config(&config), Err(Error::NoSource)));
    }

    #[test]
    fn cache_key_is_stable_for_each_source() {
        let http = Source::from_config(&FeedConfig::http("https://screens.example.com", "stop-1")).unwrap();
        assert_eq!(http.cache_key(), "stop-1");

        // The key does not depend on the screen id inside the file.
        let file = Source::File(PathBuf::from("/srv/signs/lobby.json"));
        assert_eq!(file.cache_key(), "lobby");

        let fixed = Source::Static(Box::new(dummy_screen()));
        assert_eq!(fixed.cache_key(), dummy_screen().screen_id);
    }

    #[tokio::test]
    async fn file_source_reads_payload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("screen.json");
        let screen = dummy_screen();
        std::fs::write(&path, screen.to_json().unwrap()).unwrap();

        let fetched = Source::File(path).fetch().await.unwrap();
        assert_eq!(fetched, screen);
    }

    #[tokio::test]
    async fn file_source_reports_decode_errors() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("screen.json");
        std::fs::write(&path, r#"{"screen_id": 7}"#).unwrap();

        let err = Source::File(path).fetch().await.unwrap_err();
        assert_eq!(err.signature(), "decode");
    }

    #[tokio::test]
    async fn missing_file_is_io_error() {
        let err = Source::File(PathBuf::from("/nonexistent/screen.json"))
            .fetch()
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
