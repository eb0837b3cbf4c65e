//! Screens API client implementation.
//!
//! This module provides the [`FeedClient`] struct, which fetches screen
//! payloads over HTTP.

use std::time::Duration;

use chrono::Utc;
use headway_protocol::ScreenData;
use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, instrument, warn};

use crate::error::{Error, Result};

/// Header carrying the API key.
const API_KEY_HEADER: &str = "x-api-key";

/// Per-request timeout. A sign must not hang on a stalled connection.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Screens API client with an optional API key.
///
/// # Security
///
/// The API key is stored as a [`SecretString`] so it never shows up in
/// debug output or logs.
///
/// # Examples
///
/// ```no_run
/// use headway_feed::FeedClient;
///
/// # async fn example() -> headway_feed::Result<()> {
/// let client = FeedClient::new("https://screens.example.com", None)?;
/// let screen = client.fetch_screen("bus-stop-1").await?;
/// println!("{} widgets", screen.widgets.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct FeedClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<SecretString>,
}

impl FeedClient {
    /// Creates a client for the API at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Http`] if the HTTP client cannot be built.
    #[instrument(skip_all, fields(authenticated = api_key.is_some()))]
    pub fn new(base_url: impl Into<String>, api_key: Option<SecretString>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("headway/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let base_url = base_url.into().trim_end_matches('/').to_string();
        debug!(%base_url, "created feed client");
        Ok(Self {
            http,
            base_url,
            api_key,
        })
    }

    /// Returns whether requests carry an API key.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.api_key.is_some()
    }

    /// Returns the payload URL for `screen_id`.
    ///
    /// # Examples
    ///
    /// ```
    /// use headway_feed::FeedClient;
    ///
    /// let client = FeedClient::new("https://screens.example.com/", None).unwrap();
    /// assert_eq!(
    ///     client.screen_url("stop 7"),
    ///     "https://screens.example.com/v2/api/screen/stop%207"
    /// );
    /// ```
    #[must_use]
    pub fn screen_url(&self, screen_id: &str) -> String {
        let encoded = utf8_percent_encode(screen_id, NON_ALPHANUMERIC);
        format!("{}/v2/api/screen/{encoded}", self.base_url)
    }

    /// Fetches and validates the payload for `screen_id`.
    ///
    /// Payloads without a server timestamp are stamped with the time of
    /// receipt.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Http`] on transport failures, [`Error::Status`] for
    /// non-success responses, and [`Error::Decode`] if the body is not a
    /// valid screen payload.
    #[instrument(skip(self))]
    pub async fn fetch_screen(&self, screen_id: &str) -> Result<ScreenData> {
        let url = self.screen_url(screen_id);
        let mut request = self.http.get(&url);
        if let Some(key) = &self.api_key {
            request = request.header(API_KEY_HEADER, key.expose_secret());
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            warn!(%url, %status, "screen request failed");
            return Err(Error::Status {
                status: status.as_u16(),
                url,
            });
        }

        let body = response.text().await?;
        let mut screen = ScreenData::from_json(&body)?;
        screen.fetched_at.get_or_insert_with(Utc::now);
        debug!(widgets = screen.widgets.len(), "fetched screen");
        Ok(screen)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_trimmed() {
        let client = FeedClient::new("https://example.com///", None).unwrap();
        assert_eq!(client.screen_url("a"), "https://example.com/v2/api/screen/a");
    }

    #[test]
    fn screen_id_is_encoded() {
        let client = FeedClient::new("https://example.com", None).unwrap();
        assert_eq!(
            client.screen_url("../admin"),
            "https://example.com/v2/api/screen/%2E%2E%2Fadmin"
        );
    }

    #[test]
    fn api_key_not_in_debug_output() {
        let client = FeedClient::new(
            "https://example.com",
            Some(SecretString::from("hunter2".to_string())),
        )
        .unwrap();
        assert!(client.is_authenticated());
        assert!(!format!("{client:?}").contains("hunter2"));
    }
}
