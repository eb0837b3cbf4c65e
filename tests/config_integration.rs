//! Integration tests for the headway-config crate.

use std::fs;
use std::time::Duration;

use headway_config::{CarouselConfig, Config, ConfigError, FeedConfig, PollingConfig};
use tempfile::TempDir;

#[test]
fn config_load_from_json5_file() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("headway.json5");

    fs::write(
        &config_path,
        r#"
        {
            // Busway sign at Harvard
            feed: {
                base_url: "https://screens.example.com/",
                screen_id: "bus-eink-harvard",
                api_key: "k-123",
            },
            polling: {
                interval_secs: 30,
                jitter: false,
            },
            carousel: {
                total_cycle_ms: 20000,
            },
            errors: { ttl_secs: 120 },
        }
        "#,
    )
    .unwrap();

    let config = Config::load_from(&config_path).unwrap();

    assert_eq!(config.feed.screen_id.as_deref(), Some("bus-eink-harvard"));
    assert_eq!(config.feed.api_key.as_deref(), Some("k-123"));
    assert_eq!(config.polling.interval(), Duration::from_secs(30));
    assert_eq!(config.polling.max_jitter(), Duration::ZERO);
    assert_eq!(config.carousel.total_cycle(), Duration::from_secs(20));
    assert_eq!(
        config.carousel.max_page_duration(),
        CarouselConfig::default().max_page_duration()
    );
    assert_eq!(config.errors.ttl(), Duration::from_secs(120));
}

#[test]
fn plain_json_loads_too() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("headway.json");
    fs::write(&config_path, r#"{"feed": {"file": "/srv/screen.json"}}"#).unwrap();

    let config = Config::load_from(&config_path).unwrap();
    assert_eq!(config.feed, FeedConfig::file("/srv/screen.json"));
    assert_eq!(config.polling, PollingConfig::default());
}

#[test]
fn config_save_and_reload() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("config.json");

    let original = Config {
        feed: FeedConfig::http("https://screens.example.com", "stop-7"),
        polling: PollingConfig::with_interval(60),
        carousel: CarouselConfig {
            page_interval_ms: 5000,
            ..CarouselConfig::default()
        },
        ..Config::default()
    };

    original.save_to(&config_path).unwrap();
    let loaded = Config::load_from(&config_path).unwrap();
    assert_eq!(loaded, original);

    // Saved as plain JSON.
    let content = fs::read_to_string(&config_path).unwrap();
    assert!(content.contains("\"screen_id\": \"stop-7\""));
}

#[test]
fn config_rejects_bad_carousel() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("headway.json5");
    fs::write(&config_path, "{ carousel: { max_page_duration_ms: 10 } }").unwrap();

    assert!(matches!(
        Config::load_from(&config_path),
        Err(ConfigError::InvalidCarousel { .. })
    ));
}

#[test]
fn config_rejects_malformed_file() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("headway.json5");
    fs::write(&config_path, "{ polling: ").unwrap();

    assert!(Config::load_from(&config_path).is_err());
}

#[test]
fn missing_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    assert!(Config::load_from(dir.path().join("absent.json5")).is_err());
}
