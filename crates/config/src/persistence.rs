//! Configuration file reading and writing.
//!
//! Configuration is read as JSON5 (a superset of JSON, so plain `.json`
//! files load too) and written back as pretty-printed JSON.
//!
//! # File Locations
//!
//! Configuration is searched in the following order:
//!
//! 1. Working directory: `./headway.json5` or `./headway.json`
//! 2. User config: `<config_dir>/headway/config.json5` or `config.json`
//!
//! Runtime state that is not configuration (the payload cache and the log
//! file) lives under [`user_data_dir`].

use std::path::{Path, PathBuf};

use crate::error::{ConfigError, Result};

/// Configuration file names in the working directory, in priority order.
const CONFIG_FILE_NAMES: &[&str] = &["headway.json5", "headway.json"];

/// Directory name under the platform config and data directories.
const APP_DIR: &str = "headway";

/// User config file names, in priority order.
const USER_CONFIG_FILE_NAMES: &[&str] = &["config.json5", "config.json"];

/// Finds the configuration file path.
///
/// Returns `Some(path)` for the first existing candidate, `None` if there is
/// none.
///
/// # Examples
///
/// ```no_run
/// use headway_config::persistence::find_config_file;
///
/// if let Some(path) = find_config_file() {
///     println!("Found config at: {}", path.display());
/// }
/// ```
#[must_use]
pub fn find_config_file() -> Option<PathBuf> {
    let local = CONFIG_FILE_NAMES.iter().map(PathBuf::from);
    let user = dirs::config_dir()
        .map(|dir| dir.join(APP_DIR))
        .into_iter()
        .flat_map(|dir| USER_CONFIG_FILE_NAMES.iter().map(move |name| dir.join(name)));

    local.chain(user).find(|path| path.exists())
}

/// Returns the user configuration directory, typically
/// `~/.config/headway/` on Linux.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformDirectory`] if the platform config
/// directory cannot be determined.
///
/// # Examples
///
/// ```no_run
/// use headway_config::persistence::user_config_dir;
///
/// let dir = user_config_dir().expect("no config directory");
/// println!("Put config.json5 in {}", dir.display());
/// ```
pub fn user_config_dir() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|d| d.join(APP_DIR))
        .ok_or(ConfigError::NoPlatformDirectory("config"))
}

/// Returns the user data directory, typically `~/.local/share/headway/` on
/// Linux.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformDirectory`] if the platform data
/// directory cannot be determined.
///
/// # Examples
///
/// ```no_run
/// use headway_config::persistence::user_data_dir;
///
/// let log = user_data_dir().expect("no data directory").join("headway.log");
/// println!("Logging to {}", log.display());
/// ```
pub fn user_data_dir() -> Result<PathBuf> {
    dirs::data_dir()
        .map(|d| d.join(APP_DIR))
        .ok_or(ConfigError::NoPlatformDirectory("data"))
}

/// Reads and parses a configuration file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or its content cannot be
/// parsed.
///
/// # Examples
///
/// ```no_run
/// use headway_config::persistence::read_config_file;
/// use headway_config::Config;
///
/// # fn main() -> headway_config::Result<()> {
/// let config: Config = read_config_file("headway.json5")?;
/// # Ok(())
/// # }
/// ```
pub fn read_config_file<T: serde::de::DeserializeOwned>(path: impl AsRef<Path>) -> Result<T> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::File {
        action: "read",
        path: path.to_path_buf(),
        source,
    })?;

    serde_json5::from_str(&content).map_err(ConfigError::from)
}

/// Writes a configuration to a file as pretty-printed JSON, creating parent
/// directories as needed.
///
/// # Errors
///
/// Returns an error if a directory or the file cannot be written, or the
/// configuration cannot be serialized.
///
/// # Examples
///
/// ```no_run
/// use headway_config::persistence::{user_config_dir, write_config_file};
/// use headway_config::Config;
///
/// # fn main() -> headway_config::Result<()> {
/// let path = user_config_dir()?.join("config.json");
/// write_config_file(&path, &Config::default())?;
/// # Ok(())
/// # }
/// ```
pub fn write_config_file<T: serde::Serialize>(path: impl AsRef<Path>, config: &T) -> Result<()> {
    let path = path.as_ref();
    let write_error = |source| ConfigError::File {
        action: "write",
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty() && !p.exists()) {
        std::fs::create_dir_all(parent).map_err(write_error)?;
    }

    let content = serde_json::to_string_pretty(config)?;
    std::fs::write(path, content).map_err(write_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use tempfile::TempDir;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Sample {
        screen: String,
        rows: u32,
    }

    #[test]
    fn read_json5_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sample.json5");
        std::fs::write(
            &path,
            r#"
            {
                // Busway screen
                screen: "harvard",
                rows: 12,
            }
            "#,
        )
        .unwrap();

        let sample: Sample = read_config_file(&path).unwrap();
        assert_eq!(sample.screen, "harvard");
        assert_eq!(sample.rows, 12);
    }

    #[test]
    fn read_nonexistent_file() {
        let result: Result<Sample> = read_config_file("/nonexistent/headway.json");
        assert!(matches!(result, Err(ConfigError::File { action: "read", .. })));
    }

    #[test]
    fn read_invalid_content() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("invalid.json");
        std::fs::write(&path, "{ screen: ").unwrap();

        let result: Result<Sample> = read_config_file(&path);
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn write_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let sample = Sample {
            screen: "harvard".to_string(),
            rows: 4,
        };

        write_config_file(&path, &sample).unwrap();
        let loaded: Sample = read_config_file(&path).unwrap();
        assert_eq!(loaded, sample);
    }

    #[test]
    fn platform_dirs_end_with_app_dir() {
        // Skipped where the platform has no such directories.
        if dirs::config_dir().is_some() {
            assert!(user_config_dir().unwrap().ends_with(APP_DIR));
        }
        if dirs::data_dir().is_some() {
            assert!(user_data_dir().unwrap().ends_with(APP_DIR));
        }
    }
}
