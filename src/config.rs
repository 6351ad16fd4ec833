use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use validator::Validate;

use crate::core::{DeckOptions, DEFAULT_PLACEHOLDER_PHOTO};
use crate::services::{HttpDirectoryOptions, RetryPolicy};

/// Errors while loading settings
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid configuration: {0}")]
    Invalid(#[from] validator::ValidationErrors),
}

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct Settings {
    #[serde(default)]
    #[validate(nested)]
    pub directory: DirectorySettings,
    #[serde(default)]
    #[validate(nested)]
    pub deck: DeckSettings,
    #[serde(default)]
    #[validate(nested)]
    pub outbox: OutboxSettings,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct DirectorySettings {
    #[serde(default = "default_base_url")]
    #[validate(url)]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    #[validate(range(min = 1, max = 300))]
    pub timeout_secs: u64,
}

impl Default for DirectorySettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_base_url() -> String { "http://localhost:8080/api".to_string() }
fn default_timeout_secs() -> u64 { 30 }

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct DeckSettings {
    #[serde(default = "default_placeholder_photo_url")]
    #[validate(url)]
    pub placeholder_photo_url: String,
    #[serde(default = "default_max_concurrent_resolutions")]
    #[validate(range(min = 1, max = 64))]
    pub max_concurrent_resolutions: usize,
    #[serde(default = "default_true")]
    pub preserve_link_order: bool,
}

impl Default for DeckSettings {
    fn default() -> Self {
        Self {
            placeholder_photo_url: default_placeholder_photo_url(),
            max_concurrent_resolutions: default_max_concurrent_resolutions(),
            preserve_link_order: true,
        }
    }
}

fn default_placeholder_photo_url() -> String { DEFAULT_PLACEHOLDER_PHOTO.to_string() }
fn default_max_concurrent_resolutions() -> usize { 8 }
fn default_true() -> bool { true }

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct OutboxSettings {
    #[serde(default = "default_max_attempts")]
    #[validate(range(min = 1, max = 10))]
    pub max_attempts: u32,
    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,
    #[serde(default = "default_max_backoff_ms")]
    pub max_backoff_ms: u64,
}

impl Default for OutboxSettings {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            initial_backoff_ms: default_initial_backoff_ms(),
            max_backoff_ms: default_max_backoff_ms(),
        }
    }
}

fn default_max_attempts() -> u32 { 3 }
fn default_initial_backoff_ms() -> u64 { 200 }
fn default_max_backoff_ms() -> u64 { 5000 }

#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    #[serde(default = "default_cache_ttl_secs")]
    pub ttl_secs: u64,
    #[serde(default = "default_cache_capacity")]
    pub capacity: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            ttl_secs: default_cache_ttl_secs(),
            capacity: default_cache_capacity(),
        }
    }
}

fn default_cache_ttl_secs() -> u64 { 300 }
fn default_cache_capacity() -> u64 { 1000 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "compact".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with MATCH_DECK)
    pub fn load() -> Result<Self, SettingsError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., MATCH_DECK__DIRECTORY__BASE_URL -> directory.base_url
            .add_source(environment())
            .build()?;

        Self::finish(settings)
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(environment())
            .build()?;

        Self::finish(settings)
    }

    fn finish(settings: Config) -> Result<Self, SettingsError> {
        let settings: Settings = settings.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn deck_options(&self) -> DeckOptions {
        DeckOptions {
            placeholder_photo_url: self.deck.placeholder_photo_url.clone(),
            max_concurrent_resolutions: self.deck.max_concurrent_resolutions,
            preserve_link_order: self.deck.preserve_link_order,
        }
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.outbox.max_attempts,
            initial_backoff: Duration::from_millis(self.outbox.initial_backoff_ms),
            max_backoff: Duration::from_millis(self.outbox.max_backoff_ms),
        }
    }

    pub fn directory_options(&self) -> HttpDirectoryOptions {
        HttpDirectoryOptions {
            timeout: Duration::from_secs(self.directory.timeout_secs),
            cache_capacity: self.cache.capacity,
            cache_ttl: Duration::from_secs(self.cache.ttl_secs),
        }
    }
}

fn environment() -> Environment {
    Environment::with_prefix("MATCH_DECK")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    fn from_toml(source: &str) -> Result<Settings, SettingsError> {
        let config = Config::builder()
            .add_source(File::from_str(source, FileFormat::Toml))
            .build()?;
        Settings::finish(config)
    }

    #[test]
    fn test_defaults() {
        let settings = from_toml("").unwrap();
        assert_eq!(settings.directory.base_url, "http://localhost:8080/api");
        assert_eq!(settings.deck.max_concurrent_resolutions, 8);
        assert!(settings.deck.preserve_link_order);
        assert_eq!(settings.outbox.max_attempts, 3);
        assert_eq!(settings.logging.level, "info");
        assert_eq!(settings.deck_options(), DeckOptions::default());
        assert_eq!(settings.retry_policy(), RetryPolicy::default());
    }

    #[test]
    fn test_file_overrides() {
        let settings = from_toml(
            r#"
            [directory]
            base_url = "https://match.test/api"

            [deck]
            max_concurrent_resolutions = 2
            preserve_link_order = false

            [outbox]
            max_attempts = 5
            initial_backoff_ms = 10
            "#,
        )
        .unwrap();

        assert_eq!(settings.directory.base_url, "https://match.test/api");
        assert_eq!(settings.deck_options().max_concurrent_resolutions, 2);
        assert!(!settings.deck_options().preserve_link_order);
        assert_eq!(settings.retry_policy().max_attempts, 5);
        assert_eq!(settings.retry_policy().initial_backoff, Duration::from_millis(10));
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = from_toml("[deck]\nmax_concurrent_resolutions = 0\n").unwrap_err();
        assert!(matches!(err, SettingsError::Invalid(_)));

        let err = from_toml("[directory]\nbase_url = \"not a url\"\n").unwrap_err();
        assert!(matches!(err, SettingsError::Invalid(_)));
    }
}
