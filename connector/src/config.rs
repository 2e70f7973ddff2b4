use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::directory::query;

/// Connector configuration loaded from multiple sources.
///
/// Configuration is loaded in priority order (lowest to highest):
/// 1. Struct defaults
/// 2. docdir.yaml file (if exists)
/// 3. Environment variables with `DOCDIR_` prefix (always wins)
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub remote: RemoteConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RemoteConfig {
    /// REST API root, e.g. `http://demo.nuxeo.com/nuxeo/api/v1/`.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Value sent verbatim in the `Authorization` header of every request.
    #[serde(default = "default_authorization")]
    pub authorization: String,

    /// `pageSize` used by dynamic title searches.
    #[serde(default = "default_page_size")]
    pub search_page_size: u32,

    /// `pageSize` of the single listing fetch behind the in-memory cache.
    #[serde(default = "default_page_size")]
    pub bulk_page_size: u32,

    /// NXQL listing loaded into the in-memory cache.
    #[serde(default = "default_bulk_query")]
    pub bulk_query: String,

    /// Request timeout in seconds. Unset leaves the transport default.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Log level filter (debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_base_url() -> String {
    "http://demo.nuxeo.com/nuxeo/api/v1/".to_string()
}

fn default_authorization() -> String {
    // Administrator:Administrator
    "Basic QWRtaW5pc3RyYXRvcjpBZG1pbmlzdHJhdG9y".to_string()
}

// These functions cannot be const because serde uses function pointers for defaults
#[allow(clippy::missing_const_for_fn)]
fn default_page_size() -> u32 {
    200
}

fn default_bulk_query() -> String {
    query::listing_query()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            authorization: default_authorization(),
            search_page_size: default_page_size(),
            bulk_page_size: default_page_size(),
            bulk_query: default_bulk_query(),
            timeout_secs: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Configuration loading and validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration error: {0}")]
    Figment(#[from] Box<figment::Error>),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// Sources are merged in priority order:
    /// 1. Struct defaults (lowest)
    /// 2. docdir.yaml file (if exists)
    /// 3. Environment variables with `DOCDIR_` prefix (highest)
    ///
    /// # Errors
    /// Returns an error if configuration cannot be loaded or is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("docdir.yaml")
    }

    /// Load configuration with a custom YAML file path.
    ///
    /// # Errors
    /// Returns an error if configuration cannot be loaded or is invalid.
    pub fn load_from(yaml_path: &str) -> Result<Self, ConfigError> {
        let config: Self = Figment::new()
            .merge(Serialized::defaults(Self::default()))
            .merge(Yaml::file(yaml_path))
            .merge(Env::prefixed("DOCDIR_").split("__"))
            .extract()?;

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    /// Returns an error if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let remote = &self.remote;

        if !remote.base_url.starts_with("http://") && !remote.base_url.starts_with("https://") {
            return Err(ConfigError::Validation(format!(
                "remote.base_url must start with http:// or https://, got: '{}'",
                remote.base_url
            )));
        }

        if remote.authorization.trim().is_empty() {
            return Err(ConfigError::Validation(
                "remote.authorization is required. Set DOCDIR_REMOTE__AUTHORIZATION or configure in docdir.yaml.".into(),
            ));
        }

        if remote.search_page_size == 0 {
            return Err(ConfigError::Validation(
                "remote.search_page_size cannot be 0".into(),
            ));
        }

        if remote.bulk_page_size == 0 {
            return Err(ConfigError::Validation(
                "remote.bulk_page_size cannot be 0".into(),
            ));
        }

        if remote.bulk_query.trim().is_empty() {
            return Err(ConfigError::Validation(
                "remote.bulk_query cannot be empty".into(),
            ));
        }

        if remote.timeout_secs == Some(0) {
            return Err(ConfigError::Validation(
                "remote.timeout_secs cannot be 0".into(),
            ));
        }

        Ok(())
    }
}
