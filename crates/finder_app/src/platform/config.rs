//! Configuration loading: defaults, then an optional RON file, then
//! environment/CLI overrides (clap reads the environment for us).
//!
//! The API key is never read from the file; it only comes from
//! `JOB_FINDER_API_KEY` or `--api-key`.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use finder_core::{AppState, OverlapPolicy, DEFAULT_QUERY};
use finder_engine::{SearchSettings, StaticCredentials, DEFAULT_API_HOST, DEFAULT_ENDPOINT};
use serde::{Deserialize, Serialize};

use crate::Args;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path:?}: {message}")]
    Parse { path: PathBuf, message: String },
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OverlapSetting {
    #[default]
    LatestIssued,
    LastSettled,
}

impl From<OverlapSetting> for OverlapPolicy {
    fn from(setting: OverlapSetting) -> Self {
        match setting {
            OverlapSetting::LatestIssued => OverlapPolicy::LatestIssued,
            OverlapSetting::LastSettled => OverlapPolicy::LastSettled,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FinderConfig {
    pub endpoint: String,
    pub api_host: String,
    pub default_query: String,
    pub overlap_policy: OverlapSetting,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub max_bytes: u64,
    pub log_file: PathBuf,
}

impl Default for FinderConfig {
    fn default() -> Self {
        let search = SearchSettings::default();
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_host: DEFAULT_API_HOST.to_string(),
            default_query: DEFAULT_QUERY.to_string(),
            overlap_policy: OverlapSetting::default(),
            connect_timeout_secs: search.connect_timeout.as_secs(),
            request_timeout_secs: search.request_timeout.as_secs(),
            max_bytes: search.max_bytes,
            log_file: PathBuf::from("./job_finder.log"),
        }
    }
}

impl FinderConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.connect_timeout_secs == 0 || self.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "timeouts must be at least one second".to_string(),
            ));
        }
        if self.max_bytes == 0 {
            return Err(ConfigError::Invalid("max_bytes must be positive".to_string()));
        }
        if self.api_host.trim().is_empty() {
            return Err(ConfigError::Invalid("api_host must not be empty".to_string()));
        }
        Ok(())
    }
}

/// Everything the app needs at startup.
#[derive(Debug, Clone)]
pub struct Settings {
    pub config: FinderConfig,
    pub api_key: Option<String>,
}

impl Settings {
    pub fn search_settings(&self) -> SearchSettings {
        SearchSettings {
            endpoint: self.config.endpoint.clone(),
            connect_timeout: Duration::from_secs(self.config.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.config.request_timeout_secs),
            max_bytes: self.config.max_bytes,
        }
    }

    pub fn credentials(&self) -> StaticCredentials {
        StaticCredentials::new(self.api_key.clone(), self.config.api_host.clone())
    }

    pub fn initial_state(&self) -> AppState {
        AppState::with_settings(
            self.config.default_query.clone(),
            self.config.overlap_policy.into(),
        )
    }
}

/// Reads the RON file at `path`, or returns defaults when no path is given.
pub fn load_config(path: Option<&Path>) -> Result<FinderConfig, ConfigError> {
    let Some(path) = path else {
        return Ok(FinderConfig::default());
    };
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    ron::from_str(&content).map_err(|err| ConfigError::Parse {
        path: path.to_path_buf(),
        message: err.to_string(),
    })
}

pub fn apply_overrides(mut config: FinderConfig, args: &Args) -> FinderConfig {
    if let Some(endpoint) = &args.endpoint {
        config.endpoint = endpoint.clone();
    }
    if let Some(host) = &args.api_host {
        config.api_host = host.clone();
    }
    if let Some(query) = &args.query {
        config.default_query = query.clone();
    }
    if args.last_settled {
        config.overlap_policy = OverlapSetting::LastSettled;
    }
    if let Some(log_file) = &args.log_file {
        config.log_file = log_file.clone();
    }
    config
}

pub fn resolve(args: &Args) -> Result<Settings, ConfigError> {
    let config = apply_overrides(load_config(args.config.as_deref())?, args);
    config.validate()?;
    Ok(Settings {
        config,
        api_key: args.api_key.clone(),
    })
}
