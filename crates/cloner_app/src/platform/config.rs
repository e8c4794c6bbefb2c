use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use cloner_engine::{ClientSettings, SandboxCapability, SandboxPolicy};
use log::LevelFilter;
use serde::Deserialize;
use thiserror::Error;

use super::logging::LogDestination;

pub const CONFIG_FILENAME: &str = "cloner.ron";
pub const SERVICE_URL_ENV: &str = "CLONER_SERVICE_URL";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path:?}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to parse {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: ron::error::SpannedError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub service_url: String,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub max_response_bytes: u64,
    pub output_dir: PathBuf,
    pub log_destination: LogDestination,
    pub log_file: PathBuf,
    pub log_level: String,
    /// Grant `allow-same-origin` to the preview frame alongside scripts.
    pub same_origin_preview: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        let client = ClientSettings::default();
        Self {
            service_url: client.service_url,
            connect_timeout_secs: client.connect_timeout.as_secs(),
            request_timeout_secs: client.request_timeout.as_secs(),
            max_response_bytes: client.max_bytes,
            output_dir: PathBuf::from("output"),
            log_destination: LogDestination::File,
            log_file: PathBuf::from("cloner.log"),
            log_level: "info".to_string(),
            same_origin_preview: true,
        }
    }
}

impl AppConfig {
    /// Loads `path`; a missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        ron::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn with_env_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = lookup(SERVICE_URL_ENV).filter(|value| !value.trim().is_empty()) {
            self.service_url = url;
        }
        self
    }

    pub fn client_settings(&self) -> ClientSettings {
        ClientSettings {
            service_url: self.service_url.clone(),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            max_bytes: self.max_response_bytes,
        }
    }

    pub fn sandbox_policy(&self) -> SandboxPolicy {
        if self.same_origin_preview {
            SandboxPolicy::preview()
        } else {
            SandboxPolicy::preview().revoke(SandboxCapability::AllowSameOrigin)
        }
    }

    pub fn level(&self) -> LevelFilter {
        cloner_logging::parse_level(&self.log_level).unwrap_or(LevelFilter::Info)
    }
}
