//! Settings file management

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::ConsoleError;
use crate::logs::LogLevel;

/// Default settings file, looked up in the working directory
pub const DEFAULT_SETTINGS_FILE: &str = "deploy-console.json";

/// Environment variable overriding the backend base URL
pub const BACKEND_URL_ENV: &str = "DEPLOY_CONSOLE_BACKEND_URL";

/// Console settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,

    /// Log as JSON
    #[serde(default)]
    pub json_logs: bool,

    /// Backend configuration
    #[serde(default)]
    pub backend: BackendSettings,
}

impl Settings {
    /// Read settings from a JSON file
    pub async fn read(path: &Path) -> Result<Self, ConsoleError> {
        let contents = tokio::fs::read_to_string(path).await?;
        let settings = serde_json::from_str(&contents)
            .map_err(|e| ConsoleError::ConfigError(format!("{}: {}", path.display(), e)))?;
        Ok(settings)
    }

    /// Read `path`, or the default file when present, then apply the environment
    pub async fn load(path: Option<&Path>) -> Result<Self, ConsoleError> {
        let mut settings = match path {
            Some(path) => Self::read(path).await?,
            None => {
                let default = Path::new(DEFAULT_SETTINGS_FILE);
                if tokio::fs::metadata(default).await.is_ok() {
                    Self::read(default).await?
                } else {
                    debug!("No {} found, using defaults", DEFAULT_SETTINGS_FILE);
                    Self::default()
                }
            }
        };
        settings.apply_env(std::env::var(BACKEND_URL_ENV).ok());
        Ok(settings)
    }

    /// Apply an override of the backend URL
    pub fn apply_env(&mut self, backend_url: Option<String>) {
        if let Some(url) = backend_url.filter(|url| !url.trim().is_empty()) {
            self.backend.base_url = url;
        }
    }
}

/// Backend API settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendSettings {
    /// Base URL for the deployments API
    #[serde(default = "default_backend_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_backend_url() -> String {
    "http://localhost:8080/meta-deployer/api".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            base_url: default_backend_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}
