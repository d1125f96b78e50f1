//! Application configuration options

use std::time::Duration;

use crate::storage::settings::Settings;

/// Main application options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppOptions {
    /// Deployments API base URL
    pub backend_base_url: String,

    /// Timeout of a single backend request
    pub request_timeout: Duration,
}

impl Default for AppOptions {
    fn default() -> Self {
        Self::from(&Settings::default())
    }
}

impl From<&Settings> for AppOptions {
    fn from(settings: &Settings) -> Self {
        Self {
            backend_base_url: settings.backend.base_url.clone(),
            request_timeout: Duration::from_secs(settings.backend.timeout_secs),
        }
    }
}
