//! Portal client configuration (environment-driven).

use std::path::PathBuf;
use std::time::Duration;

use crate::error::ConfigError;
use crate::persist;

pub const DEFAULT_API_URL: &str = "http://localhost:3000/api";
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Settings shared by the credential exchange and the authorized client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortalConfig {
    /// Base URL of the REST API, without trailing slash.
    pub api_url: String,
    pub request_timeout: Duration,
    /// Where the session is persisted; `None` keeps it in memory only.
    pub session_file: Option<PathBuf>,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            session_file: None,
        }
    }
}

impl PortalConfig {
    /// Read `REPARTO_API_URL`, `REPARTO_HTTP_TIMEOUT_SECS` and
    /// `REPARTO_SESSION_FILE` from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`PortalConfig::from_env`] over an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = match lookup("REPARTO_API_URL") {
            Some(raw) => {
                let trimmed = raw.trim().trim_end_matches('/');
                if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
                    return Err(ConfigError::Invalid {
                        var: "REPARTO_API_URL",
                        value: raw,
                        reason: "expected an http(s) URL",
                    });
                }
                trimmed.to_string()
            }
            None => DEFAULT_API_URL.to_string(),
        };

        let request_timeout = match lookup("REPARTO_HTTP_TIMEOUT_SECS") {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    return Err(ConfigError::Invalid {
                        var: "REPARTO_HTTP_TIMEOUT_SECS",
                        value: raw,
                        reason: "expected a positive number of seconds",
                    });
                }
            },
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        let session_file = match lookup("REPARTO_SESSION_FILE") {
            Some(raw) if raw.trim().eq_ignore_ascii_case("none") => None,
            Some(raw) if !raw.trim().is_empty() => Some(PathBuf::from(raw.trim())),
            _ => persist::default_session_path(),
        };

        Ok(Self { api_url, request_timeout, session_file })
    }

    /// Join a path onto the API base URL.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_url, path.trim_start_matches('/'))
    }
}
