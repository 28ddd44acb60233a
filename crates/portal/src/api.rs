//! Credential exchange with the delivery API.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use reparto_auth::User;

use crate::config::PortalConfig;
use crate::error::AuthError;

/// Login form input.
#[derive(Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl core::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Successful exchange payload: `{ "token": ..., "user": { ... } }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

/// Trades credentials for a token and user record.
#[async_trait]
pub trait CredentialExchange: Send + Sync {
    async fn exchange(&self, credentials: &Credentials) -> Result<LoginResponse, AuthError>;
}

/// `POST {api_url}/auth/login` over HTTP.
#[derive(Debug, Clone)]
pub struct HttpCredentialExchange {
    http: reqwest::Client,
    login_url: String,
}

impl HttpCredentialExchange {
    pub fn new(http: reqwest::Client, config: &PortalConfig) -> Self {
        Self {
            http,
            login_url: config.endpoint("auth/login"),
        }
    }

    /// Build with a dedicated client honouring the configured timeout.
    pub fn from_config(config: &PortalConfig) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self::new(http, config))
    }

    pub fn login_url(&self) -> &str {
        &self.login_url
    }
}

#[async_trait]
impl CredentialExchange for HttpCredentialExchange {
    async fn exchange(&self, credentials: &Credentials) -> Result<LoginResponse, AuthError> {
        let resp = self
            .http
            .post(&self.login_url)
            .json(credentials)
            .send()
            .await
            .map_err(|e| AuthError::NetworkFailure(e.to_string()))?;

        let status = resp.status();
        if status.is_success() {
            let body: LoginResponse = resp.json().await.map_err(|e| AuthError::Unknown {
                message: None,
                detail: format!("malformed login response: {e}"),
            })?;
            if body.token.trim().is_empty() {
                return Err(AuthError::Unknown {
                    message: None,
                    detail: "login response carried an empty token".to_string(),
                });
            }
            return Ok(body);
        }

        let text = resp.text().await.unwrap_or_default();
        let message = server_message(&text);
        match status.as_u16() {
            400 | 401 | 403 => Err(AuthError::CredentialsRejected { message }),
            code => Err(AuthError::Unknown {
                message,
                detail: format!("API error ({code})"),
            }),
        }
    }
}

/// Extract a human-readable message from an error body.
///
/// The API is not consistent about the key; the first string found wins.
pub(crate) fn server_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    ["message", "mensaje", "error"]
        .iter()
        .find_map(|key| value.get(key).and_then(|v| v.as_str()))
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_message_checks_known_keys() {
        assert_eq!(
            server_message(r#"{"message":"Usuario bloqueado"}"#).as_deref(),
            Some("Usuario bloqueado")
        );
        assert_eq!(
            server_message(r#"{"mensaje":" Clave incorrecta "}"#).as_deref(),
            Some("Clave incorrecta")
        );
        assert_eq!(server_message(r#"{"error":"invalid"}"#).as_deref(), Some("invalid"));
        assert_eq!(server_message(r#"{"error":{"code":1}}"#), None);
        assert_eq!(server_message("<html>502</html>"), None);
    }

    #[test]
    fn credentials_debug_hides_password() {
        let creds = Credentials::new("ana@example.com", "hunter2");
        let rendered = format!("{creds:?}");
        assert!(rendered.contains("ana@example.com"));
        assert!(!rendered.contains("hunter2"));
    }

    #[test]
    fn login_url_is_joined_onto_base() {
        let config = PortalConfig {
            api_url: "http://localhost:9000/api".into(),
            ..PortalConfig::default()
        };
        let exchange = HttpCredentialExchange::new(reqwest::Client::new(), &config);
        assert_eq!(exchange.login_url(), "http://localhost:9000/api/auth/login");
    }
}
