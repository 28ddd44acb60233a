//! Error types of the portal client.

use thiserror::Error;

/// Shown when a rejection carries no server message.
pub const REJECTED_FALLBACK: &str = "Correo o contraseña incorrectos";

/// Shown for transport failures.
pub const NETWORK_FALLBACK: &str = "No se pudo conectar con el servidor";

/// Shown for anything else without a server message.
pub const GENERIC_FALLBACK: &str = "Error al iniciar sesión";

/// Failure of the credential exchange.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The API refused the email/password pair.
    #[error("credentials rejected")]
    CredentialsRejected { message: Option<String> },

    /// The request never produced an HTTP response.
    #[error("network error: {0}")]
    NetworkFailure(String),

    /// Unexpected status or malformed response.
    #[error("login failed: {detail}")]
    Unknown {
        message: Option<String>,
        detail: String,
    },
}

impl AuthError {
    /// Text for the login form's single error slot.
    ///
    /// A message supplied by the server wins; otherwise a per-kind fallback.
    pub fn user_message(&self) -> String {
        let server = match self {
            AuthError::CredentialsRejected { message } | AuthError::Unknown { message, .. } => {
                message.as_deref().map(str::trim).filter(|m| !m.is_empty())
            }
            AuthError::NetworkFailure(_) => None,
        };

        let fallback = match self {
            AuthError::CredentialsRejected { .. } => REJECTED_FALLBACK,
            AuthError::NetworkFailure(_) => NETWORK_FALLBACK,
            AuthError::Unknown { .. } => GENERIC_FALLBACK,
        };

        server.unwrap_or(fallback).to_string()
    }
}

/// Why a login submission did not complete.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LoginError {
    /// A previous submission is still in flight.
    #[error("a login request is already in progress")]
    AlreadySubmitting,

    #[error(transparent)]
    Auth(#[from] AuthError),
}

/// Failure of an authenticated API call.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("no active session")]
    NoSession,

    /// The API answered 401; the session has been torn down.
    #[error("session expired")]
    Unauthorized,

    #[error("network error: {0}")]
    Network(String),

    #[error("API error ({0}): {1}")]
    Api(u16, String),

    #[error("parse error: {0}")]
    Parse(String),
}

/// Failure while reading or writing the persisted session.
#[derive(Debug, Error)]
pub enum SessionStoreError {
    #[error("session file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("session file is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Invalid environment configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var}='{value}' is invalid: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: &'static str,
    },
}
