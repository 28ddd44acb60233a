//! Render-gating checks for protected views.
//!
//! Both guards are pure and synchronous; the portal crate feeds them the user
//! of the live session.

use thiserror::Error;

use crate::resolve::{ROOT_PATH, UNAUTHORIZED_PATH};
use crate::user::User;

/// A denied guard check, carrying where the caller must redirect.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GuardRedirect {
    #[error("no active session")]
    NotAuthenticated,

    #[error("role '{required}' required (session role: {actual:?})")]
    RoleMismatch {
        required: String,
        actual: Option<String>,
    },
}

impl GuardRedirect {
    pub fn redirect_path(&self) -> &'static str {
        match self {
            GuardRedirect::NotAuthenticated => ROOT_PATH,
            GuardRedirect::RoleMismatch { .. } => UNAUTHORIZED_PATH,
        }
    }
}

/// Allow iff a session user exists.
pub fn require_authenticated(user: Option<&User>) -> Result<&User, GuardRedirect> {
    user.ok_or(GuardRedirect::NotAuthenticated)
}

/// Allow iff the session user's raw role name equals `required`.
///
/// The comparison is exact (no normalization, no registry lookup). Without a
/// session this also redirects to the unauthorized page.
pub fn require_role<'u>(user: Option<&'u User>, required: &str) -> Result<&'u User, GuardRedirect> {
    match user {
        Some(u) if u.role_name() == Some(required) => Ok(u),
        _ => Err(GuardRedirect::RoleMismatch {
            required: required.to_string(),
            actual: user.and_then(|u| u.role_name()).map(str::to_string),
        }),
    }
}
