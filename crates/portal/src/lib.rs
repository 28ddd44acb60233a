//! `reparto-portal`
//!
//! **Responsibility:** client-side session and login plumbing for the delivery
//! portal.
//!
//! This crate provides:
//! - An explicit session context with persistence and change notifications
//! - The login flow (credential exchange, commit-then-route navigation)
//! - A bearer-authenticated API client that tears the session down on 401
//!
//! Routing decisions themselves live in `reparto-auth`.

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod login;
pub mod navigator;
pub mod persist;
pub mod session;

pub use api::{CredentialExchange, Credentials, HttpCredentialExchange, LoginResponse};
pub use client::AuthorizedClient;
pub use config::PortalConfig;
pub use error::{ApiError, AuthError, ConfigError, LoginError, SessionStoreError};
pub use login::{LoginFlow, LoginState, LoginSuccess};
pub use navigator::{NavigationOutcome, Navigator, SkipReason, TracingNavigator};
pub use persist::{JsonFileSessionStore, MemorySessionStore, SessionStore};
pub use session::{Session, SessionCommit, SessionContext, SessionSnapshot, TeardownReason};
