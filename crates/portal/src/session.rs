//! Explicit session context.
//!
//! One writer at a time (login, logout, 401 teardown), any number of readers.
//! Every write bumps a generation counter; a [`SessionCommit`] remembers the
//! generation it created so navigation can be refused once the session it
//! was based on is gone.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use reparto_auth::{
    Destination, GuardRedirect, PathResolver, ROOT_PATH, User, require_authenticated,
    require_role,
};

use crate::error::SessionStoreError;
use crate::navigator::{NavigationOutcome, Navigator, SkipReason};
use crate::persist::SessionStore;

/// Authenticated user plus its bearer token.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    token: String,
    user: User,
    established_at: DateTime<Utc>,
}

impl Session {
    pub fn new(token: impl Into<String>, user: User) -> Self {
        Self {
            token: token.into(),
            user,
            established_at: Utc::now(),
        }
    }

    /// Opaque bearer credential.
    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn established_at(&self) -> DateTime<Utc> {
        self.established_at
    }

    /// Where this session lands; the same rule as a fresh login, so a
    /// restored session opens the same page.
    pub fn landing(&self, resolver: &PathResolver<'_>) -> Destination {
        resolver.login_destination(&self.user)
    }
}

impl core::fmt::Debug for Session {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Session")
            .field("token", &"<redacted>")
            .field("user", &self.user)
            .field("established_at", &self.established_at)
            .finish()
    }
}

/// Why a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TeardownReason {
    Logout,
    /// The API rejected the token (HTTP 401).
    Expired,
}

/// Value observed by session subscribers.
#[derive(Debug, Clone, Default)]
pub struct SessionSnapshot {
    pub generation: u64,
    pub session: Option<Arc<Session>>,
}

struct Inner {
    tx: watch::Sender<SessionSnapshot>,
    store: Option<Arc<dyn SessionStore>>,
}

/// Shared handle to the current session. Cloning is cheap.
#[derive(Clone)]
pub struct SessionContext {
    inner: Arc<Inner>,
}

impl core::fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let snapshot = self.inner.tx.borrow();
        f.debug_struct("SessionContext")
            .field("generation", &snapshot.generation)
            .field("authenticated", &snapshot.session.is_some())
            .field("persistent", &self.inner.store.is_some())
            .finish()
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionContext {
    /// In-memory context without persistence.
    pub fn new() -> Self {
        Self::build(None)
    }

    /// Context that mirrors every change into `store`.
    pub fn with_store(store: Arc<dyn SessionStore>) -> Self {
        Self::build(Some(store))
    }

    fn build(store: Option<Arc<dyn SessionStore>>) -> Self {
        let (tx, _rx) = watch::channel(SessionSnapshot::default());
        Self {
            inner: Arc::new(Inner { tx, store }),
        }
    }

    /// Load a persisted session, if any, without writing it back.
    pub fn restore(&self) -> Result<Option<Arc<Session>>, SessionStoreError> {
        let Some(store) = &self.inner.store else {
            return Ok(None);
        };
        let Some(session) = store.load()? else {
            return Ok(None);
        };
        let session = Arc::new(session);
        self.replace(Some(session.clone()));
        tracing::info!(role = ?session.user().role_name(), "session restored");
        Ok(Some(session))
    }

    /// Commit a freshly authenticated session.
    ///
    /// The session is visible to every reader before this returns; routing
    /// goes through the returned receipt. Store I/O runs on the calling
    /// thread; async callers use [`SessionContext::establish_async`].
    pub fn establish(&self, session: Session) -> SessionCommit {
        if let Some(store) = &self.inner.store {
            log_save_result(store.save(&session));
        }
        self.commit(session)
    }

    /// Like [`SessionContext::establish`], with the store write moved onto
    /// the blocking pool.
    pub async fn establish_async(&self, session: Session) -> SessionCommit {
        if let Some(store) = self.inner.store.clone() {
            let copy = session.clone();
            match tokio::task::spawn_blocking(move || store.save(&copy)).await {
                Ok(result) => log_save_result(result),
                Err(e) => tracing::warn!(error = %e, "session persistence task failed"),
            }
        }
        self.commit(session)
    }

    fn commit(&self, session: Session) -> SessionCommit {
        let role = session.user().role_name().map(str::to_string);
        let generation = self.replace(Some(Arc::new(session)));
        tracing::info!(?role, generation, "session established");

        SessionCommit {
            context: self.clone(),
            generation,
        }
    }

    /// Tear the session down.
    ///
    /// The persisted copy is always removed, even when nothing is held in
    /// memory (e.g. after a failed restore). Subscribers are only notified
    /// when a session was actually held.
    pub fn clear(&self, reason: TeardownReason) {
        if let Some(store) = &self.inner.store {
            if let Err(e) = store.clear() {
                tracing::warn!(error = %e, "failed to remove persisted session");
            }
        }
        if !self.is_authenticated() {
            return;
        }
        let generation = self.replace(None);
        tracing::info!(?reason, generation, "session cleared");
    }

    /// Clear only if the session is still the one of `generation`.
    ///
    /// Used when a rejection arrives for a token that may already have been
    /// replaced by a newer login.
    pub fn clear_if_current(&self, generation: u64, reason: TeardownReason) -> bool {
        if self.generation() != generation {
            return false;
        }
        self.clear(reason);
        true
    }

    /// Explicit logout; returns the route to show afterwards.
    pub fn logout(&self) -> &'static str {
        self.clear(TeardownReason::Logout);
        ROOT_PATH
    }

    fn replace(&self, session: Option<Arc<Session>>) -> u64 {
        let mut generation = 0;
        self.inner.tx.send_modify(|snapshot| {
            snapshot.generation += 1;
            snapshot.session = session;
            generation = snapshot.generation;
        });
        generation
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.inner.tx.borrow().clone()
    }

    pub fn current(&self) -> Option<Arc<Session>> {
        self.inner.tx.borrow().session.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.tx.borrow().session.is_some()
    }

    pub fn generation(&self) -> u64 {
        self.inner.tx.borrow().generation
    }

    /// Watch session changes (login, logout, expiry).
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.inner.tx.subscribe()
    }

    /// Authentication guard over the live session.
    pub fn require_authenticated(&self) -> Result<Arc<Session>, GuardRedirect> {
        let session = self.current();
        require_authenticated(session.as_deref().map(Session::user))?;
        session.ok_or(GuardRedirect::NotAuthenticated)
    }

    /// Role guard over the live session (exact role-name match).
    pub fn require_role(&self, required: &str) -> Result<Arc<Session>, GuardRedirect> {
        let session = self.current();
        require_role(session.as_deref().map(Session::user), required)?;
        session.ok_or(GuardRedirect::NotAuthenticated)
    }
}

fn log_save_result(result: Result<(), SessionStoreError>) {
    if let Err(e) = result {
        tracing::warn!(error = %e, "failed to persist session; keeping it in memory");
    }
}

/// Receipt for a committed session; the only way to route after login.
#[must_use = "a commit should be routed or explicitly dropped"]
#[derive(Debug)]
pub struct SessionCommit {
    context: SessionContext,
    generation: u64,
}

impl SessionCommit {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Navigate to `path` unless the session changed since the commit or the
    /// view is gone.
    pub fn route(self, navigator: &dyn Navigator, path: &str) -> NavigationOutcome {
        if self.context.generation() != self.generation {
            tracing::debug!(path, "session changed before navigation; skipping");
            return NavigationOutcome::Skipped {
                reason: SkipReason::Superseded,
            };
        }
        if !navigator.is_mounted() {
            tracing::debug!(path, "view unmounted before navigation; skipping");
            return NavigationOutcome::Skipped {
                reason: SkipReason::Unmounted,
            };
        }
        navigator.navigate(path);
        NavigationOutcome::Navigated {
            path: path.to_string(),
        }
    }
}
