//! Login flow: `idle → submitting → {succeeded, failed}`.

use std::sync::{Mutex, MutexGuard};

use serde::Serialize;

use reparto_auth::{Destination, PathResolver};

use crate::api::{CredentialExchange, Credentials};
use crate::error::LoginError;
use crate::navigator::{NavigationOutcome, Navigator};
use crate::session::{Session, SessionContext};

/// Observable state of the login form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum LoginState {
    Idle,
    Submitting,
    Succeeded { destination: Destination },
    Failed { message: String },
}

/// Result of a successful submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginSuccess {
    pub destination: Destination,
    pub navigation: NavigationOutcome,
}

/// Drives one login form against a credential exchange.
///
/// Only one submission may be in flight; a second one is rejected with
/// [`LoginError::AlreadySubmitting`] and leaves the state untouched.
pub struct LoginFlow<E> {
    exchange: E,
    session: SessionContext,
    resolver: PathResolver<'static>,
    state: Mutex<LoginState>,
}

impl<E> core::fmt::Debug for LoginFlow<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LoginFlow")
            .field("state", &*self.lock_state())
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

impl<E: CredentialExchange> LoginFlow<E> {
    pub fn new(exchange: E, session: SessionContext) -> Self {
        Self {
            exchange,
            session,
            resolver: PathResolver::standard(),
            state: Mutex::new(LoginState::Idle),
        }
    }

    pub fn with_resolver(mut self, resolver: PathResolver<'static>) -> Self {
        self.resolver = resolver;
        self
    }

    /// Submit credentials; on success commit the session, then navigate.
    ///
    /// Failures are stored in the error slot (replacing any previous one)
    /// and returned; nothing is navigated.
    pub async fn submit(
        &self,
        credentials: &Credentials,
        navigator: &dyn Navigator,
    ) -> Result<LoginSuccess, LoginError> {
        let mut in_flight = self.begin()?;
        tracing::info!(email = %credentials.email, "submitting credentials");

        let response = match self.exchange.exchange(credentials).await {
            Ok(response) => response,
            Err(err) => {
                let message = err.user_message();
                tracing::warn!(error = %err, "login failed");
                in_flight.finish(LoginState::Failed { message });
                return Err(err.into());
            }
        };

        let destination = self.resolver.login_destination(&response.user);
        let commit = self
            .session
            .establish_async(Session::new(response.token, response.user))
            .await;
        in_flight.finish(LoginState::Succeeded { destination });

        let navigation = commit.route(navigator, destination.path);
        Ok(LoginSuccess { destination, navigation })
    }

    fn begin(&self) -> Result<InFlight<'_>, LoginError> {
        let mut state = self.lock_state();
        if *state == LoginState::Submitting {
            tracing::debug!("login already in flight; ignoring submission");
            return Err(LoginError::AlreadySubmitting);
        }
        *state = LoginState::Submitting;
        Ok(InFlight {
            state: &self.state,
            finished: false,
        })
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }
}

impl<E> LoginFlow<E> {
    fn lock_state(&self) -> MutexGuard<'_, LoginState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn state(&self) -> LoginState {
        self.lock_state().clone()
    }

    pub fn loading(&self) -> bool {
        *self.lock_state() == LoginState::Submitting
    }

    /// Message of the last failed submission, until the next one starts.
    pub fn error(&self) -> Option<String> {
        match &*self.lock_state() {
            LoginState::Failed { message } => Some(message.clone()),
            _ => None,
        }
    }
}

/// Marks a submission in flight; resets to `Idle` if the submit future is
/// dropped before finishing.
struct InFlight<'a> {
    state: &'a Mutex<LoginState>,
    finished: bool,
}

impl InFlight<'_> {
    fn finish(&mut self, next: LoginState) {
        *self.state.lock().unwrap_or_else(|e| e.into_inner()) = next;
        self.finished = true;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.finished {
            *self.state.lock().unwrap_or_else(|e| e.into_inner()) = LoginState::Idle;
        }
    }
}
