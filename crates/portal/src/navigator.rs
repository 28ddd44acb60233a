//! Route-change seam between the login flow and the view layer.

use std::sync::Mutex;

use serde::Serialize;

/// Applies route changes on behalf of the portal.
pub trait Navigator: Send + Sync {
    fn navigate(&self, path: &str);

    /// Whether the view that requested navigation still exists.
    fn is_mounted(&self) -> bool {
        true
    }
}

/// Result of a commit-then-route step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum NavigationOutcome {
    Navigated { path: String },
    Skipped { reason: SkipReason },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The session was replaced or cleared after the commit.
    Superseded,
    /// The requesting view went away.
    Unmounted,
}

/// Navigator that only records and logs the requested route.
///
/// Used by the command-line login and anywhere there is no real view.
#[derive(Debug, Default)]
pub struct TracingNavigator {
    last: Mutex<Option<String>>,
}

impl TracingNavigator {
    pub fn last_path(&self) -> Option<String> {
        self.last.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl Navigator for TracingNavigator {
    fn navigate(&self, path: &str) {
        tracing::info!(path, "navigate");
        *self.last.lock().unwrap_or_else(|e| e.into_inner()) = Some(path.to_string());
    }
}
