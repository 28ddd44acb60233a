//! Landing-path resolution for authenticated users.
//!
//! - No IO
//! - No panics
//! - Never fails: unknown input degrades to a safe route

use serde::Serialize;

use crate::modules::AssignedModule;
use crate::roles::{COURIER_ROOT_PATH, ECOMMERCE_ROOT_PATH, Role, RoleRegistry};
use crate::user::User;

/// Public landing page (also the target for unknown roles).
pub const ROOT_PATH: &str = "/";

/// Page shown when an account has no area it may enter.
pub const UNAUTHORIZED_PATH: &str = "/unauthorized";

/// Why a destination was chosen.
///
/// The degraded variants (`InvalidRole`, `ContextFallback`, `UnmappedModule`)
/// are outcomes, not errors: callers still get a usable path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Landing {
    /// Static registry default of the role.
    RoleDefault { role: Role },
    /// Contextual role acting for a courier.
    LinkedCourier { role: Role },
    /// Contextual role acting for an e-commerce.
    LinkedEcommerce { role: Role },
    /// Contextual role with no linked entity.
    ContextFallback { role: Role },
    /// Worker routed to its first assigned module.
    Module { module: AssignedModule },
    /// Worker whose first assigned module has no route.
    UnmappedModule,
    /// Role missing or outside the closed set.
    InvalidRole,
}

/// A resolved route plus the reason it was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Destination {
    pub path: &'static str,
    pub landing: Landing,
}

/// Resolves landing paths against a role registry.
#[derive(Debug, Clone, Copy)]
pub struct PathResolver<'a> {
    roles: &'a RoleRegistry,
}

impl PathResolver<'static> {
    pub fn standard() -> Self {
        Self::new(RoleRegistry::standard())
    }
}

impl<'a> PathResolver<'a> {
    pub fn new(roles: &'a RoleRegistry) -> Self {
        Self { roles }
    }

    pub fn roles(&self) -> &'a RoleRegistry {
        self.roles
    }

    /// Default landing path of a user; used for redirects and deep-link guards.
    ///
    /// Unknown roles resolve to [`ROOT_PATH`].
    pub fn resolve(&self, user: &User) -> Destination {
        let Some(role) = user.role() else {
            tracing::debug!(role = ?user.role_name(), "unrecognised role; resolving to root");
            return Destination {
                path: ROOT_PATH,
                landing: Landing::InvalidRole,
            };
        };

        if role.is_contextual() {
            return self.resolve_contextual(role, user);
        }

        Destination {
            path: self.roles.default_path(role),
            landing: Landing::RoleDefault { role },
        }
    }

    pub fn resolve_default_path(&self, user: &User) -> &'static str {
        self.resolve(user).path
    }

    fn resolve_contextual(&self, role: Role, user: &User) -> Destination {
        // Courier linkage wins over ecommerce linkage.
        if user.has_courier_link() {
            return Destination {
                path: COURIER_ROOT_PATH,
                landing: Landing::LinkedCourier { role },
            };
        }
        if user.has_ecommerce_link() {
            return Destination {
                path: ECOMMERCE_ROOT_PATH,
                landing: Landing::LinkedEcommerce { role },
            };
        }

        tracing::debug!(%role, "contextual role without linked entity; using static default");
        Destination {
            path: self.roles.default_path(role),
            landing: Landing::ContextFallback { role },
        }
    }

    /// Where to send a user right after a successful login.
    ///
    /// Workers land on their first assigned module; every other recognised
    /// role lands where [`PathResolver::resolve`] sends it. Accounts without
    /// a recognised role, and workers without a routable module, go to
    /// [`UNAUTHORIZED_PATH`].
    pub fn login_destination(&self, user: &User) -> Destination {
        match user.role() {
            None => {
                tracing::debug!(role = ?user.role_name(), "login with unrecognised role");
                Destination {
                    path: UNAUTHORIZED_PATH,
                    landing: Landing::InvalidRole,
                }
            }
            Some(Role::Trabajador) => {
                let module = user.worker_profile.as_ref().and_then(|w| w.first_module());
                match module {
                    Some(module) => Destination {
                        path: module.route(),
                        landing: Landing::Module { module },
                    },
                    None => {
                        let assigned = user
                            .worker_profile
                            .as_ref()
                            .and_then(|w| w.assigned_module.as_deref());
                        tracing::debug!(?assigned, "worker has no routable module");
                        Destination {
                            path: UNAUTHORIZED_PATH,
                            landing: Landing::UnmappedModule,
                        }
                    }
                }
            }
            Some(_) => self.resolve(user),
        }
    }
}

/// [`PathResolver::resolve_default_path`] over the built-in registry.
pub fn resolve_default_path(user: &User) -> &'static str {
    PathResolver::standard().resolve_default_path(user)
}

/// [`PathResolver::login_destination`] over the built-in registry.
pub fn login_destination(user: &User) -> Destination {
    PathResolver::standard().login_destination(user)
}
