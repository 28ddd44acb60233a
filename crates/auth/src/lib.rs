//! `reparto-auth` — pure role/routing boundary.
//!
//! This crate is intentionally decoupled from HTTP, storage and rendering.

pub mod guards;
pub mod modules;
pub mod navigation;
pub mod resolve;
pub mod roles;
pub mod user;

pub use guards::{GuardRedirect, require_authenticated, require_role};
pub use modules::AssignedModule;
pub use navigation::{NavItem, menu_for};
pub use resolve::{
    Destination, Landing, PathResolver, ROOT_PATH, UNAUTHORIZED_PATH, login_destination,
    resolve_default_path,
};
pub use roles::{COURIER_ROOT_PATH, ECOMMERCE_ROOT_PATH, Role, RoleEntry, RoleRegistry};
pub use user::{EntityLink, RoleRef, User, WorkerProfile};
