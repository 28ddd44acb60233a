//! `reparto-core` — shared foundation building blocks.
//!
//! This crate contains **pure** primitives (no infrastructure concerns).

pub mod error;
pub mod id;

pub use error::{DomainError, DomainResult};
pub use id::{
    CourierId, EcommerceId, RoleId, UserId, deserialize_numeric, deserialize_optional_numeric,
};
