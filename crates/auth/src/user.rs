//! Authenticated user record as returned by the credential exchange.
//!
//! Only the fields that drive routing are modelled. Field names follow the
//! API (Spanish keys are accepted as aliases).

use serde::{Deserialize, Serialize};

use reparto_core::{CourierId, EcommerceId, RoleId, UserId};

use crate::modules::{self, AssignedModule};
use crate::roles::Role;

/// Role reference attached to a user.
///
/// The API sends either `{ "id": .., "nombre": .. }` or just the name. A
/// record without a name deserializes with an empty one, which is treated
/// as having no role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RoleRefRepr")]
pub struct RoleRef {
    pub id: Option<RoleId>,
    pub name: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RoleRefRepr {
    Name(String),
    Record {
        #[serde(default)]
        id: Option<RoleId>,
        #[serde(default, alias = "nombre")]
        name: Option<String>,
    },
}

impl From<RoleRefRepr> for RoleRef {
    fn from(repr: RoleRefRepr) -> Self {
        match repr {
            RoleRefRepr::Name(name) => RoleRef { id: None, name },
            RoleRefRepr::Record { id, name } => RoleRef {
                id,
                name: name.unwrap_or_default(),
            },
        }
    }
}

/// Link to a courier or e-commerce account.
///
/// The API sends either the embedded record or just its id. Only the
/// presence of a link matters for routing, so a record without a usable id
/// is still a link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityLink {
    Id(#[serde(deserialize_with = "reparto_core::deserialize_numeric")] u64),
    Record {
        #[serde(
            default,
            deserialize_with = "reparto_core::deserialize_optional_numeric",
            skip_serializing_if = "Option::is_none"
        )]
        id: Option<u64>,
        #[serde(default, alias = "nombre", skip_serializing_if = "Option::is_none")]
        name: Option<String>,
    },
    /// Non-numeric reference such as a bare name.
    Name(String),
}

impl EntityLink {
    pub fn id(&self) -> Option<u64> {
        match self {
            EntityLink::Id(id) => Some(*id),
            EntityLink::Record { id, .. } => *id,
            EntityLink::Name(_) => None,
        }
    }
}

/// Worker sub-record carried by `trabajador` accounts (and sometimes by
/// representatives).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerProfile {
    #[serde(default)]
    pub courier_id: Option<CourierId>,
    #[serde(default)]
    pub ecommerce_id: Option<EcommerceId>,
    /// Comma-separated free-text module list.
    #[serde(default, alias = "modulo_asignado")]
    pub assigned_module: Option<String>,
}

impl WorkerProfile {
    pub fn first_module(&self) -> Option<AssignedModule> {
        self.assigned_module.as_deref().and_then(modules::first_assigned_module)
    }

    pub fn modules(&self) -> Vec<AssignedModule> {
        self.assigned_module
            .as_deref()
            .map(modules::assigned_modules)
            .unwrap_or_default()
    }
}

/// User record owned by the session. Routing code only reads it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(default)]
    pub id: Option<UserId>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, alias = "nombre")]
    pub name: Option<String>,
    #[serde(default, alias = "rol")]
    pub role: Option<RoleRef>,
    #[serde(default)]
    pub courier: Option<EntityLink>,
    #[serde(default)]
    pub ecommerce: Option<EntityLink>,
    #[serde(default)]
    pub ecommerce_id: Option<EcommerceId>,
    #[serde(default, alias = "trabajador")]
    pub worker_profile: Option<WorkerProfile>,
}

impl User {
    /// Convenience constructor used by callers that only know the role name.
    pub fn with_role(name: impl Into<String>) -> Self {
        Self {
            role: Some(RoleRef {
                id: None,
                name: name.into(),
            }),
            ..Self::default()
        }
    }

    /// Raw role name exactly as the API sent it; `None` when absent or blank.
    pub fn role_name(&self) -> Option<&str> {
        self.role
            .as_ref()
            .map(|r| r.name.as_str())
            .filter(|name| !name.trim().is_empty())
    }

    /// Role after normalization; `None` when missing or outside the closed set.
    pub fn role(&self) -> Option<Role> {
        self.role_name().and_then(Role::normalize)
    }

    /// Direct courier link or a courier id on the worker profile.
    pub fn has_courier_link(&self) -> bool {
        self.courier.is_some()
            || self
                .worker_profile
                .as_ref()
                .is_some_and(|w| w.courier_id.is_some())
    }

    /// Direct ecommerce link, a worker-profile ecommerce id, or the numeric
    /// `ecommerce_id` field.
    pub fn has_ecommerce_link(&self) -> bool {
        self.ecommerce.is_some()
            || self
                .worker_profile
                .as_ref()
                .is_some_and(|w| w.ecommerce_id.is_some())
            || self.ecommerce_id.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_api_payload_with_spanish_keys() {
        let json = r#"{
            "id": 12,
            "email": "ana@example.com",
            "nombre": "Ana",
            "rol": { "id": 7, "nombre": "Trabajador" },
            "trabajador": {
                "courier_id": null,
                "ecommerce_id": 3,
                "modulo_asignado": "Movimientos, Producto"
            }
        }"#;

        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.id, Some(UserId::new(12)));
        assert_eq!(user.role_name(), Some("Trabajador"));
        assert_eq!(user.role(), Some(Role::Trabajador));
        let profile = user.worker_profile.as_ref().unwrap();
        assert_eq!(profile.first_module(), Some(AssignedModule::Movimiento));
        assert_eq!(
            profile.modules(),
            vec![AssignedModule::Movimiento, AssignedModule::Producto]
        );
        assert!(user.has_ecommerce_link());
        assert!(!user.has_courier_link());
    }

    #[test]
    fn entity_links_accept_ids_and_records() {
        let by_id: User = serde_json::from_str(r#"{ "courier": 4 }"#).unwrap();
        assert_eq!(by_id.courier.as_ref().and_then(EntityLink::id), Some(4));

        let by_record: User =
            serde_json::from_str(r#"{ "ecommerce": { "id": 9, "nombre": "Tienda" } }"#).unwrap();
        assert_eq!(by_record.ecommerce.as_ref().and_then(EntityLink::id), Some(9));
        assert!(by_record.has_ecommerce_link());
    }

    #[test]
    fn missing_fields_default_to_none() {
        let user: User = serde_json::from_str("{}").unwrap();
        assert_eq!(user, User::default());
        assert_eq!(user.role(), None);
        assert!(!user.has_courier_link());
        assert!(!user.has_ecommerce_link());
    }

    #[test]
    fn role_record_without_name_means_no_role() {
        let user: User = serde_json::from_str(r#"{ "rol": { "id": 3 } }"#).unwrap();
        assert_eq!(user.role.as_ref().and_then(|r| r.id), Some(RoleId::new(3)));
        assert_eq!(user.role_name(), None);
        assert_eq!(user.role(), None);
    }

    #[test]
    fn bare_string_role_is_accepted() {
        let user: User = serde_json::from_str(r#"{ "rol": "admin" }"#).unwrap();
        assert_eq!(user.role_name(), Some("admin"));
        assert_eq!(user.role(), Some(Role::Admin));
    }

    #[test]
    fn linked_record_without_id_still_counts_as_link() {
        let json = r#"{ "rol": { "nombre": "representante" }, "courier": { "nombre": "Rapido" } }"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert!(user.has_courier_link());
        assert_eq!(user.courier.as_ref().and_then(EntityLink::id), None);

        let by_name: User = serde_json::from_str(r#"{ "ecommerce": "Tienda Sur" }"#).unwrap();
        assert_eq!(by_name.ecommerce, Some(EntityLink::Name("Tienda Sur".into())));
        assert!(by_name.has_ecommerce_link());
    }

    #[test]
    fn numeric_strings_are_accepted_for_ids() {
        let json = r#"{
            "id": "12",
            "rol": { "id": "2", "nombre": "representante" },
            "ecommerce_id": "9",
            "courier": "4"
        }"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.id, Some(UserId::new(12)));
        assert_eq!(user.ecommerce_id, Some(EcommerceId::new(9)));
        assert_eq!(user.courier.as_ref().and_then(EntityLink::id), Some(4));
        assert!(user.has_ecommerce_link());
    }
}
