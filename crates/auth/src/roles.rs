use std::collections::HashMap;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use reparto_core::{DomainError, DomainResult};

/// Root path of the courier area.
pub const COURIER_ROOT_PATH: &str = "/courier";

/// Root path of the e-commerce area.
pub const ECOMMERCE_ROOT_PATH: &str = "/ecommerce";

/// Role identifier used for routing and access checks.
///
/// The set is closed: the API may only send these names (case-insensitively).
/// `Representante` is the contextual role whose landing page depends on the
/// business entity the account is linked to.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Ecommerce,
    RepresentanteEcommerce,
    RepresentanteCourier,
    Courier,
    Motorizado,
    Trabajador,
    Representante,
}

impl Role {
    pub const ALL: [Role; 8] = [
        Role::Admin,
        Role::Ecommerce,
        Role::RepresentanteEcommerce,
        Role::RepresentanteCourier,
        Role::Courier,
        Role::Motorizado,
        Role::Trabajador,
        Role::Representante,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Ecommerce => "ecommerce",
            Role::RepresentanteEcommerce => "representante_ecommerce",
            Role::RepresentanteCourier => "representante_courier",
            Role::Courier => "courier",
            Role::Motorizado => "motorizado",
            Role::Trabajador => "trabajador",
            Role::Representante => "representante",
        }
    }

    /// Normalize a raw role name (trim + lower-case) and match it against the
    /// closed set. Returns `None` for anything else.
    pub fn normalize(raw: &str) -> Option<Role> {
        let normalized = raw.trim().to_lowercase();
        Role::ALL.into_iter().find(|r| r.as_str() == normalized)
    }

    /// Whether the landing page depends on the linked courier/ecommerce.
    pub fn is_contextual(&self) -> bool {
        matches!(self, Role::Representante)
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::str::FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::normalize(s).ok_or_else(|| DomainError::invalid_id(format!("unknown role '{s}'")))
    }
}

/// Static routing data for a single role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RoleEntry {
    pub role: Role,
    pub default_path: &'static str,
    pub label: &'static str,
}

const ROLE_TABLE: &[RoleEntry] = &[
    RoleEntry {
        role: Role::Admin,
        default_path: "/admin",
        label: "Administrador",
    },
    RoleEntry {
        role: Role::Ecommerce,
        default_path: ECOMMERCE_ROOT_PATH,
        label: "Ecommerce",
    },
    RoleEntry {
        role: Role::RepresentanteEcommerce,
        default_path: ECOMMERCE_ROOT_PATH,
        label: "Representante de ecommerce",
    },
    RoleEntry {
        role: Role::RepresentanteCourier,
        default_path: COURIER_ROOT_PATH,
        label: "Representante de courier",
    },
    RoleEntry {
        role: Role::Courier,
        default_path: COURIER_ROOT_PATH,
        label: "Courier",
    },
    RoleEntry {
        role: Role::Motorizado,
        default_path: "/motorizado",
        label: "Motorizado",
    },
    RoleEntry {
        role: Role::Trabajador,
        default_path: "/trabajador",
        label: "Trabajador",
    },
    RoleEntry {
        role: Role::Representante,
        default_path: "/representante",
        label: "Representante",
    },
];

/// Role → (default path, label) lookup table.
///
/// Lookups are O(1). Completeness is checked by [`RoleRegistry::validate`];
/// [`RoleRegistry::standard`] refuses to hand out an incomplete table.
#[derive(Debug, Clone)]
pub struct RoleRegistry {
    entries: HashMap<Role, RoleEntry>,
}

impl RoleRegistry {
    /// Build a registry from arbitrary entries. Duplicate roles are rejected.
    pub fn from_entries(entries: &[RoleEntry]) -> DomainResult<Self> {
        let mut map = HashMap::with_capacity(entries.len());
        for entry in entries {
            if map.insert(entry.role, *entry).is_some() {
                return Err(DomainError::invariant(format!(
                    "role '{}' has more than one registry entry",
                    entry.role
                )));
            }
        }
        Ok(Self { entries: map })
    }

    /// The built-in table, validated once per process.
    pub fn standard() -> &'static RoleRegistry {
        static STANDARD: OnceLock<RoleRegistry> = OnceLock::new();
        STANDARD.get_or_init(|| {
            let registry = RoleRegistry::from_entries(ROLE_TABLE)
                .and_then(|r| r.validate().map(|()| r));
            match registry {
                Ok(r) => r,
                // The table is a compile-time constant; this is a build defect.
                Err(e) => panic!("built-in role table is invalid: {e}"),
            }
        })
    }

    /// Ensure every role of the closed set has exactly one entry.
    pub fn validate(&self) -> DomainResult<()> {
        let missing: Vec<&str> = Role::ALL
            .iter()
            .filter(|r| !self.entries.contains_key(r))
            .map(|r| r.as_str())
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(DomainError::invariant(format!(
                "role registry has no entry for: {}",
                missing.join(", ")
            )))
        }
    }

    pub fn entry(&self, role: Role) -> Option<&RoleEntry> {
        self.entries.get(&role)
    }

    /// Default landing path; `/` if the registry was built without the role.
    pub fn default_path(&self, role: Role) -> &'static str {
        self.entry(role).map(|e| e.default_path).unwrap_or(crate::resolve::ROOT_PATH)
    }

    pub fn label(&self, role: Role) -> Option<&'static str> {
        self.entry(role).map(|e| e.label)
    }

    /// Entries in closed-set order.
    pub fn entries(&self) -> impl Iterator<Item = &RoleEntry> {
        Role::ALL.iter().filter_map(|r| self.entries.get(r))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_registry_covers_every_role() {
        let registry = RoleRegistry::standard();
        registry.validate().unwrap();
        assert_eq!(registry.entries().count(), Role::ALL.len());
        for role in Role::ALL {
            let entry = registry.entry(role).unwrap();
            assert!(entry.default_path.starts_with('/'));
            assert!(!entry.label.is_empty());
        }
    }

    #[test]
    fn incomplete_registry_is_reported() {
        let partial: Vec<RoleEntry> = ROLE_TABLE
            .iter()
            .copied()
            .filter(|e| e.role != Role::Motorizado)
            .collect();
        let registry = RoleRegistry::from_entries(&partial).unwrap();
        let err = registry.validate().unwrap_err();
        match err {
            DomainError::InvariantViolation(msg) => assert!(msg.contains("motorizado")),
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(registry.default_path(Role::Motorizado), "/");
    }

    #[test]
    fn duplicate_entries_are_rejected() {
        let mut dup = ROLE_TABLE.to_vec();
        dup.push(ROLE_TABLE[0]);
        assert!(RoleRegistry::from_entries(&dup).is_err());
    }

    #[test]
    fn normalize_ignores_case_and_padding() {
        assert_eq!(Role::normalize("Admin"), Some(Role::Admin));
        assert_eq!(Role::normalize("  TRABAJADOR "), Some(Role::Trabajador));
        assert_eq!(Role::normalize("Representante_Courier"), Some(Role::RepresentanteCourier));
        assert_eq!(Role::normalize("superuser"), None);
        assert_eq!(Role::normalize(""), None);
    }

    #[test]
    fn as_str_parses_back_for_every_role() {
        for role in Role::ALL {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
    }

    #[test]
    fn serde_uses_wire_names() {
        let json = serde_json::to_string(&Role::RepresentanteEcommerce).unwrap();
        assert_eq!(json, "\"representante_ecommerce\"");
    }

    #[test]
    fn only_representante_is_contextual() {
        let contextual: Vec<Role> = Role::ALL.into_iter().filter(|r| r.is_contextual()).collect();
        assert_eq!(contextual, vec![Role::Representante]);
    }
}
