//! Assigned modules of worker (`trabajador`) accounts.
//!
//! Worker profiles historically store their module as free text
//! (`"Stock de productos"`, `"Movimientos, Producto"`). That text is parsed
//! into [`AssignedModule`] here and nowhere else; routes and labels are taken
//! from the enum.

use serde::{Deserialize, Serialize};

use reparto_core::DomainError;

/// Functional area a worker account is responsible for.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssignedModule {
    Stock,
    Producto,
    Movimiento,
    Pedidos,
}

impl AssignedModule {
    pub const ALL: [AssignedModule; 4] = [
        AssignedModule::Stock,
        AssignedModule::Producto,
        AssignedModule::Movimiento,
        AssignedModule::Pedidos,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AssignedModule::Stock => "stock",
            AssignedModule::Producto => "producto",
            AssignedModule::Movimiento => "movimiento",
            AssignedModule::Pedidos => "pedidos",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AssignedModule::Stock => "Stock de productos",
            AssignedModule::Producto => "Productos",
            AssignedModule::Movimiento => "Movimientos",
            AssignedModule::Pedidos => "Pedidos",
        }
    }

    /// Absolute route of the module's CRUD area.
    pub fn route(&self) -> &'static str {
        match self {
            AssignedModule::Stock => "/stock",
            AssignedModule::Producto => "/producto",
            AssignedModule::Movimiento => "/movimiento",
            AssignedModule::Pedidos => "/pedidos",
        }
    }

    /// Parse one free-text entry.
    ///
    /// Accepts the canonical identifiers and the historical labels listed in
    /// [`LEGACY_MODULE_LABELS`]. Label matching is exact; the entry is only
    /// trimmed.
    pub fn from_label(raw: &str) -> Option<AssignedModule> {
        let raw = raw.trim();
        AssignedModule::ALL
            .into_iter()
            .find(|m| m.as_str() == raw)
            .or_else(|| {
                LEGACY_MODULE_LABELS
                    .iter()
                    .find(|(label, _)| *label == raw)
                    .map(|(_, module)| *module)
            })
    }
}

impl core::fmt::Display for AssignedModule {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::str::FromStr for AssignedModule {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AssignedModule::from_label(s)
            .ok_or_else(|| DomainError::invalid_id(format!("unknown assigned module '{s}'")))
    }
}

/// Free-text labels found on worker profiles.
pub const LEGACY_MODULE_LABELS: &[(&str, AssignedModule)] = &[
    ("Stock de productos", AssignedModule::Stock),
    ("Stock", AssignedModule::Stock),
    ("Productos", AssignedModule::Producto),
    ("Producto", AssignedModule::Producto),
    ("Movimientos", AssignedModule::Movimiento),
    ("Movimiento", AssignedModule::Movimiento),
    ("Pedidos", AssignedModule::Pedidos),
];

/// First entry of a comma-separated assignment list, if it is recognised.
///
/// Only the first entry counts; a recognised second entry does not rescue an
/// unknown first one.
pub fn first_assigned_module(raw: &str) -> Option<AssignedModule> {
    raw.split(',').next().and_then(AssignedModule::from_label)
}

/// Every recognised entry of an assignment list, in order, without repeats.
pub fn assigned_modules(raw: &str) -> Vec<AssignedModule> {
    let mut out = Vec::new();
    for module in raw.split(',').filter_map(AssignedModule::from_label) {
        if !out.contains(&module) {
            out.push(module);
        }
    }
    out
}
