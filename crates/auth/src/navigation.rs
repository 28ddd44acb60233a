//! Role-derived navigation menus.

use serde::Serialize;

use crate::resolve::{Landing, PathResolver};
use crate::roles::Role;
use crate::user::User;

/// One entry of the side navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NavItem {
    pub label: &'static str,
    pub path: &'static str,
}

const fn item(label: &'static str, path: &'static str) -> NavItem {
    NavItem { label, path }
}

const ADMIN_MENU: &[NavItem] = &[
    item("Panel", "/admin"),
    item("Usuarios", "/admin/usuarios"),
    item("Couriers", "/admin/couriers"),
    item("Ecommerces", "/admin/ecommerces"),
];

const ECOMMERCE_MENU: &[NavItem] = &[
    item("Panel", "/ecommerce"),
    item("Pedidos", "/ecommerce/pedidos"),
    item("Productos", "/ecommerce/productos"),
    item("Stock", "/ecommerce/stock"),
    item("Movimientos", "/ecommerce/movimientos"),
    item("Trabajadores", "/ecommerce/trabajadores"),
];

const COURIER_MENU: &[NavItem] = &[
    item("Panel", "/courier"),
    item("Pedidos", "/courier/pedidos"),
    item("Motorizados", "/courier/motorizados"),
    item("Trabajadores", "/courier/trabajadores"),
];

const MOTORIZADO_MENU: &[NavItem] = &[
    item("Panel", "/motorizado"),
    item("Mis pedidos", "/motorizado/pedidos"),
];

/// Menu entries for the given session user.
///
/// Workers get one entry per recognised assigned module. Representatives get
/// the menu of the entity they resolve to; an unlinked representative only
/// sees its fallback page.
pub fn menu_for(resolver: &PathResolver<'_>, user: &User) -> Vec<NavItem> {
    let Some(role) = user.role() else {
        return Vec::new();
    };

    match role {
        Role::Admin => ADMIN_MENU.to_vec(),
        Role::Ecommerce | Role::RepresentanteEcommerce => ECOMMERCE_MENU.to_vec(),
        Role::Courier | Role::RepresentanteCourier => COURIER_MENU.to_vec(),
        Role::Motorizado => MOTORIZADO_MENU.to_vec(),
        Role::Trabajador => user
            .worker_profile
            .as_ref()
            .map(|w| w.modules())
            .unwrap_or_default()
            .into_iter()
            .map(|m| item(m.label(), m.route()))
            .collect(),
        Role::Representante => match resolver.resolve(user).landing {
            Landing::LinkedCourier { .. } => COURIER_MENU.to_vec(),
            Landing::LinkedEcommerce { .. } => ECOMMERCE_MENU.to_vec(),
            _ => {
                let label = resolver.roles().label(role).unwrap_or(role.as_str());
                vec![item(label, resolver.roles().default_path(role))]
            }
        },
    }
}
