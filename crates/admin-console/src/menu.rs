//! Sidebar definition shared by the navigation endpoint and the route guard.
//!
//! Every access-controlled page appears here exactly once. Paths that are
//! not listed are ungated.

use crate::domain::{Requirement, permission::PermissionSet};
use crate::resolver::AccessSnapshot;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum RequiredPermission {
    Always,
    One(&'static str),
    AnyOf(&'static [&'static str]),
}

impl RequiredPermission {
    pub fn is_gated(&self) -> bool {
        !matches!(self, RequiredPermission::Always)
    }

    pub fn requirement(&self) -> Requirement {
        match self {
            RequiredPermission::Always => Requirement::None,
            RequiredPermission::One(p) => Requirement::one(p),
            RequiredPermission::AnyOf(ps) => Requirement::any_of(ps.iter()),
        }
    }

    pub fn names(&self) -> Option<Vec<String>> {
        match self {
            RequiredPermission::Always => None,
            RequiredPermission::One(p) => Some(vec![p.to_string()]),
            RequiredPermission::AnyOf(ps) => Some(ps.iter().map(|p| p.to_string()).collect()),
        }
    }

    /// Whether the raw permission set satisfies this entry. Ungated entries
    /// are not counted.
    pub fn granted_by(&self, permissions: &PermissionSet) -> bool {
        self.is_gated() && self.requirement().satisfied_by(permissions)
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct MenuItem {
    pub name: &'static str,
    pub icon: &'static str,
    pub path: &'static str,
    pub permission: RequiredPermission,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct MenuSection {
    pub label: &'static str,
    pub children: &'static [MenuItem],
}

const fn item(
    name: &'static str,
    icon: &'static str,
    path: &'static str,
    permission: RequiredPermission,
) -> MenuItem {
    MenuItem {
        name,
        icon,
        path,
        permission,
    }
}

pub static CONSOLE_MENU: &[MenuSection] = &[
    MenuSection {
        label: "Overview",
        children: &[item(
            "Dashboard",
            "layout-dashboard",
            "/dashboard",
            RequiredPermission::Always,
        )],
    },
    MenuSection {
        label: "Monitoring",
        children: &[
            item(
                "Alarms",
                "bell",
                "/alarms",
                RequiredPermission::One("alarms:read"),
            ),
            item(
                "Samples",
                "flask-conical",
                "/samples",
                RequiredPermission::One("samples:read"),
            ),
            item(
                "Recommendations",
                "lightbulb",
                "/recommendations",
                RequiredPermission::One("recommendations:read"),
            ),
        ],
    },
    MenuSection {
        label: "Assets",
        children: &[
            item(
                "Organizations",
                "building-2",
                "/organizations",
                RequiredPermission::One("organizations:read"),
            ),
            item(
                "Sites",
                "map-pin",
                "/sites",
                RequiredPermission::One("sites:read"),
            ),
            item(
                "Assets",
                "factory",
                "/assets",
                RequiredPermission::One("assets:read"),
            ),
            item(
                "Sampling Points",
                "crosshair",
                "/sampling-points",
                RequiredPermission::One("sampling_points:read"),
            ),
            item(
                "Sampling Routes",
                "route",
                "/sampling-routes",
                RequiredPermission::One("sampling_routes:read"),
            ),
        ],
    },
    MenuSection {
        label: "Administration",
        children: &[
            item(
                "Users",
                "users",
                "/users",
                RequiredPermission::One("users:read"),
            ),
            item(
                "Roles",
                "shield",
                "/roles",
                RequiredPermission::One("roles:read"),
            ),
            item(
                "Role Permissions",
                "key-round",
                "/roles/permissions",
                RequiredPermission::AnyOf(&["permissions:read", "roles:update"]),
            ),
            item(
                "Departments",
                "network",
                "/departments",
                RequiredPermission::One("departments:read"),
            ),
        ],
    },
];

#[derive(Debug, Clone, Serialize)]
pub struct VisibleSection {
    pub label: &'static str,
    pub children: Vec<MenuItem>,
}

/// Sidebar as seen by the current user. Sections left without items are
/// dropped.
pub fn visible_sections(menu: &[MenuSection], access: &AccessSnapshot) -> Vec<VisibleSection> {
    menu.iter()
        .filter_map(|section| {
            let children: Vec<MenuItem> = section
                .children
                .iter()
                .filter(|item| access.is_allowed(&item.permission.requirement()))
                .copied()
                .collect();

            (!children.is_empty()).then_some(VisibleSection {
                label: section.label,
                children,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn menu_paths_are_unique() {
        let mut seen = HashSet::new();
        for section in CONSOLE_MENU {
            for item in section.children {
                assert!(seen.insert(item.path), "duplicate menu path {}", item.path);
            }
        }
    }

    #[test]
    fn menu_permissions_parse() {
        for section in CONSOLE_MENU {
            for item in section.children {
                if let Requirement::AnyOf(required) = item.permission.requirement() {
                    assert!(!required.is_empty(), "{} has no valid permission", item.path);
                }
            }
        }
    }

    #[test]
    fn sidebar_hides_empty_sections() {
        let access = AccessSnapshot::for_permissions(PermissionSet::from_strings(["sites:read"]));
        let sections = visible_sections(CONSOLE_MENU, &access);

        let labels: Vec<_> = sections.iter().map(|s| s.label).collect();
        assert_eq!(labels, vec!["Overview", "Assets"]);
        assert_eq!(sections[1].children.len(), 1);
        assert_eq!(sections[1].children[0].path, "/sites");
    }

    #[test]
    fn any_of_entry_is_visible_with_either_permission() {
        let access =
            AccessSnapshot::for_permissions(PermissionSet::from_strings(["roles:update"]));
        let sections = visible_sections(CONSOLE_MENU, &access);

        let admin = sections
            .iter()
            .find(|s| s.label == "Administration")
            .unwrap();
        assert_eq!(admin.children[0].path, "/roles/permissions");
    }
}
