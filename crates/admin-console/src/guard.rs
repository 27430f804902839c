//! Route guard: decides whether a path's content may be shown and where to
//! send the user when it may not.

use crate::{
    abstract_trait::NavigatorTrait,
    domain::{PermissionSet, Requirement},
    menu::{MenuItem, MenuSection},
    resolver::ScopeState,
};
use tracing::{debug, info};

pub const ROOT_PATH: &str = "/";

/// Drops query, fragment and trailing slashes. The root stays `/`.
pub fn normalize_path(pathname: &str) -> &str {
    let end = pathname.find(['?', '#']).unwrap_or(pathname.len());
    let trimmed = pathname[..end].trim_end_matches('/');

    if trimmed.is_empty() {
        ROOT_PATH
    } else {
        trimmed
    }
}

fn governs(entry: &str, path: &str) -> bool {
    let entry = normalize_path(entry);
    match path.strip_prefix(entry) {
        Some("") => true,
        Some(rest) => rest.starts_with('/') || entry == ROOT_PATH,
        None => false,
    }
}

/// The most specific gated menu entry covering `pathname`.
pub fn find_guard_entry<'a>(menu: &'a [MenuSection], pathname: &str) -> Option<&'a MenuItem> {
    let path = normalize_path(pathname);

    menu.iter()
        .flat_map(|section| section.children.iter())
        .filter(|item| item.permission.is_gated() && governs(item.path, path))
        .max_by_key(|item| normalize_path(item.path).len())
}

/// `None` means the path is ungated.
pub fn get_permission_for_path(pathname: &str, menu: &[MenuSection]) -> Option<Requirement> {
    find_guard_entry(menu, pathname).map(|item| item.permission.requirement())
}

/// First gated entry, in declared order, that `permissions` satisfies.
pub fn get_first_accessible_route(
    menu: &[MenuSection],
    permissions: &PermissionSet,
) -> Option<&'static str> {
    menu.iter()
        .flat_map(|section| section.children.iter())
        .find(|item| item.permission.granted_by(permissions))
        .map(|item| item.path)
}

pub fn redirect_target(menu: &[MenuSection], permissions: &PermissionSet, current: &str) -> String {
    match get_first_accessible_route(menu, permissions) {
        Some(path) if path != normalize_path(current) => path.to_string(),
        _ => ROOT_PATH.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardView {
    Loading,
    Content,
    Unauthorized { redirect_to: String },
    Redirecting,
}

/// Per-page guard state. The redirect fires once per denied path; only a
/// change of path re-arms it.
#[derive(Debug, Default)]
pub struct RouteGuard {
    has_redirected: bool,
    observed_path: Option<String>,
}

impl RouteGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_redirected(&self) -> bool {
        self.has_redirected
    }

    pub fn render(
        &mut self,
        pathname: &str,
        state: &ScopeState,
        menu: &[MenuSection],
        navigator: &dyn NavigatorTrait,
    ) -> GuardView {
        let path = normalize_path(pathname);

        if self.observed_path.as_deref() != Some(path) {
            self.observed_path = Some(path.to_string());
            self.has_redirected = false;
        }

        let Some(requirement) = get_permission_for_path(path, menu) else {
            return GuardView::Content;
        };

        let snapshot = match state {
            ScopeState::Loading => return GuardView::Loading,
            ScopeState::Ready(snapshot) => snapshot,
        };

        if snapshot.is_allowed(&requirement) {
            return GuardView::Content;
        }

        if self.has_redirected {
            debug!("Redirect for {path} already issued");
            return GuardView::Redirecting;
        }

        let target = redirect_target(menu, snapshot.permissions(), path);
        info!("Access to {path} denied, redirecting to {target}");

        self.has_redirected = true;
        navigator.navigate(&target);

        GuardView::Unauthorized {
            redirect_to: target,
        }
    }
}
