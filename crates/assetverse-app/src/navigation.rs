//! Role-gated dashboard navigation.
//!
//! Two fixed link sets, picked wholesale by role, and the redirect rule evaluated when
//! the dashboard is entered.

use crate::session::SessionState;
use assetverse_core::constants::*;
use assetverse_core::{NavIcon, NavLink, Role};

pub const HR_LINKS: [NavLink; 7] = [
    NavLink::new(HR_HOME_ROUTE, "Dashboard", NavIcon::Dashboard),
    NavLink::new(ASSET_LIST_ROUTE, "Asset List", NavIcon::AssetList),
    NavLink::new(ADD_ASSET_ROUTE, "Add Asset", NavIcon::AddAsset),
    NavLink::new(ALL_REQUESTS_ROUTE, "All Requests", NavIcon::Requests),
    NavLink::new(EMPLOYEE_LIST_ROUTE, "My Employees", NavIcon::Employees),
    NavLink::new(UPGRADE_PACKAGE_ROUTE, "Upgrade Package", NavIcon::Upgrade),
    NavLink::new(PROFILE_ROUTE, "Profile", NavIcon::Profile),
];

pub const EMPLOYEE_LINKS: [NavLink; 5] = [
    NavLink::new(EMPLOYEE_HOME_ROUTE, "Dashboard", NavIcon::Dashboard),
    NavLink::new(MY_ASSETS_ROUTE, "My Assets", NavIcon::MyAssets),
    NavLink::new(REQUEST_ASSET_ROUTE, "Request Asset", NavIcon::RequestAsset),
    NavLink::new(MY_TEAM_ROUTE, "My Team", NavIcon::Team),
    NavLink::new(PROFILE_ROUTE, "Profile", NavIcon::Profile),
];

/// Link set for a role. No role renders the employee set; access is enforced by
/// [`resolve_dashboard_route`], not by the menu.
pub fn links_for(role: Option<Role>) -> &'static [NavLink] {
    match role {
        Some(Role::Hr) => &HR_LINKS,
        Some(Role::Employee) | None => &EMPLOYEE_LINKS,
    }
}

/// Role-specific dashboard home.
pub fn home_route(role: Role) -> &'static str {
    match role {
        Role::Hr => HR_HOME_ROUTE,
        Role::Employee => EMPLOYEE_HOME_ROUTE,
    }
}

/// What the dashboard shell should do for the current route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    /// Session restore still running; show a spinner and decide nothing yet.
    ShowLoading,
    Redirect(&'static str),
    Render,
}

/// Strip query, fragment and trailing slashes: `/dashboard/?tab=1` -> `/dashboard`.
fn normalize(route: &str) -> &str {
    let path = route.split(['?', '#']).next().unwrap_or_default();
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/"
    } else {
        trimmed
    }
}

/// Dashboard entry rule. Deterministic; evaluating it on the redirect target yields
/// [`RouteDecision::Render`].
pub fn resolve_dashboard_route(current_route: &str, state: &SessionState) -> RouteDecision {
    if state.loading {
        return RouteDecision::ShowLoading;
    }
    let Some(session) = state.session.as_ref() else {
        return if normalize(current_route) == LOGIN_ROUTE {
            RouteDecision::Render
        } else {
            RouteDecision::Redirect(LOGIN_ROUTE)
        };
    };
    match normalize(current_route) {
        DASHBOARD_ROOT | DASHBOARD_HOME_ALIAS => RouteDecision::Redirect(home_route(session.role)),
        _ => RouteDecision::Render,
    }
}

/// Evaluates [`resolve_dashboard_route`] whenever the route or session changes and
/// reports a navigation only once per distinct input.
#[derive(Debug, Default)]
pub struct DashboardGuard {
    last_input: Option<(String, bool, Option<Role>, bool)>,
}

impl DashboardGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// `Some(target)` when the shell must navigate; `None` when it should stay put or
    /// the inputs have not changed since the last evaluation.
    pub fn evaluate(&mut self, current_route: &str, state: &SessionState) -> Option<&'static str> {
        let input = (
            normalize(current_route).to_string(),
            state.loading,
            state.role(),
            state.is_signed_in(),
        );
        if self.last_input.as_ref() == Some(&input) {
            return None;
        }
        self.last_input = Some(input);

        match resolve_dashboard_route(current_route, state) {
            RouteDecision::Redirect(target) => {
                tracing::debug!(from = current_route, to = target, "Dashboard redirect");
                Some(target)
            }
            RouteDecision::ShowLoading | RouteDecision::Render => None,
        }
    }
}
