//! Route table and navigation guard.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every navigation resolves a path against [`ROUTES`], follows static
//! redirects, then runs [`guard`] against the current user. Guard redirects
//! are navigations in their own right, so they are guarded too. The user is
//! passed in by the caller from the user store; the router never reads
//! storage itself.

#[cfg(test)]
#[path = "router_test.rs"]
mod router_test;

use crate::net::types::User;

pub const LOGIN_PATH: &str = "/login";
pub const DASHBOARD_PATH: &str = "/dashboard";

/// Redirect hops allowed before a navigation is declared a loop.
const MAX_REDIRECTS: usize = 4;

/// Screens the dashboard can show.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Page {
    Login,
    Register,
    Dashboard,
    Map,
    Ocean,
    Admin,
}

impl Page {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::Register => "register",
            Self::Dashboard => "dashboard",
            Self::Map => "map",
            Self::Ocean => "ocean",
            Self::Admin => "admin",
        }
    }
}

/// Access-control and display metadata attached to a route.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RouteMeta {
    pub requires_auth: bool,
    pub requires_admin: bool,
    pub title: Option<&'static str>,
}

impl RouteMeta {
    const PUBLIC: Self = Self { requires_auth: false, requires_admin: false, title: None };

    const fn authed(title: &'static str) -> Self {
        Self { requires_auth: true, requires_admin: false, title: Some(title) }
    }

    const fn admin(title: &'static str) -> Self {
        Self { requires_auth: true, requires_admin: true, title: Some(title) }
    }
}

/// What a route leads to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RouteTarget {
    Page(Page),
    /// Unconditional redirect to another path, applied before any guard.
    Redirect(&'static str),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Route {
    pub path: &'static str,
    pub target: RouteTarget,
    pub meta: RouteMeta,
}

/// The application's routes.
pub static ROUTES: [Route; 7] = [
    Route { path: "/", target: RouteTarget::Redirect(DASHBOARD_PATH), meta: RouteMeta::PUBLIC },
    Route { path: LOGIN_PATH, target: RouteTarget::Page(Page::Login), meta: RouteMeta::PUBLIC },
    Route { path: "/register", target: RouteTarget::Page(Page::Register), meta: RouteMeta::PUBLIC },
    Route {
        path: DASHBOARD_PATH,
        target: RouteTarget::Page(Page::Dashboard),
        meta: RouteMeta::authed("Personal Center"),
    },
    Route { path: "/map", target: RouteTarget::Page(Page::Map), meta: RouteMeta::authed("Vessel Tracks") },
    Route { path: "/ocean", target: RouteTarget::Page(Page::Ocean), meta: RouteMeta::authed("Ocean Parameters") },
    Route { path: "/admin", target: RouteTarget::Page(Page::Admin), meta: RouteMeta::admin("Admin Panel") },
];

// =============================================================================
// GUARD
// =============================================================================

/// Verdict of the navigation guard for one route.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    Redirect(&'static str),
}

/// Decide whether `user` may enter a route carrying `meta`.
pub fn guard(meta: &RouteMeta, user: Option<&User>) -> GuardDecision {
    if meta.requires_auth && user.is_none() {
        return GuardDecision::Redirect(LOGIN_PATH);
    }
    if meta.requires_admin && !user.is_some_and(User::is_admin) {
        return GuardDecision::Redirect(DASHBOARD_PATH);
    }
    GuardDecision::Allow
}

// =============================================================================
// NAVIGATION
// =============================================================================

/// Result of a navigation attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Navigation {
    /// Show `page` at `path`. `redirected_from` holds the requested path when
    /// it differs from where the navigation ended up.
    Render {
        page: Page,
        path: &'static str,
        title: Option<&'static str>,
        redirected_from: Option<String>,
    },
    NotFound { path: String },
    RedirectLoop { path: String },
}

impl Navigation {
    /// Final path when a page renders.
    #[must_use]
    pub fn path(&self) -> Option<&'static str> {
        match self {
            Self::Render { path, .. } => Some(*path),
            _ => None,
        }
    }

    #[must_use]
    pub fn page(&self) -> Option<Page> {
        match self {
            Self::Render { page, .. } => Some(*page),
            _ => None,
        }
    }
}

/// Path matcher over a static route table.
#[derive(Clone, Copy, Debug)]
pub struct Router {
    routes: &'static [Route],
}

impl Default for Router {
    fn default() -> Self {
        Self::new(&ROUTES)
    }
}

impl Router {
    #[must_use]
    pub fn new(routes: &'static [Route]) -> Self {
        Self { routes }
    }

    #[must_use]
    pub fn routes(&self) -> &'static [Route] {
        self.routes
    }

    /// Route registered for `path`, ignoring query, fragment, and trailing `/`.
    #[must_use]
    pub fn resolve(&self, path: &str) -> Option<&'static Route> {
        let path = normalize_path(path);
        self.routes.iter().find(|route| route.path == path)
    }

    /// Navigate to `path` as `user`, following redirects until a page renders.
    #[must_use]
    pub fn navigate(&self, path: &str, user: Option<&User>) -> Navigation {
        let requested = normalize_path(path).to_owned();
        let mut current: &str = &requested;

        for _ in 0..=MAX_REDIRECTS {
            let Some(route) = self.resolve(current) else {
                tracing::debug!(path = current, "no route");
                return Navigation::NotFound { path: current.to_owned() };
            };
            let next = match route.target {
                RouteTarget::Redirect(to) => to,
                RouteTarget::Page(page) => match guard(&route.meta, user) {
                    GuardDecision::Allow => {
                        tracing::debug!(path = route.path, ?page, "navigation allowed");
                        return Navigation::Render {
                            page,
                            path: route.path,
                            title: route.meta.title,
                            redirected_from: (route.path != requested).then(|| requested.clone()),
                        };
                    }
                    GuardDecision::Redirect(to) => to,
                },
            };
            tracing::debug!(from = route.path, to = next, "navigation redirected");
            current = next;
        }

        tracing::warn!(path = %requested, "navigation exceeded redirect limit");
        Navigation::RedirectLoop { path: requested }
    }
}

/// Strip query string, fragment, and trailing slashes; empty becomes `/`.
#[must_use]
pub fn normalize_path(path: &str) -> &str {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() { "/" } else { trimmed }
}
