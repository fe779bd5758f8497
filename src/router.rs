//! Page routing: maps a hash-history path to the active view.
//!
//! Routes:
//! - `/`                 → redirect to `/Import`
//! - `/Import`           → workbook import page
//! - `/sheet/:sheetName` → inventory table for one sheet
//!
//! Matching is case-insensitive on the fixed segments. The side menu is not a
//! route; it is mounted next to whichever view is active.
//!
//! Hash-history route changes never reach the webview's navigation hook, so
//! the frontend router reports each change with a `route-changed` event
//! carrying `{ from, to }`.

use percent_encoding::{percent_decode_str, utf8_percent_encode, NON_ALPHANUMERIC};
use serde::Deserialize;

/// Event the frontend emits after every route change.
pub const ROUTE_CHANGED_EVENT: &str = "route-changed";

/// Path the app lands on.
pub const LANDING_PATH: &str = "/Import";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Route {
    #[default]
    Import,
    ViewExcel { sheet_name: String },
}

/// View components the shell can mount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    SideMenu,
    Import,
    ViewExcel,
}

impl Route {
    /// Resolve a path (optionally `#`-prefixed, optionally with a query).
    ///
    /// Returns `None` for paths no route matches.
    pub fn resolve(path: &str) -> Option<Route> {
        let path = path.strip_prefix('#').unwrap_or(path);
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            // Redirect: "/" → "/Import"
            [] => Some(Route::Import),
            [page] if page.eq_ignore_ascii_case("import") => Some(Route::Import),
            [prefix, raw] if prefix.eq_ignore_ascii_case("sheet") => {
                let sheet_name = percent_decode_str(raw).decode_utf8().ok()?.into_owned();
                Some(Route::ViewExcel { sheet_name })
            }
            _ => None,
        }
    }

    /// Route name as registered with the frontend router.
    pub fn name(&self) -> &'static str {
        match self {
            Route::Import => "ImportExcel",
            Route::ViewExcel { .. } => "ViewExcel",
        }
    }

    /// Canonical path, sheet name percent-encoded.
    pub fn path(&self) -> String {
        match self {
            Route::Import => LANDING_PATH.to_string(),
            Route::ViewExcel { sheet_name } => {
                format!("/sheet/{}", utf8_percent_encode(sheet_name, NON_ALPHANUMERIC))
            }
        }
    }

    /// Entry-page URL that opens this route with hash history.
    pub fn entry_url(&self) -> String {
        format!("index.html#{}", self.path())
    }

    pub fn view(&self) -> View {
        match self {
            Route::Import => View::Import,
            Route::ViewExcel { .. } => View::ViewExcel,
        }
    }

    /// The sheet parameter, if this route takes one.
    pub fn sheet_name(&self) -> Option<&str> {
        match self {
            Route::ViewExcel { sheet_name } => Some(sheet_name),
            Route::Import => None,
        }
    }
}

/// Components mounted for `route`: the side menu plus the active view.
pub fn layout(route: &Route) -> [View; 2] {
    [View::SideMenu, route.view()]
}

/// Payload of a `route-changed` event.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RouteChange {
    pub from: String,
    pub to: String,
}

/// Log a navigation between two paths, returning the route `to` resolves to.
pub fn log_navigation(from: &str, to: &str) -> Option<Route> {
    let route = Route::resolve(to);
    match &route {
        Some(r) => tracing::info!(from, to, route = r.name(), "router: navigating"),
        None => tracing::warn!(from, to, "router: no route matches"),
    }
    route
}

/// Handle the raw JSON payload of a `route-changed` event.
pub fn on_route_changed(payload: &str) -> Option<Route> {
    match serde_json::from_str::<RouteChange>(payload) {
        Ok(change) => log_navigation(&change.from, &change.to),
        Err(e) => {
            tracing::warn!(error = %e, payload, "router: malformed route-changed event");
            None
        }
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
