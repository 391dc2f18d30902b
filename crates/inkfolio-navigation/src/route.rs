use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Route {
    #[serde(rename = "/")]
    Home,
    #[serde(rename = "/about")]
    About,
    #[serde(rename = "/projects")]
    Projects,
    #[serde(rename = "/contact")]
    Contact,
}

impl Route {
    pub const ALL: [Route; 4] = [Route::Home, Route::About, Route::Projects, Route::Contact];

    pub fn path(self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::About => "/about",
            Route::Projects => "/projects",
            Route::Contact => "/contact",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Route::Home => "Accueil",
            Route::About => "À Propos",
            Route::Projects => "Projets",
            Route::Contact => "Contact",
        }
    }

    /// Resolves a location. Query string, fragment and a trailing slash are
    /// ignored; anything unrecognized lands on the home page.
    pub fn from_path(path: &str) -> Route {
        let path = path
            .split(['?', '#'])
            .next()
            .unwrap_or_default();
        let trimmed = path.trim_end_matches('/');
        let route = Route::ALL
            .into_iter()
            .find(|r| r.path().trim_end_matches('/') == trimmed);
        match route {
            Some(r) => r,
            None => {
                log::warn!("unknown route {path:?}, falling back to /");
                Route::Home
            }
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NavItem {
    pub route: Route,
    pub label: &'static str,
    pub active: bool,
}

/// Navigation bar entries in display order, the current route marked active.
pub fn nav_items(current: Route) -> Vec<NavItem> {
    Route::ALL
        .into_iter()
        .map(|route| NavItem {
            route,
            label: route.label(),
            active: route == current,
        })
        .collect()
}
