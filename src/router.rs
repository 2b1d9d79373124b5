use crate::session::Role;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Landing,
    Login,
    Citizen,
    Hospital,
}

impl Route {
    pub const ALL: [Route; 4] = [Route::Landing, Route::Login, Route::Citizen, Route::Hospital];

    /// Exact-path match; a trailing slash is tolerated, query strings are not routed.
    pub fn from_path(path: &str) -> Option<Route> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let trimmed = path.trim_end_matches('/');
        match trimmed {
            "" => Some(Route::Landing),
            "/login" => Some(Route::Login),
            "/citizen" => Some(Route::Citizen),
            "/hospital" => Some(Route::Hospital),
            _ => None,
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            Route::Landing => "/",
            Route::Login => "/login",
            Route::Citizen => "/citizen",
            Route::Hospital => "/hospital",
        }
    }

    pub fn dashboard_for(role: Role) -> Route {
        match role {
            Role::Citizen => Route::Citizen,
            Role::Hospital => Route::Hospital,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}
