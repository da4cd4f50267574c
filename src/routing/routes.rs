use std::fmt;

/// Navigable locations of the portal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    /// `/`, the role-dispatched dashboard
    Home,
    Login,
    Register,
    NotFound,
}

impl Route {
    /// Map a path to a route. Query strings, fragments and a trailing slash
    /// are ignored.
    pub fn parse(path: &str) -> Self {
        let path = path
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .trim();
        let path = match path.trim_end_matches('/') {
            "" => "/",
            trimmed => trimmed,
        };

        match path {
            "/" => Route::Home,
            "/login" => Route::Login,
            "/register" => Route::Register,
            _ => Route::NotFound,
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::Login => "/login",
            Route::Register => "/register",
            Route::NotFound => "/404",
        }
    }

    /// Whether the route sits behind the guard
    pub fn is_protected(&self) -> bool {
        matches!(self, Route::Home)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}
