// What a navigation ends up showing

use super::dispatch::{View, dispatch};
use super::guard::{GuardDecision, RouteGuard};
use super::routes::Route;
use crate::models::Identity;
use crate::session::SessionState;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    /// Nothing rendered: verification pending or no view for the role
    Blank,
    Redirect(Route),
    Dashboard { view: View, identity: Identity },
    Login,
    Register,
    NotFound,
}

/// Resolve a route against the current session
pub fn resolve(route: Route, state: &SessionState, guard: &RouteGuard) -> Screen {
    if route.is_protected() {
        return match guard.check(state) {
            GuardDecision::Wait => Screen::Blank,
            GuardDecision::Redirect(target) => Screen::Redirect(target),
            GuardDecision::Allow(identity) => match dispatch(identity) {
                Some(view) => Screen::Dashboard {
                    view,
                    identity: identity.clone(),
                },
                None => Screen::Blank,
            },
        };
    }

    match route {
        Route::Login => Screen::Login,
        Route::Register => Screen::Register,
        _ => Screen::NotFound,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;

    fn authenticated(role: Role) -> SessionState {
        SessionState::Authenticated(Identity {
            id: None,
            first_name: "Sam".to_string(),
            last_name: "Doe".to_string(),
            email: "sam@example.com".to_string(),
            role,
        })
    }

    #[test]
    fn test_home_follows_guard() {
        let guard = RouteGuard::default();

        assert_eq!(
            resolve(Route::Home, &SessionState::Uninitialized, &guard),
            Screen::Blank
        );
        assert_eq!(
            resolve(Route::Home, &SessionState::Anonymous, &guard),
            Screen::Redirect(Route::Login)
        );
        assert!(matches!(
            resolve(Route::Home, &authenticated(Role::Admin), &guard),
            Screen::Dashboard {
                view: View::AdminDashboard,
                ..
            }
        ));
    }

    #[test]
    fn test_home_with_unknown_role_is_blank() {
        let state = authenticated(Role::parse("superuser"));
        assert_eq!(
            resolve(Route::Home, &state, &RouteGuard::default()),
            Screen::Blank
        );
    }

    #[test]
    fn test_public_routes_ignore_session() {
        let guard = RouteGuard::default();
        for state in [
            SessionState::Uninitialized,
            SessionState::Anonymous,
            authenticated(Role::Visitor),
        ] {
            assert_eq!(resolve(Route::Login, &state, &guard), Screen::Login);
            assert_eq!(resolve(Route::Register, &state, &guard), Screen::Register);
            assert_eq!(resolve(Route::NotFound, &state, &guard), Screen::NotFound);
        }
    }
}
