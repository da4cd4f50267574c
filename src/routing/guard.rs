// Access gate in front of protected views

use super::routes::Route;
use crate::models::Identity;
use crate::session::SessionState;

/// What a protected route should do for the current session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision<'a> {
    /// Verification still pending: render nothing and do not redirect yet
    Wait,
    Redirect(Route),
    Allow(&'a Identity),
}

#[derive(Debug, Clone, Copy)]
pub struct RouteGuard {
    login_route: Route,
}

impl Default for RouteGuard {
    fn default() -> Self {
        Self {
            login_route: Route::Login,
        }
    }
}

impl RouteGuard {
    pub fn check<'a>(&self, state: &'a SessionState) -> GuardDecision<'a> {
        match state {
            SessionState::Uninitialized => GuardDecision::Wait,
            SessionState::Anonymous => GuardDecision::Redirect(self.login_route),
            SessionState::Authenticated(identity) => GuardDecision::Allow(identity),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;

    #[test]
    fn test_uninitialized_waits_without_redirect() {
        let guard = RouteGuard::default();
        assert_eq!(
            guard.check(&SessionState::Uninitialized),
            GuardDecision::Wait
        );
    }

    #[test]
    fn test_anonymous_redirects_to_login() {
        let guard = RouteGuard::default();
        assert_eq!(
            guard.check(&SessionState::Anonymous),
            GuardDecision::Redirect(Route::Login)
        );
    }

    #[test]
    fn test_authenticated_is_allowed() {
        let identity = Identity {
            id: None,
            first_name: "Ada".to_string(),
            last_name: "Byron".to_string(),
            email: "ada@example.com".to_string(),
            role: Role::Visitor,
        };
        let state = SessionState::Authenticated(identity.clone());

        assert_eq!(
            RouteGuard::default().check(&state),
            GuardDecision::Allow(&identity)
        );
    }
}
