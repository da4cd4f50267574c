// Login and registration form controllers

pub mod login;
pub mod register;

pub use login::LoginForm;
pub use register::RegisterForm;

use crate::auth::{PASSWORD_REQUIREMENTS, VerifierError, is_acceptable_password};
use crate::session::SessionEvent;

pub const TRY_AGAIN_LATER: &str = "Too many attempts. Try again later.";
pub const INVALID_CREDENTIALS: &str = "Invalid credentials. Please try again.";
pub const REGISTRATION_FAILED: &str = "Registration failed. Please try again.";

/// Result of pressing submit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Client-side validation failed; nothing was sent
    Blocked,
    /// The verifier refused; carries the message shown to the user
    Failed(&'static str),
    /// Hand this to the session store, then navigate home
    Succeeded(SessionEvent),
}

/// User-facing message for a failed login. Only rate limiting is told
/// apart from everything else.
pub fn login_error_message(err: &VerifierError) -> &'static str {
    match err {
        VerifierError::RateLimited { .. } => TRY_AGAIN_LATER,
        _ => INVALID_CREDENTIALS,
    }
}

/// User-facing message for a failed registration
pub fn registration_error_message(err: &VerifierError) -> &'static str {
    match err {
        VerifierError::RateLimited { .. } => TRY_AGAIN_LATER,
        _ => REGISTRATION_FAILED,
    }
}

/// Per-keystroke password feedback
fn password_feedback(password: &str) -> Option<&'static str> {
    if is_acceptable_password(password) {
        None
    } else {
        Some(PASSWORD_REQUIREMENTS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_rate_limiting_is_distinguished_on_login() {
        assert_eq!(
            login_error_message(&VerifierError::RateLimited { retry_after: Some(30) }),
            TRY_AGAIN_LATER
        );
        for err in [
            VerifierError::InvalidCredentials,
            VerifierError::Unreachable("timeout".to_string()),
            VerifierError::MalformedResponse("no token".to_string()),
        ] {
            assert_eq!(login_error_message(&err), INVALID_CREDENTIALS);
        }
    }

    #[test]
    fn test_registration_failures_are_generic() {
        for err in [
            VerifierError::EmailAlreadyRegistered,
            VerifierError::RegistrationRejected("bad role".to_string()),
            VerifierError::Unreachable("refused".to_string()),
        ] {
            assert_eq!(registration_error_message(&err), REGISTRATION_FAILED);
        }
    }
}
