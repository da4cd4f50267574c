use super::{SubmitOutcome, login_error_message, password_feedback};
use crate::auth::CredentialVerifier;
use crate::session::SessionEvent;
use tracing::{debug, warn};

/// State behind the login screen.
///
/// `submit` takes `&mut self`, so a form cannot have two attempts in flight.
#[derive(Debug, Default)]
pub struct LoginForm {
    email: String,
    password: String,
    password_error: Option<&'static str>,
    error: Option<&'static str>,
}

impl LoginForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_email(&mut self, email: impl Into<String>) {
        self.email = email.into();
    }

    /// Update the password and re-check it
    pub fn set_password(&mut self, password: impl Into<String>) {
        self.password = password.into();
        self.password_error = password_feedback(&self.password);
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password_error(&self) -> Option<&'static str> {
        self.password_error
    }

    pub fn error(&self) -> Option<&'static str> {
        self.error
    }

    pub fn can_submit(&self) -> bool {
        !self.email.trim().is_empty() && password_feedback(&self.password).is_none()
    }

    pub async fn submit(&mut self, verifier: &dyn CredentialVerifier) -> SubmitOutcome {
        self.password_error = password_feedback(&self.password);
        if !self.can_submit() {
            debug!("Login blocked by client-side validation");
            return SubmitOutcome::Blocked;
        }

        self.error = None;
        let email = self.email.trim().to_string();

        match verifier.authenticate(&email, &self.password).await {
            Ok(grant) => {
                self.password.clear();
                SubmitOutcome::Succeeded(SessionEvent::LoggedIn {
                    identity: grant.identity,
                    token: grant.token,
                })
            }
            Err(e) => {
                warn!("Login failed for {}: {}", email, e);
                let message = login_error_message(&e);
                self.error = Some(message);
                SubmitOutcome::Failed(message)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{AuthGrant, PASSWORD_REQUIREMENTS, Registration, VerifierError};
    use crate::forms::{INVALID_CREDENTIALS, TRY_AGAIN_LATER};
    use crate::models::{Identity, Role, SessionToken};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedLogin {
        outcome: Result<AuthGrant, VerifierError>,
        calls: AtomicUsize,
    }

    impl FixedLogin {
        fn new(outcome: Result<AuthGrant, VerifierError>) -> Self {
            Self {
                outcome,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl CredentialVerifier for FixedLogin {
        async fn authenticate(&self, _: &str, _: &str) -> Result<AuthGrant, VerifierError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.outcome.clone()
        }

        async fn register(&self, _: &Registration) -> Result<AuthGrant, VerifierError> {
            Err(VerifierError::Unreachable("not used".to_string()))
        }

        async fn verify(&self, _: &SessionToken) -> Result<Identity, VerifierError> {
            Err(VerifierError::InvalidToken)
        }
    }

    fn grant() -> AuthGrant {
        AuthGrant {
            identity: Identity {
                id: None,
                first_name: "Ada".to_string(),
                last_name: "Byron".to_string(),
                email: "ada@example.com".to_string(),
                role: Role::Visitor,
            },
            token: SessionToken::new("issued"),
        }
    }

    #[test]
    fn test_password_feedback_on_every_keystroke() {
        let mut form = LoginForm::new();

        form.set_password("A");
        assert_eq!(form.password_error(), Some(PASSWORD_REQUIREMENTS));

        form.set_password("Abc123!!");
        assert_eq!(form.password_error(), None);

        form.set_password("Abc123!");
        assert_eq!(form.password_error(), Some(PASSWORD_REQUIREMENTS));
    }

    #[tokio::test]
    async fn test_weak_password_never_reaches_verifier() {
        let verifier = FixedLogin::new(Ok(grant()));
        let mut form = LoginForm::new();
        form.set_email("ada@example.com");
        form.set_password("abc123!!");

        assert_eq!(form.submit(&verifier).await, SubmitOutcome::Blocked);
        assert_eq!(verifier.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_successful_login_yields_event() {
        let verifier = FixedLogin::new(Ok(grant()));
        let mut form = LoginForm::new();
        form.set_email(" ada@example.com ");
        form.set_password("Abc123!!");

        let outcome = form.submit(&verifier).await;
        assert_eq!(
            outcome,
            SubmitOutcome::Succeeded(SessionEvent::LoggedIn {
                identity: grant().identity,
                token: SessionToken::new("issued"),
            })
        );
        assert!(form.error().is_none());
    }

    #[tokio::test]
    async fn test_rate_limited_login_message() {
        let verifier = FixedLogin::new(Err(VerifierError::RateLimited { retry_after: None }));
        let mut form = LoginForm::new();
        form.set_email("ada@example.com");
        form.set_password("Abc123!!");

        assert_eq!(
            form.submit(&verifier).await,
            SubmitOutcome::Failed(TRY_AGAIN_LATER)
        );
        assert_eq!(form.error(), Some(TRY_AGAIN_LATER));
    }

    #[tokio::test]
    async fn test_other_failures_are_generic() {
        let verifier = FixedLogin::new(Err(VerifierError::InvalidCredentials));
        let mut form = LoginForm::new();
        form.set_email("ada@example.com");
        form.set_password("Abc123!!");

        assert_eq!(
            form.submit(&verifier).await,
            SubmitOutcome::Failed(INVALID_CREDENTIALS)
        );
    }
}
