use super::{SubmitOutcome, password_feedback, registration_error_message};
use crate::auth::{CredentialVerifier, Registration};
use crate::models::Role;
use crate::session::SessionEvent;
use tracing::{debug, warn};

/// State behind the registration screen
#[derive(Debug)]
pub struct RegisterForm {
    first_name: String,
    last_name: String,
    email: String,
    password: String,
    role: Role,
    password_error: Option<&'static str>,
    error: Option<&'static str>,
}

impl Default for RegisterForm {
    fn default() -> Self {
        Self {
            first_name: String::new(),
            last_name: String::new(),
            email: String::new(),
            password: String::new(),
            role: Role::Visitor,
            password_error: None,
            error: None,
        }
    }
}

impl RegisterForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_first_name(&mut self, value: impl Into<String>) {
        self.first_name = value.into();
    }

    pub fn set_last_name(&mut self, value: impl Into<String>) {
        self.last_name = value.into();
    }

    pub fn set_email(&mut self, value: impl Into<String>) {
        self.email = value.into();
    }

    pub fn set_password(&mut self, value: impl Into<String>) {
        self.password = value.into();
        self.password_error = password_feedback(&self.password);
    }

    pub fn set_role(&mut self, role: Role) {
        self.role = role;
    }

    pub fn role(&self) -> &Role {
        &self.role
    }

    pub fn password_error(&self) -> Option<&'static str> {
        self.password_error
    }

    pub fn error(&self) -> Option<&'static str> {
        self.error
    }

    pub fn can_submit(&self) -> bool {
        !self.first_name.trim().is_empty()
            && !self.last_name.trim().is_empty()
            && !self.email.trim().is_empty()
            && self.role.is_recognized()
            && password_feedback(&self.password).is_none()
    }

    pub async fn submit(&mut self, verifier: &dyn CredentialVerifier) -> SubmitOutcome {
        self.password_error = password_feedback(&self.password);
        if !self.can_submit() {
            debug!("Registration blocked by client-side validation");
            return SubmitOutcome::Blocked;
        }

        self.error = None;
        let registration = Registration {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            email: self.email.trim().to_string(),
            password: self.password.clone(),
            role: self.role.clone(),
        };

        match verifier.register(&registration).await {
            Ok(grant) => {
                self.password.clear();
                SubmitOutcome::Succeeded(SessionEvent::LoggedIn {
                    identity: grant.identity,
                    token: grant.token,
                })
            }
            Err(e) => {
                warn!("Registration failed for {}: {}", registration.email, e);
                let message = registration_error_message(&e);
                self.error = Some(message);
                SubmitOutcome::Failed(message)
            }
        }
    }
}
