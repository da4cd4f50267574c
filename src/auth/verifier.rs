// Contract with the remote auth service

use crate::models::{Identity, Role, SessionToken};
use async_trait::async_trait;

/// Identity and token issued by a successful login or registration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthGrant {
    pub identity: Identity,
    pub token: SessionToken,
}

/// Details submitted by the registration form
#[derive(Debug, Clone)]
pub struct Registration {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

/// Failures reported by a credential verifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifierError {
    /// Unknown email or wrong password
    InvalidCredentials,
    /// Too many attempts; retry-after in seconds when the server sent one
    RateLimited { retry_after: Option<u64> },
    EmailAlreadyRegistered,
    /// Registration input refused by the server
    RegistrationRejected(String),
    /// Token expired, malformed or revoked
    InvalidToken,
    /// Network or transport failure, or the service is down
    Unreachable(String),
    /// The service answered successfully but the body was unusable
    MalformedResponse(String),
}

impl std::fmt::Display for VerifierError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VerifierError::InvalidCredentials => write!(f, "Invalid credentials"),
            VerifierError::RateLimited {
                retry_after: Some(secs),
            } => write!(f, "Rate limited, retry after {}s", secs),
            VerifierError::RateLimited { retry_after: None } => write!(f, "Rate limited"),
            VerifierError::EmailAlreadyRegistered => write!(f, "Email already registered"),
            VerifierError::RegistrationRejected(msg) => {
                write!(f, "Registration rejected: {}", msg)
            }
            VerifierError::InvalidToken => write!(f, "Invalid token"),
            VerifierError::Unreachable(msg) => write!(f, "Auth service unreachable: {}", msg),
            VerifierError::MalformedResponse(msg) => {
                write!(f, "Malformed auth service response: {}", msg)
            }
        }
    }
}

impl std::error::Error for VerifierError {}

/// Exchanges credentials for identities and validates stored tokens
#[async_trait]
pub trait CredentialVerifier: Send + Sync {
    /// Log in with email and password
    async fn authenticate(&self, email: &str, password: &str)
    -> Result<AuthGrant, VerifierError>;

    /// Create an account and log it in
    async fn register(&self, registration: &Registration) -> Result<AuthGrant, VerifierError>;

    /// Resolve a previously issued token back to its identity
    async fn verify(&self, token: &SessionToken) -> Result<Identity, VerifierError>;
}
