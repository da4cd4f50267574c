pub mod http_verifier;
pub mod jwt;
pub mod password;
pub mod verifier;

pub use http_verifier::HttpVerifier;
pub use jwt::TokenIssuer;
pub use password::{
    PASSWORD_REQUIREMENTS, PasswordRequirement, check_password, is_acceptable_password,
};
pub use verifier::{AuthGrant, CredentialVerifier, Registration, VerifierError};
