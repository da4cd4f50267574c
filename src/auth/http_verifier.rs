// Credential verifier backed by the remote auth service over HTTP

use super::verifier::{AuthGrant, CredentialVerifier, Registration, VerifierError};
use crate::config::AuthServiceConfig;
use crate::models::{
    AuthResponse, Identity, IdentityPayload, LoginRequest, RegisterRequest, SessionToken,
};
use async_trait::async_trait;
use reqwest::{Response, StatusCode, header};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Which call a response belongs to; decides how 4xx statuses are read
#[derive(Debug, Clone, Copy)]
enum Call {
    Login,
    Register,
    Verify,
}

pub struct HttpVerifier {
    client: reqwest::Client,
    base_url: String,
}

impl HttpVerifier {
    pub fn new(config: &AuthServiceConfig) -> Result<Self, VerifierError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| VerifierError::Unreachable(format!("Failed to build client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn read_grant(&self, call: Call, response: Response) -> Result<AuthGrant, VerifierError> {
        let response = check_status(call, response).await?;

        let body: AuthResponse = response
            .json()
            .await
            .map_err(|e| VerifierError::MalformedResponse(e.to_string()))?;

        match (body.user, body.token) {
            (Some(user), Some(token)) if !token.trim().is_empty() => Ok(AuthGrant {
                identity: Identity::from(user),
                token: SessionToken::new(token),
            }),
            _ => Err(VerifierError::MalformedResponse(
                "Response is missing user or token".to_string(),
            )),
        }
    }
}

#[async_trait]
impl CredentialVerifier for HttpVerifier {
    async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthGrant, VerifierError> {
        debug!("Authenticating {} against {}", email, self.base_url);

        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };

        let response = self
            .client
            .post(self.url("login"))
            .json(&request)
            .send()
            .await
            .map_err(transport_error)?;

        let grant = self.read_grant(Call::Login, response).await?;
        info!("Authenticated {} as {}", email, grant.identity.role);
        Ok(grant)
    }

    async fn register(&self, registration: &Registration) -> Result<AuthGrant, VerifierError> {
        debug!("Registering {} against {}", registration.email, self.base_url);

        let request = RegisterRequest {
            first_name: registration.first_name.clone(),
            last_name: registration.last_name.clone(),
            email: registration.email.clone(),
            password: registration.password.clone(),
            role: registration.role.clone(),
        };

        let response = self
            .client
            .post(self.url("register"))
            .json(&request)
            .send()
            .await
            .map_err(transport_error)?;

        let grant = self.read_grant(Call::Register, response).await?;
        info!("Registered {} as {}", registration.email, grant.identity.role);
        Ok(grant)
    }

    async fn verify(&self, token: &SessionToken) -> Result<Identity, VerifierError> {
        let response = self
            .client
            .get(self.url("verify"))
            .header(header::AUTHORIZATION, token.bearer())
            .send()
            .await
            .map_err(transport_error)?;

        let response = check_status(Call::Verify, response).await?;

        let payload: IdentityPayload = response
            .json()
            .await
            .map_err(|e| VerifierError::MalformedResponse(e.to_string()))?;

        Ok(Identity::from(payload))
    }
}

fn transport_error(err: reqwest::Error) -> VerifierError {
    warn!("Auth service request failed: {}", err);
    VerifierError::Unreachable(err.to_string())
}

/// Map a non-success status onto the verifier taxonomy
async fn check_status(call: Call, response: Response) -> Result<Response, VerifierError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let retry_after = response
        .headers()
        .get(header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok());

    debug!("Auth service answered {} to {:?}", status, call);

    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(VerifierError::RateLimited { retry_after });
    }
    if status.is_server_error() {
        return Err(VerifierError::Unreachable(format!(
            "Auth service returned status: {}",
            status
        )));
    }

    Err(match call {
        Call::Login => VerifierError::InvalidCredentials,
        Call::Verify => VerifierError::InvalidToken,
        Call::Register if status == StatusCode::CONFLICT => VerifierError::EmailAlreadyRegistered,
        Call::Register => {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| status.to_string());
            VerifierError::RegistrationRejected(message)
        }
    })
}
