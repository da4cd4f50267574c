use crate::models::{Claims, Role};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};

/// Issues and validates the HS256 tokens handed out by the auth service
#[derive(Clone)]
pub struct TokenIssuer {
    secret: String,
    expiration_secs: i64,
}

impl TokenIssuer {
    pub fn new(secret: impl Into<String>, expiration_secs: i64) -> Self {
        Self {
            secret: secret.into(),
            expiration_secs,
        }
    }

    pub fn create_token(
        &self,
        account_id: &str,
        email: &str,
        role: &Role,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let claims = Claims {
            sub: account_id.to_string(),
            email: email.to_string(),
            role: role.clone(),
            exp: (Utc::now() + Duration::seconds(self.expiration_secs)).timestamp() as usize,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
    }

    pub fn validate_token(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(token_data.claims)
    }
}
