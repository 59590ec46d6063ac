use chrono::{TimeDelta, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use serde::{Deserialize, Serialize};

use crate::domain::{
    error::DomainError,
    models::account::Account,
    services::token_service::{Token, TokenGenerator},
};

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,   // Account ID
    pub email: String, // Normalised email
    pub rol: String,   // Role
    pub exp: i64,      // Expiration time
    pub iat: i64,      // Issued at
}

#[derive(Clone)]
pub struct JwtTokenGenerator {
    secret: String,
    expiration_hours: i64,
}

impl JwtTokenGenerator {
    pub fn with_expiration(secret: String, expiration_hours: i64) -> Self {
        Self {
            secret,
            expiration_hours,
        }
    }
}

impl TokenGenerator for JwtTokenGenerator {
    fn generate(&self, account: &Account) -> Result<Token, DomainError> {
        let now = Utc::now();
        let exp = TimeDelta::try_hours(self.expiration_hours)
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .ok_or_else(|| {
                DomainError::TokenGeneration(format!(
                    "Token lifetime of {} hours is out of range",
                    self.expiration_hours
                ))
            })?;

        let claims = Claims {
            sub: account.id().as_uuid().to_string(),
            email: account.email().as_str().to_string(),
            rol: account.role().as_str().to_string(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| DomainError::TokenGeneration(format!("Failed to generate token: {}", e)))
    }
}
