//! Caller identity.
//!
//! Session issuance lives elsewhere; this module only verifies the bearer
//! token a request arrives with and exposes the authenticated customer id to
//! handlers as an extractor.

use async_trait::async_trait;
use axum::extract::{FromRef, FromRequestParts};
use axum::http::{header, request::Parts};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::AppState;

/// Claims carried by customer tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Customer id
    pub sub: String,
    /// Expiry (unix seconds)
    pub exp: usize,
    /// Issued-at (unix seconds)
    #[serde(default)]
    pub iat: usize,
}

/// The authenticated customer attached to a request.
#[derive(Debug, Clone)]
pub struct AuthCustomer {
    pub customer_id: Uuid,
}

pub fn verify_token(token: &str, secret: &str) -> Result<AuthCustomer, ServiceError> {
    let validation = Validation::new(Algorithm::HS256);
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| ServiceError::Unauthorized(format!("Invalid token: {}", e)))?;

    let customer_id = Uuid::parse_str(&data.claims.sub)
        .map_err(|_| ServiceError::Unauthorized("Token subject is not a customer id".into()))?;

    Ok(AuthCustomer { customer_id })
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthCustomer
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ServiceError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);

        let header_value = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| ServiceError::Unauthorized("Missing Authorization header".into()))?;

        let token = header_value
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| ServiceError::Unauthorized("Expected a Bearer token".into()))?;

        verify_token(token, &state.config.jwt_secret)
    }
}
