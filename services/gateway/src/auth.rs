//! Request authentication
//!
//! The credential collaborator mints HS256 JWTs whose `sub` claim is the
//! user identity. This extractor verifies signature and expiry and hands
//! the identity to handlers; mutating handlers must still compare it
//! against the identity named in the payload.

use crate::error::AppError;
use crate::state::AppState;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use types::ids::UserId;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Verified user identity.
    pub sub: String,
    /// Expiry, unix seconds.
    pub exp: usize,
}

/// Decode and verify a bearer token against the shared secret.
pub fn verify_token(token: &str, secret: &str) -> Result<Claims, AppError> {
    let key = DecodingKey::from_secret(secret.as_bytes());
    let validation = Validation::new(Algorithm::HS256);
    let data = decode::<Claims>(token, &key, &validation)
        .map_err(|e| AppError::Unauthorized(format!("Invalid token: {e}")))?;
    Ok(data.claims)
}

/// The caller's verified identity.
pub struct AuthenticatedUser {
    pub user_id: UserId,
}

impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get("Authorization")
            .ok_or_else(|| AppError::Unauthorized("Missing authentication credentials".into()))?;
        let value = header
            .to_str()
            .map_err(|_| AppError::Unauthorized("Invalid header string".into()))?;
        let token = value
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::Unauthorized("Expected a bearer token".into()))?;

        let claims = verify_token(token, &state.config.jwt_secret)?;

        Ok(AuthenticatedUser {
            user_id: UserId::new(claims.sub),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{EncodingKey, Header, encode};

    fn token(sub: &str, exp_offset: i64, secret: &str) -> String {
        let claims = Claims {
            sub: sub.to_string(),
            exp: (chrono::Utc::now().timestamp() + exp_offset) as usize,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn test_valid_token_round_trips_identity() {
        let token = token("alice", 3600, "s3cret");
        let claims = verify_token(&token, "s3cret").unwrap();
        assert_eq!(claims.sub, "alice");
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let token = token("alice", 3600, "s3cret");
        assert!(verify_token(&token, "other").is_err());
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let token = token("alice", -3600, "s3cret");
        assert!(verify_token(&token, "s3cret").is_err());
    }
}
