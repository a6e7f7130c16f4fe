//! # Session Authentication
//!
//! Session-token issue/verify plus the middleware that gates every
//! non-auth route.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  POST /api/auth/login                                                   │
//! │     verify_password(argon2) ──► TokenManager::generate ──► { token }    │
//! │                                                                         │
//! │  every other /api route                                                 │
//! │     Authorization: Bearer <token>                                       │
//! │          │                                                              │
//! │          ▼                                                              │
//! │     require_auth middleware                                             │
//! │     ├── no/invalid token → 401, handler never runs                      │
//! │     └── valid → AuthUser { id, name } inserted into extensions          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use argon2::password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, SaltString};
use argon2::{Argon2, PasswordVerifier};
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, TokenData, Validation};
use serde::{Deserialize, Serialize};
use tracing::error;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

// =============================================================================
// Claims & Token Manager
// =============================================================================

/// Session token claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user id)
    pub sub: String,

    /// Display name, carried for attribution without a user lookup
    pub name: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration (Unix timestamp)
    pub exp: i64,

    /// Token ID (unique identifier for this token)
    pub jti: String,
}

/// Session token manager.
#[derive(Debug)]
pub struct TokenManager {
    secret: String,
    lifetime_secs: i64,
}

impl TokenManager {
    /// Create a new token manager.
    pub fn new(secret: String, lifetime_secs: i64) -> Self {
        TokenManager {
            secret,
            lifetime_secs,
        }
    }

    /// Generate a session token for a user.
    pub fn generate(&self, user_id: &str, name: &str) -> ApiResult<String> {
        let now = Utc::now();
        let exp = now + Duration::seconds(self.lifetime_secs);

        let claims = Claims {
            sub: user_id.to_string(),
            name: name.to_string(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| {
            error!("Failed to generate session token: {e}");
            ApiError::Internal
        })
    }

    /// Validate and decode a token. Expired or tampered tokens fail.
    pub fn validate(&self, token: &str) -> ApiResult<Claims> {
        let validation = Validation::default();

        let token_data: TokenData<Claims> = decode(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map_err(|_| ApiError::Unauthorized)?;

        Ok(token_data.claims)
    }
}

/// Extract bearer token from an authorization header value.
pub fn extract_bearer_token(auth_header: &str) -> Option<&str> {
    auth_header.strip_prefix("Bearer ")
}

// =============================================================================
// Password Hashing
// =============================================================================

/// Hashes a password with Argon2 and a fresh salt.
pub fn hash_password(password: &str) -> ApiResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| {
            error!("Failed to hash password: {e}");
            ApiError::Internal
        })
}

/// Verifies a password against its stored hash. An unparsable stored
/// hash counts as a failed verification, not an internal error.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    match PasswordHash::new(stored_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

// =============================================================================
// Middleware
// =============================================================================

/// The resolved caller identity, inserted into request extensions by
/// [`require_auth`] and read by handlers for attribution.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: String,
    pub name: String,
}

/// Authentication middleware: rejects with 401 before any core logic
/// runs when the session token is missing or invalid.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_header = req
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .ok_or(ApiError::Unauthorized)?;

    let token = extract_bearer_token(auth_header).ok_or(ApiError::Unauthorized)?;

    let claims = state.tokens.validate(token)?;

    req.extensions_mut().insert(AuthUser {
        id: claims.sub,
        name: claims.name,
    });

    Ok(next.run(req).await)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_roundtrip() {
        let manager = TokenManager::new("test-secret".to_string(), 3600);

        let token = manager.generate("user-001", "Administrator").unwrap();
        let claims = manager.validate(&token).unwrap();

        assert_eq!(claims.sub, "user-001");
        assert_eq!(claims.name, "Administrator");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let manager = TokenManager::new("test-secret".to_string(), 3600);
        let other = TokenManager::new("other-secret".to_string(), 3600);

        let token = manager.generate("user-001", "Administrator").unwrap();
        assert!(matches!(
            other.validate(&token),
            Err(ApiError::Unauthorized)
        ));
    }

    #[test]
    fn test_garbage_token_rejected() {
        let manager = TokenManager::new("test-secret".to_string(), 3600);
        assert!(matches!(
            manager.validate("not-a-token"),
            Err(ApiError::Unauthorized)
        ));
    }

    #[test]
    fn test_bearer_extraction() {
        assert_eq!(extract_bearer_token("Bearer abc"), Some("abc"));
        assert_eq!(extract_bearer_token("Basic abc"), None);
        assert_eq!(extract_bearer_token(""), None);
    }

    #[test]
    fn test_password_hash_and_verify() {
        let hash = hash_password("admin123").unwrap();
        assert_ne!(hash, "admin123");
        assert!(verify_password("admin123", &hash));
        assert!(!verify_password("wrong", &hash));
        assert!(!verify_password("admin123", "not-a-valid-hash"));
    }
}
