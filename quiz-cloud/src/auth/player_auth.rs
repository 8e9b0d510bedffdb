//! Player JWT authentication
//!
//! Tokens are minted by the external auth service; this middleware only
//! verifies them and places the identity in request extensions. The
//! `role` claim carries the admin capability checked by the admin API.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use shared::error::AppError;

use crate::state::AppState;

/// JWT claims for player authentication
#[derive(Debug, Serialize, Deserialize)]
pub struct PlayerClaims {
    /// Player ID
    pub sub: String,
    /// Player email
    pub email: String,
    /// Role: "player" or "admin"
    pub role: String,
    /// Expiration (Unix timestamp seconds)
    pub exp: usize,
    /// Issued at (Unix timestamp seconds)
    pub iat: usize,
}

/// Authenticated player identity extracted from JWT
#[derive(Debug, Clone)]
pub struct PlayerIdentity {
    pub user_id: String,
    pub email: String,
    pub role: String,
}

impl PlayerIdentity {
    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }
}

const JWT_EXPIRY_HOURS: i64 = 24;

/// Create a JWT token for a player (used by the auth service and tests)
pub fn create_token(
    user_id: &str,
    email: &str,
    role: &str,
    secret: &str,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now();
    let claims = PlayerClaims {
        sub: user_id.to_string(),
        email: email.to_string(),
        role: role.to_string(),
        exp: (now + chrono::Duration::hours(JWT_EXPIRY_HOURS)).timestamp() as usize,
        iat: now.timestamp() as usize,
    };

    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// Decode and validate a player token
pub fn decode_token(
    token: &str,
    secret: &str,
) -> Result<PlayerClaims, jsonwebtoken::errors::Error> {
    let validation = Validation::default();
    jsonwebtoken::decode::<PlayerClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
}

/// Middleware that extracts and verifies the player JWT from the
/// Authorization header, rejecting before any handler runs.
pub async fn player_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, Response> {
    let auth_header = request
        .headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::not_authenticated().into_response())?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::not_authenticated().into_response())?;

    let claims = decode_token(token, &state.jwt_secret).map_err(|e| {
        tracing::debug!("JWT validation failed: {e}");
        AppError::not_authenticated().into_response()
    })?;

    let identity = PlayerIdentity {
        user_id: claims.sub,
        email: claims.email,
        role: claims.role,
    };

    request.extensions_mut().insert(identity);

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_round_trip() {
        let token = create_token("u1", "a@example.com", "player", "secret").unwrap();
        let claims = decode_token(&token, "secret").unwrap();
        assert_eq!(claims.sub, "u1");
        assert_eq!(claims.role, "player");
    }

    #[test]
    fn wrong_secret_rejected() {
        let token = create_token("u1", "a@example.com", "player", "secret").unwrap();
        assert!(decode_token(&token, "other").is_err());
    }

    #[test]
    fn admin_capability_comes_from_role() {
        let admin = PlayerIdentity {
            user_id: "u1".into(),
            email: "a@example.com".into(),
            role: "admin".into(),
        };
        let player = PlayerIdentity {
            user_id: "u2".into(),
            email: "b@example.com".into(),
            role: "player".into(),
        };
        assert!(admin.is_admin());
        assert!(!player.is_admin());
    }
}
