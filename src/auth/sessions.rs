/**
 * Session Tokens
 *
 * JWT verification for user sessions. Tokens are issued by the external
 * auth service with the same secret; this module validates them for the
 * HTTP middleware and the realtime handshake.
 */

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: String,
    /// Username
    pub username: String,
    /// Expiration time (Unix timestamp)
    pub exp: u64,
    /// Issued at time (Unix timestamp)
    pub iat: u64,
}

/// Get JWT secret from environment
fn get_jwt_secret() -> String {
    std::env::var("JWT_SECRET").unwrap_or_else(|err| {
        tracing::warn!("Missing JWT_SECRET: {}", err);
        "your-secret-key-change-in-production".to_string()
    })
}

/// Create a JWT token for a user
///
/// Issuance normally happens in the auth service; this exists for tests and
/// local tooling, using the same claims shape.
pub fn create_token(
    user_id: uuid::Uuid,
    username: &str,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    // Token expires in 30 days
    let exp = now + (30 * 24 * 60 * 60);

    let claims = Claims {
        sub: user_id.to_string(),
        username: username.to_string(),
        exp,
        iat: now,
    };

    let secret = get_jwt_secret();
    let key = EncodingKey::from_secret(secret.as_ref());

    encode(&Header::default(), &claims, &key)
}

/// Verify and decode a JWT token
pub fn verify_token(token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let secret = get_jwt_secret();
    let key = DecodingKey::from_secret(secret.as_ref());
    let validation = Validation::default();

    let token_data = decode::<Claims>(token, &key, &validation)?;
    Ok(token_data.claims)
}

/// Extract the user ID from a token
pub fn get_user_id_from_token(token: &str) -> Result<uuid::Uuid, String> {
    let claims = verify_token(token).map_err(|e| format!("Token verification failed: {}", e))?;
    uuid::Uuid::parse_str(&claims.sub).map_err(|e| format!("Invalid user ID in token: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_and_verify_token() {
        let user_id = uuid::Uuid::new_v4();
        let token = create_token(user_id, "ansel").unwrap();

        let claims = verify_token(&token).unwrap();
        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.username, "ansel");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_get_user_id_from_token() {
        let user_id = uuid::Uuid::new_v4();
        let token = create_token(user_id, "ansel").unwrap();

        assert_eq!(get_user_id_from_token(&token).unwrap(), user_id);
    }

    #[test]
    fn test_verify_invalid_token() {
        assert!(verify_token("invalid.token.here").is_err());
    }
}
