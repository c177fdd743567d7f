/**
 * Authentication Middleware
 *
 * Protects routes that require an authenticated actor. Extracts and
 * verifies the JWT bearer token from the Authorization header and attaches
 * the actor's identity to request extensions.
 */

use axum::{
    extract::Request,
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::auth::sessions::verify_token;
use crate::error::ApiError;
use crate::server::state::AppState;

/// Authenticated user data extracted from the JWT token
#[derive(Clone, Debug)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub username: String,
}

/// Authentication middleware
///
/// 1. Extracts the JWT token from the Authorization header
/// 2. Verifies the token
/// 3. Attaches `AuthenticatedUser` to request extensions
///
/// Returns 403 if the token is missing or invalid.
pub async fn auth_middleware(mut request: Request, next: Next) -> Result<Response, ApiError> {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| {
            tracing::warn!("Missing Authorization header");
            ApiError::Unauthenticated
        })?;

    // Format: "Bearer <token>"
    let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
        tracing::warn!("Invalid Authorization header format");
        ApiError::Unauthenticated
    })?;

    let claims = verify_token(token).map_err(|e| {
        tracing::warn!("Invalid token: {:?}", e);
        ApiError::Unauthenticated
    })?;

    let user_id = Uuid::parse_str(&claims.sub).map_err(|e| {
        tracing::warn!("Invalid user ID in token: {:?}", e);
        ApiError::Unauthenticated
    })?;

    request.extensions_mut().insert(AuthenticatedUser {
        user_id,
        username: claims.username,
    });

    Ok(next.run(request).await)
}

/// Axum extractor for the authenticated user
///
/// Used as a handler parameter to read the identity attached by
/// `auth_middleware`.
#[derive(Clone, Debug)]
pub struct AuthUser(pub AuthenticatedUser);

impl axum::extract::FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or_else(|| {
                tracing::warn!("AuthenticatedUser not found in request extensions");
                ApiError::Unauthenticated
            })?;

        Ok(AuthUser(user))
    }
}
