//! Bearer-token authentication for request handlers.

use axum::http::{HeaderMap, header};
use gatehouse_auth::token;
use gatehouse_core::context::AuthorizationContext;
use gatehouse_core::error::GatehouseError;

use super::error::ApiError;
use super::state::AppState;

/// Extract the raw bearer token from the Authorization header.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// Turn an incoming request into an authorization context.
///
/// Verifies the JWT statelessly, then resolves the subject's roles.
/// A well-signed token whose subject has no role assignment is
/// treated as unauthenticated, never defaulted to any role.
pub async fn authorize(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<AuthorizationContext, ApiError> {
    let bearer = bearer_token(headers).ok_or_else(|| GatehouseError::Unauthenticated {
        reason: "missing bearer token".into(),
    })?;

    let claims =
        token::validate_access_token(bearer, &state.auth_config).map_err(GatehouseError::from)?;
    let user_id = claims.user_id().map_err(GatehouseError::from)?;

    let roles = match state.resolver.resolve(user_id).await {
        Ok(roles) => roles,
        Err(GatehouseError::NotFound { .. }) => {
            return Err(GatehouseError::Unauthenticated {
                reason: "principal has no role assignment".into(),
            }
            .into());
        }
        Err(other) => return Err(other.into()),
    };

    Ok(AuthorizationContext::new(user_id, roles))
}
