//! Authentication Middleware
//! Mission: Gate protected routes on verified tokens and live roles

use crate::auth::{
    api::AuthState,
    models::{User, UserRole},
};
use crate::error::ApiError;
use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use tracing::debug;
use uuid::Uuid;

/// Extract the bearer credential from an `Authorization` header value.
/// The scheme prefix must be exactly `Bearer ` followed by the token.
pub fn bearer_token(header_value: &str) -> Option<&str> {
    header_value.strip_prefix("Bearer ").filter(|t| !t.is_empty())
}

/// Auth gate: extract the bearer token, verify it, load the subject's
/// current user record, and attach it to the request.
///
/// Every rejection surfaces as the same generic 401; the distinct causes
/// (missing header, bad signature, expiry, stale subject) are only logged.
/// Downstream role checks read the attached LIVE user, never the role
/// snapshot embedded in the token, so a role change takes effect on the
/// next request rather than at token expiry.
pub async fn auth_gate(
    State(state): State<AuthState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(bearer_token)
        .ok_or(ApiError::Unauthenticated)?;

    let claims = state.jwt_handler.verify(token).map_err(|err| {
        debug!("Token rejected: {}", err);
        ApiError::Unauthenticated
    })?;

    let subject_id = Uuid::parse_str(&claims.sub).map_err(|_| ApiError::Unauthenticated)?;

    // A valid token whose subject no longer exists is conflated with auth
    // failure on the wire, but logged distinctly.
    let user = state
        .user_store
        .get_by_id(&subject_id)
        .map_err(ApiError::Internal)?
        .ok_or_else(|| {
            debug!("Token subject {} no longer exists", subject_id);
            ApiError::Unauthenticated
        })?;

    req.extensions_mut().insert(user);

    Ok(next.run(req).await)
}

/// Role gate over an explicit set of acceptable roles. Runs after
/// `auth_gate` and compares the resolved user's stored role against the
/// set, rejecting with 403 on non-membership.
pub async fn require_role(
    allowed: &'static [UserRole],
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user = req
        .extensions()
        .get::<User>()
        .ok_or(ApiError::Unauthenticated)?;

    if !allowed.contains(&user.role) {
        let names: Vec<&str> = allowed.iter().map(|r| r.as_str()).collect();
        return Err(ApiError::Forbidden(format!(
            "This route requires one of the roles: {}",
            names.join(", ")
        )));
    }

    Ok(next.run(req).await)
}

/// Roles allowed to manage categories and courses.
pub const STAFF_ROLES: &[UserRole] = &[UserRole::Admin, UserRole::Teacher];
