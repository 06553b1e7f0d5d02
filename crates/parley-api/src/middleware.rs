use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use axum_extra::headers::{Authorization, HeaderMapExt, authorization::Bearer};
use tracing::debug;

use parley_types::api::Claims;

use crate::auth::{AppState, verify_token};
use crate::error::ApiError;

/// Resolve the caller from the `Authorization: Bearer` header.
pub fn authenticate(headers: &HeaderMap, secret: &str) -> Result<Claims, ApiError> {
    let bearer = headers
        .typed_get::<Authorization<Bearer>>()
        .ok_or(ApiError::Forbidden)?;

    verify_token(secret, bearer.token()).map_err(|e| {
        debug!("Rejected bearer token: {}", e);
        ApiError::Forbidden
    })
}

/// Reject unauthenticated requests before any handler or store work runs.
/// On success the caller's [`Claims`] are available as a request extension.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let claims = authenticate(req.headers(), &state.jwt_secret)?;
    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}
