use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use subtle::ConstantTimeEq;

use crate::error::AppError;
use crate::state::SharedState;

const BEARER_PREFIX: &str = "Bearer ";

/// Proof that the request carried the shared API token.
///
/// Taking this as the first handler argument rejects the request with 401
/// before the body is read or the database is touched.
#[derive(Debug, Clone, Copy)]
pub struct ApiToken;

/// Checks a raw `Authorization` header value against the configured secret.
///
/// The value must be exactly `Bearer <secret>`. Scheme matching is
/// case-sensitive and no surrounding whitespace is tolerated.
pub fn verify_bearer(header: Option<&str>, secret: &str) -> Result<(), AppError> {
    let header = header.ok_or_else(|| {
        AppError::Unauthorized("Missing authorization header".to_string())
    })?;

    let token = header
        .strip_prefix(BEARER_PREFIX)
        .ok_or_else(|| AppError::Unauthorized("Expected a Bearer token".to_string()))?;

    if bool::from(token.as_bytes().ct_eq(secret.as_bytes())) {
        Ok(())
    } else {
        Err(AppError::Unauthorized("Invalid token".to_string()))
    }
}

impl FromRequestParts<SharedState> for ApiToken {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &SharedState,
    ) -> Result<Self, Self::Rejection> {
        let header = match parts.headers.get(AUTHORIZATION) {
            Some(value) => Some(value.to_str().map_err(|_| {
                AppError::Unauthorized("Invalid authorization header".to_string())
            })?),
            None => None,
        };

        if let Err(e) = verify_bearer(header, &state.config.api_token) {
            tracing::debug!("Rejected request to {}: {e}", parts.uri.path());
            return Err(e);
        }

        Ok(ApiToken)
    }
}
