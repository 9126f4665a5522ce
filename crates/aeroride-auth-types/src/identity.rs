//! Session identity extractor.

use std::sync::Arc;

use axum::extract::{FromRef, FromRequestParts};
use axum_extra::extract::CookieJar;
use http::header::AUTHORIZATION;
use http::request::Parts;

use aeroride_core::error::AppError;
use aeroride_domain::id::UserId;
use aeroride_domain::user::UserRole;

use crate::cookie::ACCESS_TOKEN_COOKIE;
use crate::token::validate_access_token;

/// HMAC secret used to validate session tokens. Services expose it from
/// their state with `FromRef`.
#[derive(Clone)]
pub struct JwtSecret(pub Arc<str>);

impl JwtSecret {
    pub fn new(secret: impl Into<Arc<str>>) -> Self {
        Self(secret.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Caller identity from a valid access token.
///
/// Looks at `Authorization: Bearer <jwt>` first, then the access-token
/// cookie. Missing or invalid tokens reject with 401.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionIdentity {
    pub user_id: UserId,
    pub role: UserRole,
    /// Access-token expiry, seconds since epoch.
    pub exp: u64,
}

impl SessionIdentity {
    /// 403 unless the caller's role satisfies `required`.
    pub fn require(&self, required: UserRole) -> Result<(), AppError> {
        if self.role.satisfies(required) {
            Ok(())
        } else {
            Err(AppError::Forbidden)
        }
    }
}

fn bearer_token(parts: &Parts) -> Option<String> {
    let value = parts.headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then(|| token.to_owned())
}

fn cookie_token(parts: &Parts) -> Option<String> {
    CookieJar::from_headers(&parts.headers)
        .get(ACCESS_TOKEN_COOKIE)
        .map(|c| c.value().to_owned())
}

impl<S> FromRequestParts<S> for SessionIdentity
where
    S: Send + Sync,
    JwtSecret: FromRef<S>,
{
    type Rejection = AppError;

    // Validation is synchronous; the returned future captures only owned data.
    fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let secret = JwtSecret::from_ref(state);
        let result = bearer_token(parts)
            .or_else(|| cookie_token(parts))
            .ok_or(AppError::Unauthorized)
            .and_then(|token| {
                validate_access_token(&token, secret.as_str()).map_err(|e| {
                    tracing::debug!(error = %e, "rejected session token");
                    AppError::Unauthorized
                })
            })
            .map(|info| SessionIdentity {
                user_id: info.user_id,
                role: info.role,
                exp: info.exp,
            });

        async move { result }
    }
}
