use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};

use aeroride_core::error::error_response;

/// Auth service error variants.
#[derive(Debug, thiserror::Error)]
pub enum AuthServiceError {
    #[error("{0}")]
    MalformedInput(&'static str),
    #[error("code must be exactly 6 digits")]
    MalformedCode,
    #[error("too many attempts, please wait before requesting another code")]
    RateLimited { retry_after_secs: u64 },
    #[error("failed to send login code")]
    DeliveryFailed,
    #[error("invalid or expired code")]
    InvalidOrExpiredCode,
    #[error("invalid token")]
    InvalidToken,
    #[error("invalid refresh token")]
    InvalidRefreshToken,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl AuthServiceError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MalformedInput(_) => "MALFORMED_INPUT",
            Self::MalformedCode => "MALFORMED_CODE",
            Self::RateLimited { .. } => "RATE_LIMITED",
            Self::DeliveryFailed => "DELIVERY_FAILED",
            Self::InvalidOrExpiredCode => "INVALID_OR_EXPIRED_CODE",
            Self::InvalidToken => "INVALID_TOKEN",
            Self::InvalidRefreshToken => "INVALID_REFRESH_TOKEN",
            Self::Internal(_) => "INTERNAL",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::MalformedInput(_) | Self::MalformedCode => StatusCode::BAD_REQUEST,
            Self::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            Self::DeliveryFailed => StatusCode::BAD_GATEWAY,
            Self::InvalidOrExpiredCode | Self::InvalidToken | Self::InvalidRefreshToken => {
                StatusCode::UNAUTHORIZED
            }
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AuthServiceError {
    fn into_response(self) -> Response {
        // 4xx are client errors already visible in the trace layer; only the
        // anyhow chain of a 500 needs logging.
        if let Self::Internal(ref e) = self {
            tracing::error!(error = %format!("{e:#}"), kind = "INTERNAL", "internal error");
        }
        let mut response = error_response(self.status(), self.kind(), self.to_string());
        if let Self::RateLimited { retry_after_secs } = self {
            response.headers_mut().insert(
                header::RETRY_AFTER,
                HeaderValue::from(retry_after_secs.max(1)),
            );
        }
        response
    }
}
