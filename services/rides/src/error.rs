use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use aeroride_core::error::error_response;
use aeroride_domain::ride::RideStatus;

/// Rides service error variants.
#[derive(Debug, thiserror::Error)]
pub enum RidesServiceError {
    #[error("missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),
    #[error("coordinates out of range")]
    InvalidCoordinates,
    #[error("unknown ride status: {0}")]
    UnknownStatus(String),
    #[error("unauthorized")]
    Unauthorized,
    #[error("ride not found")]
    RideNotFound,
    #[error("invalid ticket")]
    TicketNotFound,
    #[error("ticket is no longer valid")]
    TicketExpired,
    #[error("forbidden")]
    Forbidden,
    #[error("cannot move ride from {from} to {to}")]
    InvalidTransition { from: RideStatus, to: RideStatus },
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl RidesServiceError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MissingFields(_) => "MISSING_FIELDS",
            Self::InvalidCoordinates => "INVALID_COORDINATES",
            Self::UnknownStatus(_) => "UNKNOWN_STATUS",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::RideNotFound => "RIDE_NOT_FOUND",
            Self::TicketNotFound => "TICKET_NOT_FOUND",
            Self::TicketExpired => "TICKET_EXPIRED",
            Self::Forbidden => "FORBIDDEN",
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
            Self::Internal(_) => "INTERNAL",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::MissingFields(_) | Self::InvalidCoordinates | Self::UnknownStatus(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::RideNotFound | Self::TicketNotFound => StatusCode::NOT_FOUND,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::InvalidTransition { .. } | Self::TicketExpired => StatusCode::CONFLICT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for RidesServiceError {
    fn into_response(self) -> Response {
        if let Self::Internal(ref e) = self {
            tracing::error!(error = %format!("{e:#}"), kind = "INTERNAL", "internal error");
        }
        error_response(self.status(), self.kind(), self.to_string())
    }
}
