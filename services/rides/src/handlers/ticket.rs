use axum::{
    Json,
    extract::{Path, State},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use aeroride_auth_types::identity::SessionIdentity;
use aeroride_core::error::AppError;

use crate::error::RidesServiceError;
use crate::handlers::actor;
use crate::handlers::ride::RideResponse;
use crate::state::AppState;
use crate::usecase::ticket::{ScanTicketUseCase, VerifyTicketUseCase};

// ── GET /rides/tickets/{qr_code} ─────────────────────────────────────────────

#[derive(Serialize)]
pub struct VerifyTicketResponse {
    pub valid: bool,
    pub qr_code: String,
    pub ride: RideResponse,
    #[serde(serialize_with = "aeroride_core::serde::to_rfc3339_ms")]
    pub verification_time: DateTime<Utc>,
}

pub async fn verify_ticket(
    identity: Result<SessionIdentity, AppError>,
    State(state): State<AppState>,
    Path(qr_code): Path<String>,
) -> Result<Json<VerifyTicketResponse>, RidesServiceError> {
    actor(identity)?;
    let usecase = VerifyTicketUseCase {
        rides: state.ride_repo(),
    };
    let check = usecase.execute(&qr_code).await?;
    Ok(Json(VerifyTicketResponse {
        valid: check.valid,
        qr_code,
        ride: check.ride.into(),
        verification_time: check.checked_at,
    }))
}

// ── POST /rides/tickets/scan ─────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ScanTicketRequest {
    pub qr_code: Option<String>,
}

#[derive(Serialize)]
pub struct ScanTicketResponse {
    pub message: &'static str,
    pub ride: RideResponse,
}

fn required_code(qr_code: Option<String>) -> Result<String, RidesServiceError> {
    qr_code
        .map(|c| c.trim().to_owned())
        .filter(|c| !c.is_empty())
        .ok_or_else(|| RidesServiceError::MissingFields(vec!["qr_code"]))
}

pub async fn scan_ticket(
    identity: Result<SessionIdentity, AppError>,
    State(state): State<AppState>,
    Json(body): Json<ScanTicketRequest>,
) -> Result<Json<ScanTicketResponse>, RidesServiceError> {
    let actor = actor(identity)?;
    let qr_code = required_code(body.qr_code)?;
    let usecase = ScanTicketUseCase {
        rides: state.ride_repo(),
    };
    let ride = usecase.execute(actor, &qr_code).await?;
    Ok(Json(ScanTicketResponse {
        message: "Ticket scanned successfully",
        ride: ride.into(),
    }))
}
