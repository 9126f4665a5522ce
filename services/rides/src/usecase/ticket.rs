use chrono::{DateTime, Utc};
use tracing::info;

use aeroride_domain::ride::RideStatus;

use crate::domain::repository::RideRepository;
use crate::domain::types::{Actor, Ride};
use crate::error::RidesServiceError;
use crate::usecase::ride::apply_transition;

// ── VerifyTicket ─────────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct TicketCheck {
    pub valid: bool,
    pub ride: Ride,
    pub checked_at: DateTime<Utc>,
}

pub struct VerifyTicketUseCase<R: RideRepository> {
    pub rides: R,
}

impl<R: RideRepository> VerifyTicketUseCase<R> {
    /// Any signed-in checker may look a ticket up; holding the code is the
    /// capability.
    pub async fn execute(&self, qr_code: &str) -> Result<TicketCheck, RidesServiceError> {
        let ride = self
            .rides
            .find_by_qr_code(qr_code)
            .await?
            .ok_or(RidesServiceError::TicketNotFound)?;
        let checked_at = Utc::now();
        Ok(TicketCheck {
            valid: ride.ticket_valid_at(checked_at),
            ride,
            checked_at,
        })
    }
}

// ── ScanTicket ───────────────────────────────────────────────────────────────

pub struct ScanTicketUseCase<R: RideRepository> {
    pub rides: R,
}

impl<R: RideRepository> ScanTicketUseCase<R> {
    /// The assigned driver's scan starts the ride; the passenger's scan
    /// completes it.
    pub async fn execute(&self, actor: Actor, qr_code: &str) -> Result<Ride, RidesServiceError> {
        let ride = self
            .rides
            .find_by_qr_code(qr_code)
            .await?
            .ok_or(RidesServiceError::TicketNotFound)?;

        let next = scan_target(&ride, actor)?;
        if !ride.ticket_valid_at(Utc::now()) {
            return Err(RidesServiceError::TicketExpired);
        }

        let ride = apply_transition(&self.rides, &ride, next, None).await?;
        info!(ride_id = %ride.id, scanned_by = %actor.user_id, "ticket scanned");
        Ok(ride)
    }
}

/// Status a scan moves the ride to, by who is scanning.
fn scan_target(ride: &Ride, actor: Actor) -> Result<RideStatus, RidesServiceError> {
    if ride.driver_id == Some(actor.user_id) {
        Ok(RideStatus::InProgress)
    } else if ride.passenger_id == actor.user_id {
        Ok(RideStatus::Completed)
    } else {
        Err(RidesServiceError::Forbidden)
    }
}
