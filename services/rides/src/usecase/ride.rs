use chrono::{DateTime, Utc};
use tracing::info;
use uuid::Uuid;

use aeroride_domain::id::{RideId, UserId};
use aeroride_domain::pagination::PageRequest;
use aeroride_domain::ride::RideStatus;
use aeroride_domain::user::UserRole;
use aeroride_domain::vehicle::VehicleClass;

use crate::domain::repository::{RideRepository, RoutePort};
use crate::domain::types::{Actor, Place, Ride, StatusChange};
use crate::error::RidesServiceError;
use crate::usecase::estimate::{quote_trip, validate_coordinates};

// ── CreateRide ───────────────────────────────────────────────────────────────

pub struct CreateRideInput {
    pub airport_id: String,
    pub pickup: Place,
    pub destination: Place,
    pub vehicle_type: String,
    pub passenger_count: Option<i32>,
    pub special_requests: Option<String>,
    pub scheduled_time: Option<DateTime<Utc>>,
}

pub struct CreateRideUseCase<R: RideRepository, P: RoutePort> {
    pub rides: R,
    pub routes: P,
    pub currency: String,
}

impl<R: RideRepository, P: RoutePort> CreateRideUseCase<R, P> {
    pub async fn execute(
        &self,
        passenger: UserId,
        input: CreateRideInput,
    ) -> Result<Ride, RidesServiceError> {
        validate_coordinates([input.pickup.coordinates, input.destination.coordinates])?;

        let vehicle = VehicleClass::from_name_lenient(&input.vehicle_type);
        let quote = quote_trip(
            &self.routes,
            &self.currency,
            &input.pickup.coordinates,
            &input.destination.coordinates,
            vehicle,
        )
        .await;

        let now = Utc::now();
        let ride = Ride {
            id: RideId::generate(),
            passenger_id: passenger,
            driver_id: None,
            airport_id: input.airport_id,
            pickup: input.pickup,
            destination: input.destination,
            quote,
            passenger_count: input.passenger_count.filter(|n| *n > 0).unwrap_or(1),
            special_requests: input.special_requests.filter(|s| !s.trim().is_empty()),
            qr_code: Uuid::new_v4().to_string(),
            scheduled_time: input.scheduled_time,
            status: RideStatus::Pending,
            created_at: now,
            updated_at: now,
        };
        self.rides.create(&ride).await?;

        info!(ride_id = %ride.id, route_source = ride.quote.route_source.as_str(), "ride booked");
        Ok(ride)
    }
}

// ── ListRides ────────────────────────────────────────────────────────────────

pub struct ListRidesUseCase<R: RideRepository> {
    pub rides: R,
}

impl<R: RideRepository> ListRidesUseCase<R> {
    pub async fn execute(
        &self,
        user: UserId,
        page: PageRequest,
    ) -> Result<Vec<Ride>, RidesServiceError> {
        self.rides.list_for_user(user, page.clamped()).await
    }
}

// ── GetRide ──────────────────────────────────────────────────────────────────

pub struct GetRideUseCase<R: RideRepository> {
    pub rides: R,
}

impl<R: RideRepository> GetRideUseCase<R> {
    /// Rides are only visible to their passenger and driver.
    pub async fn execute(&self, user: UserId, id: RideId) -> Result<Ride, RidesServiceError> {
        self.rides
            .find_by_id(id)
            .await?
            .filter(|ride| ride.is_party(user))
            .ok_or(RidesServiceError::RideNotFound)
    }
}

// ── UpdateRideStatus ─────────────────────────────────────────────────────────

pub struct UpdateRideStatusUseCase<R: RideRepository> {
    pub rides: R,
}

impl<R: RideRepository> UpdateRideStatusUseCase<R> {
    pub async fn execute(
        &self,
        actor: Actor,
        id: RideId,
        next: RideStatus,
    ) -> Result<Ride, RidesServiceError> {
        let ride = self
            .rides
            .find_by_id(id)
            .await?
            .ok_or(RidesServiceError::RideNotFound)?;

        let assign_driver = authorize_transition(&ride, actor, next)?;
        apply_transition(&self.rides, &ride, next, assign_driver).await
    }
}

/// Lifecycle check plus guarded write, then the stored result.
pub(crate) async fn apply_transition<R: RideRepository>(
    rides: &R,
    ride: &Ride,
    next: RideStatus,
    assign_driver: Option<UserId>,
) -> Result<Ride, RidesServiceError> {
    let invalid = || RidesServiceError::InvalidTransition {
        from: ride.status,
        to: next,
    };
    if !ride.status.can_transition_to(next) {
        return Err(invalid());
    }

    let change = StatusChange {
        ride_id: ride.id,
        expected: ride.status,
        next,
        assign_driver,
    };
    // Lost to a concurrent change: report against the status we saw.
    if !rides.update_status(&change).await? {
        return Err(invalid());
    }

    info!(ride_id = %ride.id, from = %ride.status, to = %next, "ride status changed");
    rides
        .find_by_id(ride.id)
        .await?
        .ok_or(RidesServiceError::RideNotFound)
}

/// Who may request `next` on `ride`. Returns the driver to assign when an
/// unassigned driver accepts.
fn authorize_transition(
    ride: &Ride,
    actor: Actor,
    next: RideStatus,
) -> Result<Option<UserId>, RidesServiceError> {
    if ride.passenger_id == actor.user_id {
        return match next {
            RideStatus::Cancelled => Ok(None),
            _ => Err(RidesServiceError::Forbidden),
        };
    }
    if ride.driver_id == Some(actor.user_id) {
        return Ok(None);
    }
    if ride.driver_id.is_none() && actor.role.satisfies(UserRole::Driver) {
        return match next {
            RideStatus::Accepted => Ok(Some(actor.user_id)),
            _ => Err(RidesServiceError::Forbidden),
        };
    }
    Err(RidesServiceError::RideNotFound)
}

// ── DeleteRide ───────────────────────────────────────────────────────────────

pub struct DeleteRideUseCase<R: RideRepository> {
    pub rides: R,
}

impl<R: RideRepository> DeleteRideUseCase<R> {
    pub async fn execute(&self, user: UserId, id: RideId) -> Result<(), RidesServiceError> {
        let ride = self
            .rides
            .find_by_id(id)
            .await?
            .filter(|ride| ride.is_party(user))
            .ok_or(RidesServiceError::RideNotFound)?;

        if ride.passenger_id != user {
            return Err(RidesServiceError::Forbidden);
        }
        if !matches!(ride.status, RideStatus::Pending | RideStatus::Cancelled) {
            return Err(RidesServiceError::InvalidTransition {
                from: ride.status,
                to: RideStatus::Cancelled,
            });
        }
        if !self.rides.delete_deletable(id, user).await? {
            return Err(RidesServiceError::InvalidTransition {
                from: ride.status,
                to: RideStatus::Cancelled,
            });
        }

        info!(ride_id = %id, "ride deleted");
        Ok(())
    }
}
