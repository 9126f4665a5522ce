use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use aeroride_auth_types::identity::SessionIdentity;
use aeroride_core::error::AppError;
use aeroride_domain::geo::Coordinates;
use aeroride_domain::id::{RideId, UserId};
use aeroride_domain::pagination::PageRequest;
use aeroride_domain::ride::RideStatus;
use aeroride_domain::vehicle::VehicleClass;

use crate::domain::types::{Place, Ride, RouteSource};
use crate::error::RidesServiceError;
use crate::handlers::actor;
use crate::state::AppState;
use crate::usecase::ride::{
    CreateRideInput, CreateRideUseCase, DeleteRideUseCase, GetRideUseCase, ListRidesUseCase,
    UpdateRideStatusUseCase,
};

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct RideResponse {
    pub id: RideId,
    pub passenger_id: UserId,
    pub driver_id: Option<UserId>,
    pub airport_id: String,
    pub pickup_location: String,
    pub pickup_latitude: f64,
    pub pickup_longitude: f64,
    pub destination_location: String,
    pub destination_latitude: f64,
    pub destination_longitude: f64,
    pub distance_km: f64,
    pub estimated_duration: u32,
    pub fare_amount: f64,
    pub currency: String,
    pub vehicle_type: VehicleClass,
    pub route_source: RouteSource,
    pub passenger_count: i32,
    pub special_requests: Option<String>,
    pub qr_code: String,
    #[serde(serialize_with = "aeroride_core::serde::to_rfc3339_ms_opt")]
    pub scheduled_time: Option<DateTime<Utc>>,
    pub status: RideStatus,
    #[serde(serialize_with = "aeroride_core::serde::to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "aeroride_core::serde::to_rfc3339_ms")]
    pub updated_at: DateTime<Utc>,
}

impl From<Ride> for RideResponse {
    fn from(ride: Ride) -> Self {
        Self {
            id: ride.id,
            passenger_id: ride.passenger_id,
            driver_id: ride.driver_id,
            airport_id: ride.airport_id,
            pickup_location: ride.pickup.label,
            pickup_latitude: ride.pickup.coordinates.latitude,
            pickup_longitude: ride.pickup.coordinates.longitude,
            destination_location: ride.destination.label,
            destination_latitude: ride.destination.coordinates.latitude,
            destination_longitude: ride.destination.coordinates.longitude,
            distance_km: ride.quote.distance_km,
            estimated_duration: ride.quote.estimated_duration,
            fare_amount: ride.quote.fare_amount,
            currency: ride.quote.currency,
            vehicle_type: ride.quote.vehicle_type,
            route_source: ride.quote.route_source,
            passenger_count: ride.passenger_count,
            special_requests: ride.special_requests,
            qr_code: ride.qr_code,
            scheduled_time: ride.scheduled_time,
            status: ride.status,
            created_at: ride.created_at,
            updated_at: ride.updated_at,
        }
    }
}

// ── POST /rides ──────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateRideRequest {
    pub airport_id: Option<String>,
    pub pickup_location: Option<String>,
    pub pickup_latitude: Option<f64>,
    pub pickup_longitude: Option<f64>,
    pub destination_location: Option<String>,
    pub destination_latitude: Option<f64>,
    pub destination_longitude: Option<f64>,
    pub vehicle_type: Option<String>,
    pub passenger_count: Option<i32>,
    pub special_requests: Option<String>,
    pub scheduled_time: Option<DateTime<Utc>>,
}

#[derive(Default)]
struct Missing(Vec<&'static str>);

impl Missing {
    fn text(&mut self, value: Option<String>, name: &'static str) -> String {
        match value.map(|v| v.trim().to_owned()).filter(|v| !v.is_empty()) {
            Some(v) => v,
            None => {
                self.0.push(name);
                String::new()
            }
        }
    }

    fn number(&mut self, value: Option<f64>, name: &'static str) -> f64 {
        if value.is_none() {
            self.0.push(name);
        }
        value.unwrap_or_default()
    }
}

impl CreateRideRequest {
    /// Every missing field is reported at once, in request order.
    fn into_input(self) -> Result<CreateRideInput, RidesServiceError> {
        let mut missing = Missing::default();
        let airport_id = missing.text(self.airport_id, "airport_id");
        let pickup = Place {
            label: missing.text(self.pickup_location, "pickup_location"),
            coordinates: Coordinates::new(
                missing.number(self.pickup_latitude, "pickup_latitude"),
                missing.number(self.pickup_longitude, "pickup_longitude"),
            ),
        };
        let destination = Place {
            label: missing.text(self.destination_location, "destination_location"),
            coordinates: Coordinates::new(
                missing.number(self.destination_latitude, "destination_latitude"),
                missing.number(self.destination_longitude, "destination_longitude"),
            ),
        };
        let vehicle_type = missing.text(self.vehicle_type, "vehicle_type");
        if !missing.0.is_empty() {
            return Err(RidesServiceError::MissingFields(missing.0));
        }
        Ok(CreateRideInput {
            airport_id,
            pickup,
            destination,
            vehicle_type,
            passenger_count: self.passenger_count,
            special_requests: self.special_requests,
            scheduled_time: self.scheduled_time,
        })
    }
}

pub async fn create_ride(
    identity: Result<SessionIdentity, AppError>,
    State(state): State<AppState>,
    Json(body): Json<CreateRideRequest>,
) -> Result<(StatusCode, Json<RideResponse>), RidesServiceError> {
    let actor = actor(identity)?;
    let input = body.into_input()?;
    let usecase = CreateRideUseCase {
        rides: state.ride_repo(),
        routes: state.directions.clone(),
        currency: state.currency.to_string(),
    };
    let ride = usecase.execute(actor.user_id, input).await?;
    Ok((StatusCode::CREATED, Json(ride.into())))
}

// ── GET /rides ───────────────────────────────────────────────────────────────

pub async fn list_rides(
    identity: Result<SessionIdentity, AppError>,
    State(state): State<AppState>,
    Query(page): Query<PageRequest>,
) -> Result<Json<Vec<RideResponse>>, RidesServiceError> {
    let actor = actor(identity)?;
    let usecase = ListRidesUseCase {
        rides: state.ride_repo(),
    };
    let rides = usecase.execute(actor.user_id, page).await?;
    Ok(Json(rides.into_iter().map(RideResponse::from).collect()))
}

// ── GET /rides/{id} ──────────────────────────────────────────────────────────

pub async fn get_ride(
    identity: Result<SessionIdentity, AppError>,
    State(state): State<AppState>,
    Path(id): Path<RideId>,
) -> Result<Json<RideResponse>, RidesServiceError> {
    let actor = actor(identity)?;
    let usecase = GetRideUseCase {
        rides: state.ride_repo(),
    };
    let ride = usecase.execute(actor.user_id, id).await?;
    Ok(Json(ride.into()))
}

// ── PATCH /rides/{id} ────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct UpdateRideRequest {
    pub status: Option<String>,
}

fn parse_status(status: Option<String>) -> Result<RideStatus, RidesServiceError> {
    let status = status
        .map(|s| s.trim().to_owned())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| RidesServiceError::MissingFields(vec!["status"]))?;
    status
        .parse()
        .map_err(|_| RidesServiceError::UnknownStatus(status))
}

pub async fn update_ride(
    identity: Result<SessionIdentity, AppError>,
    State(state): State<AppState>,
    Path(id): Path<RideId>,
    Json(body): Json<UpdateRideRequest>,
) -> Result<Json<RideResponse>, RidesServiceError> {
    let actor = actor(identity)?;
    let next = parse_status(body.status)?;
    let usecase = UpdateRideStatusUseCase {
        rides: state.ride_repo(),
    };
    let ride = usecase.execute(actor, id, next).await?;
    Ok(Json(ride.into()))
}

// ── DELETE /rides/{id} ───────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct DeleteRideResponse {
    pub message: &'static str,
}

pub async fn delete_ride(
    identity: Result<SessionIdentity, AppError>,
    State(state): State<AppState>,
    Path(id): Path<RideId>,
) -> Result<Json<DeleteRideResponse>, RidesServiceError> {
    let actor = actor(identity)?;
    let usecase = DeleteRideUseCase {
        rides: state.ride_repo(),
    };
    usecase.execute(actor.user_id, id).await?;
    Ok(Json(DeleteRideResponse {
        message: "Ride deleted successfully",
    }))
}
