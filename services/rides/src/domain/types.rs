use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use aeroride_domain::geo::Coordinates;
use aeroride_domain::id::{RideId, UserId};
use aeroride_domain::ride::RideStatus;
use aeroride_domain::user::UserRole;
use aeroride_domain::vehicle::VehicleClass;

/// Distance and travel time between two points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteEstimate {
    pub distance_km: f64,
    /// Minutes, rounded up.
    pub duration_minutes: u32,
}

impl RouteEstimate {
    /// From a routed leg: meters and seconds.
    pub fn from_leg(distance_m: f64, duration_s: f64) -> Self {
        Self {
            distance_km: distance_m / 1000.0,
            duration_minutes: (duration_s / 60.0).ceil().max(0.0) as u32,
        }
    }

    /// Straight-line fallback: two minutes per kilometer.
    pub fn straight_line(from: &Coordinates, to: &Coordinates) -> Self {
        let distance_km = from.haversine_km(to);
        Self {
            distance_km,
            duration_minutes: (distance_km * 2.0).ceil() as u32,
        }
    }
}

/// Where a quote's distance came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteSource {
    Directions,
    Haversine,
}

impl RouteSource {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Directions => "directions",
            Self::Haversine => "haversine",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "directions" => Some(Self::Directions),
            "haversine" => Some(Self::Haversine),
            _ => None,
        }
    }
}

/// Priced trip between two points.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FareQuote {
    pub distance_km: f64,
    pub estimated_duration: u32,
    pub fare_amount: f64,
    pub currency: String,
    pub vehicle_type: VehicleClass,
    pub route_source: RouteSource,
}

impl FareQuote {
    pub fn price(
        route: RouteEstimate,
        source: RouteSource,
        vehicle: VehicleClass,
        currency: &str,
    ) -> Self {
        Self {
            distance_km: route.distance_km,
            estimated_duration: route.duration_minutes,
            fare_amount: vehicle.rate().fare_for(route.distance_km),
            currency: currency.to_owned(),
            vehicle_type: vehicle,
            route_source: source,
        }
    }
}

/// Named point on a trip.
#[derive(Debug, Clone, PartialEq)]
pub struct Place {
    pub label: String,
    pub coordinates: Coordinates,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Ride {
    pub id: RideId,
    pub passenger_id: UserId,
    pub driver_id: Option<UserId>,
    pub airport_id: String,
    pub pickup: Place,
    pub destination: Place,
    pub quote: FareQuote,
    pub passenger_count: i32,
    pub special_requests: Option<String>,
    /// Ticket presented at pickup.
    pub qr_code: String,
    pub scheduled_time: Option<DateTime<Utc>>,
    pub status: RideStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// How far from its pickup time a ticket is still honoured, either side.
pub const TICKET_VALIDITY_HOURS: i64 = 24;

impl Ride {
    pub fn is_party(&self, user: UserId) -> bool {
        self.passenger_id == user || self.driver_id == Some(user)
    }

    /// Pickup time, or booking time for immediate rides.
    pub fn ticket_anchor(&self) -> DateTime<Utc> {
        self.scheduled_time.unwrap_or(self.created_at)
    }

    /// A ticket is honoured within 24 h of its anchor while the ride is
    /// still open.
    pub fn ticket_valid_at(&self, now: DateTime<Utc>) -> bool {
        let open = matches!(
            self.status,
            RideStatus::Pending | RideStatus::Accepted | RideStatus::InProgress
        );
        let anchor = self.ticket_anchor();
        let window = Duration::hours(TICKET_VALIDITY_HOURS);
        open && now - anchor <= window && anchor - now <= window
    }
}

/// Authenticated caller acting on rides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub user_id: UserId,
    pub role: UserRole,
}

/// Guarded status write: applied only while the stored ride still has
/// `expected` status (and no driver, when `assign_driver` is set).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatusChange {
    pub ride_id: RideId,
    pub expected: RideStatus,
    pub next: RideStatus,
    pub assign_driver: Option<UserId>,
}
