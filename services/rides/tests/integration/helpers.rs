use std::sync::{Arc, Mutex};

use chrono::Utc;

use aeroride_domain::geo::Coordinates;
use aeroride_domain::id::{RideId, UserId};
use aeroride_domain::pagination::PageRequest;
use aeroride_domain::ride::RideStatus;
use aeroride_rides::domain::repository::{RideRepository, RouteError, RoutePort};
use aeroride_rides::domain::types::{Place, Ride, RouteEstimate, StatusChange};
use aeroride_rides::error::RidesServiceError;
use aeroride_rides::usecase::ride::CreateRideInput;

pub const CURRENCY: &str = "NGN";

/// Murtala Muhammed International, Lagos.
pub const AIRPORT: Coordinates = Coordinates {
    latitude: 6.5774,
    longitude: 3.3212,
};

/// Ten kilometers due north of [`AIRPORT`] along its meridian.
pub fn ten_km_north() -> Coordinates {
    let delta = (10.0_f64 / 6371.0).to_degrees();
    Coordinates::new(AIRPORT.latitude + delta, AIRPORT.longitude)
}

// ── MockRideRepo ─────────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockRideRepo {
    pub rides: Arc<Mutex<Vec<Ride>>>,
}

impl MockRideRepo {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn get(&self, id: RideId) -> Option<Ride> {
        self.rides
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id == id)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.rides.lock().unwrap().len()
    }

    /// Edit a stored ride in place, bypassing the lifecycle.
    pub fn modify(&self, id: RideId, edit: impl FnOnce(&mut Ride)) {
        let mut rides = self.rides.lock().unwrap();
        if let Some(ride) = rides.iter_mut().find(|r| r.id == id) {
            edit(ride);
        }
    }

    pub fn set_status(&self, id: RideId, status: RideStatus) {
        self.modify(id, |ride| ride.status = status);
    }
}

impl RideRepository for MockRideRepo {
    async fn create(&self, ride: &Ride) -> Result<(), RidesServiceError> {
        self.rides.lock().unwrap().push(ride.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: RideId) -> Result<Option<Ride>, RidesServiceError> {
        Ok(self.get(id))
    }

    async fn find_by_qr_code(&self, qr_code: &str) -> Result<Option<Ride>, RidesServiceError> {
        Ok(self
            .rides
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.qr_code == qr_code)
            .cloned())
    }

    async fn list_for_user(
        &self,
        user: UserId,
        page: PageRequest,
    ) -> Result<Vec<Ride>, RidesServiceError> {
        let mut rides: Vec<Ride> = self
            .rides
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.is_party(user))
            .cloned()
            .collect();
        rides.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rides
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.clamped().per_page as usize)
            .collect())
    }

    async fn update_status(&self, change: &StatusChange) -> Result<bool, RidesServiceError> {
        let mut rides = self.rides.lock().unwrap();
        let Some(ride) = rides.iter_mut().find(|r| r.id == change.ride_id) else {
            return Ok(false);
        };
        if ride.status != change.expected {
            return Ok(false);
        }
        if let Some(driver) = change.assign_driver {
            if ride.driver_id.is_some() {
                return Ok(false);
            }
            ride.driver_id = Some(driver);
        }
        ride.status = change.next;
        ride.updated_at = Utc::now();
        Ok(true)
    }

    async fn delete_deletable(
        &self,
        id: RideId,
        passenger: UserId,
    ) -> Result<bool, RidesServiceError> {
        let mut rides = self.rides.lock().unwrap();
        let before = rides.len();
        rides.retain(|r| {
            !(r.id == id
                && r.passenger_id == passenger
                && matches!(r.status, RideStatus::Pending | RideStatus::Cancelled))
        });
        Ok(rides.len() < before)
    }
}

// ── Route stubs ──────────────────────────────────────────────────────────────

/// Always answers with the same routed leg.
#[derive(Clone, Copy)]
pub struct StubRoute(pub RouteEstimate);

impl RoutePort for StubRoute {
    async fn route(
        &self,
        _from: &Coordinates,
        _to: &Coordinates,
    ) -> Result<RouteEstimate, RouteError> {
        Ok(self.0)
    }
}

/// Provider that is down.
#[derive(Clone, Copy)]
pub struct UnavailableRoute;

impl RoutePort for UnavailableRoute {
    async fn route(
        &self,
        _from: &Coordinates,
        _to: &Coordinates,
    ) -> Result<RouteEstimate, RouteError> {
        Err(RouteError::Unavailable("connection refused".to_owned()))
    }
}

// ── Fixtures ─────────────────────────────────────────────────────────────────

pub fn booking(vehicle_type: &str) -> CreateRideInput {
    CreateRideInput {
        airport_id: "LOS".to_owned(),
        pickup: Place {
            label: "Terminal 1".to_owned(),
            coordinates: AIRPORT,
        },
        destination: Place {
            label: "Ten km north".to_owned(),
            coordinates: ten_km_north(),
        },
        vehicle_type: vehicle_type.to_owned(),
        passenger_count: None,
        special_requests: None,
        scheduled_time: None,
    }
}
