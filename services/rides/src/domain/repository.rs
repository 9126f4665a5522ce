#![allow(async_fn_in_trait)]

use aeroride_domain::geo::Coordinates;
use aeroride_domain::id::{RideId, UserId};
use aeroride_domain::pagination::PageRequest;

use crate::domain::types::{Ride, RouteEstimate, StatusChange};
use crate::error::RidesServiceError;

/// Why a routed estimate is unavailable. Never reaches callers: every
/// variant falls back to the straight-line distance.
#[derive(Debug, thiserror::Error)]
pub enum RouteError {
    #[error("routing provider not configured")]
    NotConfigured,
    #[error("routing provider found no route")]
    NoRoute,
    #[error("routing provider unavailable: {0}")]
    Unavailable(String),
}

/// Road distance and travel time between two points.
pub trait RoutePort: Send + Sync {
    async fn route(
        &self,
        from: &Coordinates,
        to: &Coordinates,
    ) -> Result<RouteEstimate, RouteError>;
}

pub trait RideRepository: Send + Sync {
    async fn create(&self, ride: &Ride) -> Result<(), RidesServiceError>;

    async fn find_by_id(&self, id: RideId) -> Result<Option<Ride>, RidesServiceError>;

    async fn find_by_qr_code(&self, qr_code: &str) -> Result<Option<Ride>, RidesServiceError>;

    /// Rides where `user` is passenger or driver, newest first.
    async fn list_for_user(
        &self,
        user: UserId,
        page: PageRequest,
    ) -> Result<Vec<Ride>, RidesServiceError>;

    /// `false` when the guard no longer matched (concurrent change).
    async fn update_status(&self, change: &StatusChange) -> Result<bool, RidesServiceError>;

    /// Delete only while the ride belongs to `passenger` and is still
    /// pending or cancelled.
    async fn delete_deletable(
        &self,
        id: RideId,
        passenger: UserId,
    ) -> Result<bool, RidesServiceError>;
}
