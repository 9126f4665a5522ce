use tracing::warn;

use aeroride_domain::geo::Coordinates;
use aeroride_domain::vehicle::VehicleClass;

use crate::domain::repository::RoutePort;
use crate::domain::types::{FareQuote, RouteEstimate, RouteSource};
use crate::error::RidesServiceError;

pub(crate) fn validate_coordinates(points: [Coordinates; 2]) -> Result<(), RidesServiceError> {
    for point in points {
        point
            .validated()
            .map_err(|_| RidesServiceError::InvalidCoordinates)?;
    }
    Ok(())
}

/// Price a trip. Routing failures of any kind fall back to the
/// straight-line distance; pricing itself cannot fail.
pub async fn quote_trip<P: RoutePort>(
    routes: &P,
    currency: &str,
    pickup: &Coordinates,
    destination: &Coordinates,
    vehicle: VehicleClass,
) -> FareQuote {
    let (route, source) = match routes.route(pickup, destination).await {
        Ok(route) => (route, RouteSource::Directions),
        Err(e) => {
            warn!(error = %e, "routing unavailable, using straight-line distance");
            (
                RouteEstimate::straight_line(pickup, destination),
                RouteSource::Haversine,
            )
        }
    };
    FareQuote::price(route, source, vehicle, currency)
}

pub struct EstimateInput {
    pub pickup: Coordinates,
    pub destination: Coordinates,
    /// Free-form class name; unknown names price as compact.
    pub vehicle_type: String,
}

pub struct EstimateFareUseCase<P: RoutePort> {
    pub routes: P,
    pub currency: String,
}

impl<P: RoutePort> EstimateFareUseCase<P> {
    pub async fn execute(&self, input: EstimateInput) -> Result<FareQuote, RidesServiceError> {
        validate_coordinates([input.pickup, input.destination])?;
        let vehicle = VehicleClass::from_name_lenient(&input.vehicle_type);
        Ok(quote_trip(
            &self.routes,
            &self.currency,
            &input.pickup,
            &input.destination,
            vehicle,
        )
        .await)
    }
}
