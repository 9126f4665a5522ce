use aeroride_domain::geo::Coordinates;
use aeroride_domain::vehicle::VehicleClass;
use aeroride_rides::domain::types::{RouteEstimate, RouteSource};
use aeroride_rides::error::RidesServiceError;
use aeroride_rides::usecase::estimate::{EstimateFareUseCase, EstimateInput};

use crate::helpers::{AIRPORT, CURRENCY, StubRoute, UnavailableRoute, ten_km_north};

fn input(destination: Coordinates, vehicle_type: &str) -> EstimateInput {
    EstimateInput {
        pickup: AIRPORT,
        destination,
        vehicle_type: vehicle_type.to_owned(),
    }
}

fn fallback_usecase() -> EstimateFareUseCase<UnavailableRoute> {
    EstimateFareUseCase {
        routes: UnavailableRoute,
        currency: CURRENCY.to_owned(),
    }
}

#[tokio::test]
async fn should_charge_base_fare_for_zero_distance() {
    let quote = fallback_usecase()
        .execute(input(AIRPORT, "compact"))
        .await
        .unwrap();

    assert_eq!(quote.distance_km, 0.0);
    assert_eq!(quote.estimated_duration, 0);
    assert_eq!(quote.fare_amount, 500.0);
    assert_eq!(quote.currency, "NGN");
    assert_eq!(quote.route_source, RouteSource::Haversine);
}

#[tokio::test]
async fn should_price_straight_line_when_routing_unavailable() {
    let quote = fallback_usecase()
        .execute(input(ten_km_north(), "suv"))
        .await
        .unwrap();

    assert!((quote.distance_km - 10.0).abs() < 1e-6);
    assert_eq!(
        quote.estimated_duration,
        (quote.distance_km * 2.0).ceil() as u32
    );
    assert!((quote.fare_amount - 2_800.0).abs() < 1e-3);
    assert_eq!(quote.vehicle_type, VehicleClass::Suv);
    assert_eq!(quote.route_source, RouteSource::Haversine);
}

#[tokio::test]
async fn should_price_unknown_class_as_compact() {
    let quote = fallback_usecase()
        .execute(input(AIRPORT, "hovercraft"))
        .await
        .unwrap();

    assert_eq!(quote.vehicle_type, VehicleClass::Compact);
    assert_eq!(quote.fare_amount, 500.0);
}

#[tokio::test]
async fn should_prefer_routed_distance() {
    let usecase = EstimateFareUseCase {
        routes: StubRoute(RouteEstimate::from_leg(12_000.0, 1_500.0)),
        currency: CURRENCY.to_owned(),
    };

    let quote = usecase
        .execute(input(ten_km_north(), "luxury"))
        .await
        .unwrap();

    assert_eq!(quote.distance_km, 12.0);
    assert_eq!(quote.estimated_duration, 25);
    assert_eq!(quote.fare_amount, 1_500.0 + 12.0 * 400.0);
    assert_eq!(quote.route_source, RouteSource::Directions);
}

#[tokio::test]
async fn should_reject_out_of_range_coordinates() {
    for destination in [
        Coordinates::new(91.0, 0.0),
        Coordinates::new(0.0, -180.5),
        Coordinates::new(f64::NAN, 0.0),
    ] {
        let result = fallback_usecase().execute(input(destination, "compact")).await;
        assert!(matches!(result, Err(RidesServiceError::InvalidCoordinates)));
    }
}
