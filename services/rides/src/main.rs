use std::time::Duration;

use sea_orm::Database;
use tracing::{info, warn};

use aeroride_auth_types::identity::JwtSecret;
use aeroride_core::config::Config;
use aeroride_core::tracing::init_tracing;
use aeroride_rides::config::RidesConfig;
use aeroride_rides::infra::directions::GoogleDirections;
use aeroride_rides::router::build_router;
use aeroride_rides::state::AppState;

#[tokio::main]
async fn main() {
    init_tracing();

    let config = RidesConfig::from_env();

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    if config.google_maps_api_key.is_none() {
        warn!("GOOGLE_MAPS_API_KEY not set, fares use straight-line distance");
    }
    let directions = GoogleDirections::new(
        &config.directions_base_url,
        config.google_maps_api_key.as_deref(),
        Duration::from_millis(config.directions_timeout_ms),
    )
    .expect("failed to build directions client");

    let state = AppState {
        db,
        jwt_secret: JwtSecret::new(config.jwt_secret.as_str()),
        directions,
        currency: config.fare_currency.as_str().into(),
    };

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.rides_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!("rides service listening on {addr}");
    axum::serve(listener, router).await.expect("server error");
}
