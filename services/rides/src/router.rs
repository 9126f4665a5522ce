use axum::{
    Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};

use aeroride_core::health::{healthz, readiness};
use aeroride_core::middleware::{propagate_request_id_layer, request_id_layer, trace_layer};

use crate::handlers::{
    estimate::estimate_fare,
    ride::{create_ride, delete_ride, get_ride, list_rides, update_ride},
    ticket::{scan_ticket, verify_ticket},
};
use crate::infra::db::ping;
use crate::state::AppState;

async fn readyz(State(state): State<AppState>) -> StatusCode {
    readiness(ping(&state.db).await)
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Fares
        .route("/rides/estimate", post(estimate_fare))
        // Bookings
        .route("/rides", get(list_rides).post(create_ride))
        // Tickets
        .route("/rides/tickets/scan", post(scan_ticket))
        .route("/rides/tickets/{qr_code}", get(verify_ticket))
        .route(
            "/rides/{id}",
            get(get_ride).patch(update_ride).delete(delete_ride),
        )
        .layer(propagate_request_id_layer())
        .layer(trace_layer())
        .layer(request_id_layer())
        .with_state(state)
}
