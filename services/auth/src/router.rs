use axum::{
    Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};

use aeroride_core::health::{healthz, readiness};
use aeroride_core::middleware::{propagate_request_id_layer, request_id_layer, trace_layer};

use crate::handlers::{
    otp::{issue_otp, verify_otp},
    token::{check_token, refresh_token, revoke_token},
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
        // One-time codes
        .route("/auth/otp", post(issue_otp))
        .route("/auth/otp/verify", post(verify_otp))
        // Session
        .route(
            "/auth/token",
            get(check_token).patch(refresh_token).delete(revoke_token),
        )
        .layer(propagate_request_id_layer())
        .layer(trace_layer())
        .layer(request_id_layer())
        .with_state(state)
}
