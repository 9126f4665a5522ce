use std::sync::Arc;

use axum::extract::FromRef;
use sea_orm::DatabaseConnection;

use aeroride_auth_types::identity::JwtSecret;

use crate::infra::db::DbRideRepository;
use crate::infra::directions::GoogleDirections;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub jwt_secret: JwtSecret,
    pub directions: GoogleDirections,
    /// Stamped on every quote.
    pub currency: Arc<str>,
}

impl AppState {
    pub fn ride_repo(&self) -> DbRideRepository {
        DbRideRepository {
            db: self.db.clone(),
        }
    }
}

impl FromRef<AppState> for JwtSecret {
    fn from_ref(state: &AppState) -> Self {
        state.jwt_secret.clone()
    }
}
