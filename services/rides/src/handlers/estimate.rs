use axum::{Json, extract::State};
use serde::Deserialize;

use aeroride_domain::geo::Coordinates;

use crate::domain::types::FareQuote;
use crate::error::RidesServiceError;
use crate::state::AppState;
use crate::usecase::estimate::{EstimateFareUseCase, EstimateInput};

// ── POST /rides/estimate ─────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct EstimateRequest {
    pub pickup_latitude: Option<f64>,
    pub pickup_longitude: Option<f64>,
    pub destination_latitude: Option<f64>,
    pub destination_longitude: Option<f64>,
    #[serde(default)]
    pub vehicle_type: String,
}

impl EstimateRequest {
    fn into_input(self) -> Result<EstimateInput, RidesServiceError> {
        let mut missing = Vec::new();
        let mut take = |value: Option<f64>, name: &'static str| {
            if value.is_none() {
                missing.push(name);
            }
            value.unwrap_or_default()
        };
        let pickup = Coordinates::new(
            take(self.pickup_latitude, "pickup_latitude"),
            take(self.pickup_longitude, "pickup_longitude"),
        );
        let destination = Coordinates::new(
            take(self.destination_latitude, "destination_latitude"),
            take(self.destination_longitude, "destination_longitude"),
        );
        if !missing.is_empty() {
            return Err(RidesServiceError::MissingFields(missing));
        }
        Ok(EstimateInput {
            pickup,
            destination,
            vehicle_type: self.vehicle_type,
        })
    }
}

pub async fn estimate_fare(
    State(state): State<AppState>,
    Json(body): Json<EstimateRequest>,
) -> Result<Json<FareQuote>, RidesServiceError> {
    let usecase = EstimateFareUseCase {
        routes: state.directions.clone(),
        currency: state.currency.to_string(),
    };
    let quote = usecase.execute(body.into_input()?).await?;
    Ok(Json(quote))
}
