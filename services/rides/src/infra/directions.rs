use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use aeroride_domain::geo::Coordinates;

use crate::domain::repository::{RouteError, RoutePort};
use crate::domain::types::RouteEstimate;

#[derive(Debug, Deserialize)]
struct DirectionsResponse {
    #[serde(default)]
    routes: Vec<DirectionsRoute>,
}

#[derive(Debug, Deserialize)]
struct DirectionsRoute {
    #[serde(default)]
    legs: Vec<DirectionsLeg>,
}

#[derive(Debug, Deserialize)]
struct DirectionsLeg {
    distance: LegValue,
    duration: LegValue,
}

#[derive(Debug, Deserialize)]
struct LegValue {
    value: f64,
}

/// Road routes from the Google Directions API. Without an API key every
/// call reports [`RouteError::NotConfigured`].
#[derive(Clone)]
pub struct GoogleDirections {
    client: reqwest::Client,
    base_url: Arc<str>,
    api_key: Option<Arc<str>>,
}

impl GoogleDirections {
    pub fn new(
        base_url: &str,
        api_key: Option<&str>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').into(),
            api_key: api_key.filter(|k| !k.is_empty()).map(Into::into),
        })
    }

    fn url(&self, from: &Coordinates, to: &Coordinates, key: &str) -> String {
        format!(
            "{}/maps/api/directions/json?origin={},{}&destination={},{}&key={}",
            self.base_url, from.latitude, from.longitude, to.latitude, to.longitude, key
        )
    }
}

/// First leg of the first route, if any.
fn first_leg(response: DirectionsResponse) -> Result<RouteEstimate, RouteError> {
    let leg = response
        .routes
        .into_iter()
        .next()
        .and_then(|route| route.legs.into_iter().next())
        .ok_or(RouteError::NoRoute)?;
    Ok(RouteEstimate::from_leg(leg.distance.value, leg.duration.value))
}

impl RoutePort for GoogleDirections {
    async fn route(
        &self,
        from: &Coordinates,
        to: &Coordinates,
    ) -> Result<RouteEstimate, RouteError> {
        let key = self.api_key.as_deref().ok_or(RouteError::NotConfigured)?;

        let response = self
            .client
            .get(self.url(from, to, key))
            .send()
            .await
            .map_err(|e| RouteError::Unavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RouteError::Unavailable(format!("directions returned {status}")));
        }

        let body: DirectionsResponse = response
            .json()
            .await
            .map_err(|e| RouteError::Unavailable(e.to_string()))?;
        debug!(routes = body.routes.len(), "directions response");
        first_leg(body)
    }
}
