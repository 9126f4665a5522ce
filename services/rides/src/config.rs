use serde::Deserialize;

use aeroride_core::config::Config;

/// Rides service configuration loaded from environment variables.
#[derive(Clone, Deserialize)]
pub struct RidesConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// HMAC secret shared with the auth service.
    pub jwt_secret: String,
    /// TCP port to listen on. Env var: `RIDES_PORT`.
    #[serde(default = "default_rides_port")]
    pub rides_port: u16,
    /// Without a key every estimate uses the straight-line fallback.
    pub google_maps_api_key: Option<String>,
    #[serde(default = "default_directions_base_url")]
    pub directions_base_url: String,
    #[serde(default = "default_directions_timeout_ms")]
    pub directions_timeout_ms: u64,
    /// ISO 4217 code stamped on every quote.
    #[serde(default = "default_fare_currency")]
    pub fare_currency: String,
}

impl Config for RidesConfig {}

fn default_rides_port() -> u16 {
    3114
}

fn default_directions_base_url() -> String {
    "https://maps.googleapis.com".to_owned()
}

fn default_directions_timeout_ms() -> u64 {
    3_000
}

fn default_fare_currency() -> String {
    "NGN".to_owned()
}
