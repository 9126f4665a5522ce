use serde::Deserialize;

use aeroride_core::config::Config;

/// Which store backs the issuance rate limiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RateLimitBackend {
    /// Per-process `DashMap`; state is lost on restart.
    #[default]
    Memory,
    /// Shared across instances; requires `REDIS_URL`.
    Redis,
}

/// Auth service configuration loaded from environment variables.
#[derive(Clone, Deserialize)]
pub struct AuthConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// HMAC secret for signing access and refresh tokens.
    pub jwt_secret: String,
    /// Cookie domain attribute (e.g. "aeroride.ng").
    pub cookie_domain: String,
    /// TCP port to listen on. Env var: `AUTH_PORT`.
    #[serde(default = "default_auth_port")]
    pub auth_port: u16,
    /// Resend API key for login-code emails.
    pub resend_api_key: String,
    /// Sender shown on login-code emails.
    #[serde(default = "default_mail_from")]
    pub mail_from: String,
    #[serde(default = "default_resend_base_url")]
    pub resend_base_url: String,
    /// Upper bound on one email API call.
    #[serde(default = "default_mailer_timeout_ms")]
    pub mailer_timeout_ms: u64,
    #[serde(default)]
    pub rate_limit_backend: RateLimitBackend,
    pub redis_url: Option<String>,
    /// Cap on identifiers tracked by the in-memory limiter.
    #[serde(default = "default_rate_limit_max_entries")]
    pub rate_limit_max_entries: usize,
}

impl Config for AuthConfig {}

fn default_auth_port() -> u16 {
    3112
}

fn default_mail_from() -> String {
    "AeroRide <no-reply@aeroride.ng>".to_owned()
}

fn default_resend_base_url() -> String {
    "https://api.resend.com".to_owned()
}

fn default_mailer_timeout_ms() -> u64 {
    5_000
}

fn default_rate_limit_max_entries() -> usize {
    10_000
}
