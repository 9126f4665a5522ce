use std::sync::Arc;
use std::time::Duration;

use sea_orm::Database;
use tracing::info;

use aeroride_auth::config::{AuthConfig, RateLimitBackend};
use aeroride_auth::infra::mailer::ResendMailer;
use aeroride_auth::infra::rate_limit::{MemoryRateLimiter, RateLimiter, RedisRateLimiter};
use aeroride_auth::router::build_router;
use aeroride_auth::state::AppState;
use aeroride_auth_types::identity::JwtSecret;
use aeroride_core::config::Config;
use aeroride_core::tracing::init_tracing;

fn build_rate_limiter(config: &AuthConfig) -> RateLimiter {
    match config.rate_limit_backend {
        RateLimitBackend::Memory => RateLimiter::Memory(Arc::new(MemoryRateLimiter::new(
            config.rate_limit_max_entries,
        ))),
        RateLimitBackend::Redis => {
            let url = config
                .redis_url
                .as_deref()
                .expect("REDIS_URL is required when RATE_LIMIT_BACKEND=redis");
            let pool = deadpool_redis::Config::from_url(url)
                .create_pool(Some(deadpool_redis::Runtime::Tokio1))
                .expect("failed to create Redis pool");
            RateLimiter::Redis(RedisRateLimiter::new(pool))
        }
    }
}

#[tokio::main]
async fn main() {
    init_tracing();

    let config = AuthConfig::from_env();

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    let mailer = ResendMailer::new(
        &config.resend_base_url,
        &config.resend_api_key,
        &config.mail_from,
        Duration::from_millis(config.mailer_timeout_ms),
    )
    .expect("failed to build mail client");

    let rate_limiter = build_rate_limiter(&config);
    info!(backend = ?config.rate_limit_backend, "issuance rate limiter ready");

    let state = AppState {
        db,
        jwt_secret: JwtSecret::new(config.jwt_secret.as_str()),
        cookie_domain: config.cookie_domain.clone(),
        mailer,
        rate_limiter,
    };

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.auth_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!("auth service listening on {addr}");
    axum::serve(listener, router).await.expect("server error");
}
