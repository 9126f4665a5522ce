use axum::extract::FromRef;
use sea_orm::DatabaseConnection;

use aeroride_auth_types::identity::JwtSecret;

use crate::infra::code::RandomCodeGenerator;
use crate::infra::db::{DbIdentityRepository, DbOtpRepository};
use crate::infra::mailer::ResendMailer;
use crate::infra::rate_limit::RateLimiter;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub jwt_secret: JwtSecret,
    pub cookie_domain: String,
    pub mailer: ResendMailer,
    pub rate_limiter: RateLimiter,
}

impl AppState {
    pub fn otp_repo(&self) -> DbOtpRepository {
        DbOtpRepository {
            db: self.db.clone(),
        }
    }

    pub fn identity_repo(&self) -> DbIdentityRepository {
        DbIdentityRepository {
            db: self.db.clone(),
        }
    }

    pub fn code_generator(&self) -> RandomCodeGenerator {
        RandomCodeGenerator
    }
}

impl FromRef<AppState> for JwtSecret {
    fn from_ref(state: &AppState) -> Self {
        state.jwt_secret.clone()
    }
}
