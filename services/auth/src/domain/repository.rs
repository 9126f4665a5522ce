#![allow(async_fn_in_trait)]

use chrono::{DateTime, Utc};

use aeroride_domain::id::{OtpId, UserId};

use crate::domain::types::{AuthUser, NewIdentity, OneTimeCode, RateDecision, RoleProfile};
use crate::error::AuthServiceError;

/// Storage for login codes.
pub trait OtpRepository: Send + Sync {
    /// Delete codes whose `expires_at` is before `now`. Returns rows removed.
    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, AuthServiceError>;

    async fn create(&self, otp: &OneTimeCode) -> Result<(), AuthServiceError>;

    async fn delete(&self, id: OtpId) -> Result<(), AuthServiceError>;

    /// Newest unused, unexpired row matching `email` and `code`.
    async fn find_latest_valid(
        &self,
        email: &str,
        code: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<OneTimeCode>, AuthServiceError>;

    /// Flip `is_used` only if it is still false. `false` means another
    /// request consumed the code first.
    async fn consume(&self, id: OtpId) -> Result<bool, AuthServiceError>;
}

/// Users and their profiles.
pub trait IdentityRepository: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<AuthUser>, AuthServiceError>;

    async fn find_by_id(&self, id: UserId) -> Result<Option<AuthUser>, AuthServiceError>;

    /// Create the user and its default profile in one transaction.
    async fn create(&self, identity: &NewIdentity) -> Result<AuthUser, AuthServiceError>;

    async fn create_role_profile(
        &self,
        user_id: UserId,
        profile: &RoleProfile,
    ) -> Result<(), AuthServiceError>;
}

#[derive(Debug, thiserror::Error)]
#[error("delivery failed: {0}")]
pub struct DeliveryError(pub String);

/// Delivers login codes to the user.
pub trait OtpMailer: Send + Sync {
    async fn send_code(&self, email: &str, code: &str) -> Result<(), DeliveryError>;
}

/// Source of login codes.
pub trait CodeGenerator: Send + Sync {
    /// A decimal string in `OTP_MIN..=OTP_MAX`.
    fn generate(&self) -> String;
}

/// Per-identifier issuance throttle.
pub trait IssueRateLimiter: Send + Sync {
    /// Record an attempt for `key` unless it is over the limit.
    async fn check(&self, key: &str) -> Result<RateDecision, AuthServiceError>;
}
