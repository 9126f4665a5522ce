use std::time::Duration;

use chrono::{DateTime, Utc};

use aeroride_domain::id::{OtpId, UserId};
use aeroride_domain::user::UserRole;

/// Number of digits in a login code.
pub const OTP_LEN: usize = 6;

/// Smallest and largest code values; codes never start with zero.
pub const OTP_MIN: u32 = 100_000;
pub const OTP_MAX: u32 = 999_999;

/// Login code lifetime in seconds (5 minutes).
pub const OTP_TTL_SECS: i64 = 300;

/// Client-facing cooldown before offering "resend", in seconds.
pub const RESEND_COOLDOWN_SECS: i64 = 30;

/// Issuance throttle: at most `RATE_LIMIT_MAX_ATTEMPTS` codes per identifier
/// within `RATE_LIMIT_WINDOW` of the last allowed attempt.
pub const RATE_LIMIT_MAX_ATTEMPTS: u32 = 3;
pub const RATE_LIMIT_WINDOW: Duration = Duration::from_secs(30);

/// A stored login code.
#[derive(Debug, Clone)]
pub struct OneTimeCode {
    pub id: OtpId,
    pub email: String,
    pub code: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub is_used: bool,
    /// Persisted for schema compatibility; never incremented.
    pub attempts: i32,
}

impl OneTimeCode {
    pub fn issue(email: &str, code: String, now: DateTime<Utc>) -> Self {
        Self {
            id: OtpId::generate(),
            email: email.to_owned(),
            code,
            created_at: now,
            expires_at: now + chrono::Duration::seconds(OTP_TTL_SECS),
            is_used: false,
            attempts: 0,
        }
    }

    /// Unused and not past `expires_at` (inclusive).
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        !self.is_used && self.expires_at >= now
    }
}

/// Identity resolved at sign-in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub id: UserId,
    pub email: String,
    pub role: UserRole,
}

/// User + default profile to create for a first-time email.
#[derive(Debug, Clone)]
pub struct NewIdentity {
    pub email: String,
    pub full_name: String,
    pub role: UserRole,
}

/// Partner-specific profile created next to the default profile.
#[derive(Debug, Clone, PartialEq)]
pub enum RoleProfile {
    Driver {
        experience_years: i32,
        background_check_status: String,
    },
    Garage {
        business_name: String,
        contact_email: String,
        capacity: i32,
    },
    Airline {
        airline_name: String,
        contact_person: String,
        email_address: String,
        partnership_type: String,
        commission_rate: f64,
    },
}

impl RoleProfile {
    /// Defaults for a new partner account; `None` for roles without one.
    pub fn for_new_user(role: UserRole, full_name: &str, email: &str) -> Option<Self> {
        match role {
            UserRole::Driver => Some(Self::Driver {
                experience_years: 0,
                background_check_status: "pending".to_owned(),
            }),
            UserRole::GaragePartner => Some(Self::Garage {
                business_name: format!("{full_name}'s Garage"),
                contact_email: email.to_owned(),
                capacity: 10,
            }),
            UserRole::AirlinePartner => Some(Self::Airline {
                airline_name: format!("{full_name} Airlines"),
                contact_person: full_name.to_owned(),
                email_address: email.to_owned(),
                partnership_type: "standard".to_owned(),
                commission_rate: 0.05,
            }),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Driver { .. } => "driver",
            Self::Garage { .. } => "garage",
            Self::Airline { .. } => "airline",
        }
    }
}

/// Result of an operation whose auxiliary writes may fail without failing
/// the operation itself.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Complete(T),
    Partial { primary: T, auxiliary: String },
}

impl<T> Outcome<T> {
    pub fn primary(&self) -> &T {
        match self {
            Self::Complete(primary) | Self::Partial { primary, .. } => primary,
        }
    }

    /// Split into the primary value and the auxiliary failure, if any.
    pub fn into_parts(self) -> (T, Option<String>) {
        match self {
            Self::Complete(primary) => (primary, None),
            Self::Partial { primary, auxiliary } => (primary, Some(auxiliary)),
        }
    }
}

/// Verdict of an issuance rate-limit check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateDecision {
    Allowed,
    Limited { retry_after: Duration },
}

/// Local part of an email, used as display name when none is given.
pub fn email_local_part(email: &str) -> &str {
    email.split('@').next().unwrap_or(email)
}
