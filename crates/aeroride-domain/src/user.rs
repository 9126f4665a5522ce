//! User role domain types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Marketplace role attached to a profile.
///
/// Wire format inside session tokens: `u8` (see [`UserRole::as_u8`]).
/// Storage format: the snake_case name (see [`UserRole::as_str`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    #[default]
    Passenger = 0,
    Driver = 1,
    GaragePartner = 2,
    AirlinePartner = 3,
    AirlineAdmin = 4,
    SuperAdmin = 5,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown user role: {0}")]
pub struct UnknownRole(pub String);

impl UserRole {
    /// Convert from `u8` wire value. Returns `None` for unknown values.
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(Self::Passenger),
            1 => Some(Self::Driver),
            2 => Some(Self::GaragePartner),
            3 => Some(Self::AirlinePartner),
            4 => Some(Self::AirlineAdmin),
            5 => Some(Self::SuperAdmin),
            _ => None,
        }
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Passenger => "passenger",
            Self::Driver => "driver",
            Self::GaragePartner => "garage_partner",
            Self::AirlinePartner => "airline_partner",
            Self::AirlineAdmin => "airline_admin",
            Self::SuperAdmin => "super_admin",
        }
    }

    /// Roles a user may pick for themselves at sign-up. Admin roles are
    /// granted out of band.
    pub fn is_self_selectable(self) -> bool {
        matches!(
            self,
            Self::Passenger | Self::Driver | Self::GaragePartner | Self::AirlinePartner
        )
    }

    /// Whether a holder of `self` may act where `required` is demanded.
    pub fn satisfies(self, required: UserRole) -> bool {
        match self {
            Self::SuperAdmin => true,
            Self::AirlineAdmin => matches!(required, Self::AirlineAdmin | Self::AirlinePartner),
            other => other == required,
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "passenger" => Ok(Self::Passenger),
            "driver" => Ok(Self::Driver),
            "garage_partner" => Ok(Self::GaragePartner),
            "airline_partner" => Ok(Self::AirlinePartner),
            "airline_admin" => Ok(Self::AirlineAdmin),
            "super_admin" => Ok(Self::SuperAdmin),
            other => Err(UnknownRole(other.to_owned())),
        }
    }
}
