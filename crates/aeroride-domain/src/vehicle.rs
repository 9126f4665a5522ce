//! Vehicle classes and the static fare table.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Bookable vehicle category. Determines base fare and per-km rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VehicleClass {
    #[default]
    #[serde(alias = "sedan")]
    Compact,
    Suv,
    Luxury,
    Van,
    Bus,
}

/// Price components for one vehicle class, in the deployment currency.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FareRate {
    pub base: f64,
    pub per_km: f64,
}

impl FareRate {
    pub fn fare_for(&self, distance_km: f64) -> f64 {
        self.base + distance_km * self.per_km
    }
}

impl VehicleClass {
    pub const ALL: [VehicleClass; 5] = [
        Self::Compact,
        Self::Suv,
        Self::Luxury,
        Self::Van,
        Self::Bus,
    ];

    /// Parse a client-supplied class name. Unknown names fall back to
    /// [`VehicleClass::Compact`] instead of failing.
    pub fn from_name_lenient(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "suv" => Self::Suv,
            "luxury" => Self::Luxury,
            "van" => Self::Van,
            "bus" => Self::Bus,
            _ => Self::Compact,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Compact => "compact",
            Self::Suv => "suv",
            Self::Luxury => "luxury",
            Self::Van => "van",
            Self::Bus => "bus",
        }
    }

    pub fn rate(self) -> FareRate {
        match self {
            Self::Compact => FareRate {
                base: 500.0,
                per_km: 150.0,
            },
            Self::Suv => FareRate {
                base: 800.0,
                per_km: 200.0,
            },
            Self::Luxury => FareRate {
                base: 1500.0,
                per_km: 400.0,
            },
            Self::Van => FareRate {
                base: 1000.0,
                per_km: 250.0,
            },
            Self::Bus => FareRate {
                base: 2000.0,
                per_km: 300.0,
            },
        }
    }
}

impl fmt::Display for VehicleClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
