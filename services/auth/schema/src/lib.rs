//! sea-orm entities for the auth service database.

pub mod airline_profiles;
pub mod driver_profiles;
pub mod garage_profiles;
pub mod otps;
pub mod profiles;
pub mod users;
