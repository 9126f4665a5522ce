//! Session tokens shared across AeroRide services.
//!
//! The auth service mints HS256 access/refresh tokens (feature `issuer`);
//! every service validates them, either from the `Authorization: Bearer`
//! header or from the access-token cookie, via [`identity::SessionIdentity`].

pub mod cookie;
pub mod identity;
pub mod token;
