//! Domain types shared across all AeroRide services.
//!
//! This crate contains only pure types with no framework dependencies.
//! Import in `usecase/` and `domain/` layers; never in `infra/` or `handlers/`.

pub mod geo;
pub mod id;
pub mod pagination;
pub mod ride;
pub mod user;
pub mod vehicle;
