//! Ambient stack shared by AeroRide services: error envelope, tracing,
//! configuration loading, health probes and HTTP middleware.

pub mod config;
pub mod error;
pub mod health;
pub mod middleware;
pub mod serde;
pub mod tracing;
