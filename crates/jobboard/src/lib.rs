//! Job marketplace core.
//!
//! Application status lifecycle, the merged notification feed, and admin moderation toggles,
//! each exposed as a service over a storage trait plus an axum router. Persistence, file
//! storage, and token issuance live outside this crate.

pub mod clock;
pub mod config;
pub mod error;
pub mod marketplace;
pub mod session;
pub mod telemetry;
