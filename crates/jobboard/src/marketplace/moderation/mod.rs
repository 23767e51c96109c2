//! Admin moderation: verify/block toggles and company remarks.

pub mod domain;
pub mod router;
pub mod service;
pub mod store;

#[cfg(test)]
mod tests;

pub use domain::{
    EntityFlags, EntityKind, ModerationFlag, ModerationTarget, ToggleOutcome, UnknownName,
};
pub use router::moderation_router;
pub use service::{ModerationError, ModerationService};
pub use store::ModerationStore;
