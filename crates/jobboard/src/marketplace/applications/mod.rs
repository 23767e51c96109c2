//! Job applications and their status lifecycle.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;
mod status;

#[cfg(test)]
mod tests;

pub use domain::{
    ApplicantId, ApplicationId, ApplicationRecord, ApplicationStatus, ApplicationSubmission,
    JobId,
};
pub use repository::{ApplicationRepository, ApplicationView};
pub use router::application_router;
pub use service::{ApplicationService, ApplicationServiceError};
pub use status::{transition_status, StatusTransition, TransitionError};
