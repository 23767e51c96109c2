use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing::{debug, info};

use super::domain::{
    ApplicationId, ApplicationRecord, ApplicationStatus, ApplicationSubmission, JobId,
};
use super::repository::ApplicationRepository;
use super::status::{transition_status, TransitionError};
use crate::clock::{Clock, SystemClock};
use crate::marketplace::RepositoryError;

/// Service composing the status registry with application storage.
pub struct ApplicationService<R> {
    repository: Arc<R>,
    clock: Arc<dyn Clock>,
}

static APPLICATION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_application_id() -> ApplicationId {
    let id = APPLICATION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ApplicationId(format!("app-{id:06}"))
}

impl<R> ApplicationService<R>
where
    R: ApplicationRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self::with_clock(repository, Arc::new(SystemClock))
    }

    pub fn with_clock(repository: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    /// Record a new application against a job. Every application starts as `applied`.
    pub fn submit(
        &self,
        submission: ApplicationSubmission,
    ) -> Result<ApplicationRecord, ApplicationServiceError> {
        if submission.job_id.0.trim().is_empty() {
            return Err(ApplicationServiceError::IncompleteSubmission("job_id"));
        }
        if submission.applicant_id.0.trim().is_empty() {
            return Err(ApplicationServiceError::IncompleteSubmission("applicant_id"));
        }

        let now = self.clock.now();
        let record = ApplicationRecord {
            id: next_application_id(),
            job_id: submission.job_id,
            applicant_id: submission.applicant_id,
            status: ApplicationStatus::Applied,
            rejection_reason: None,
            created_at: now,
            updated_at: now,
        };

        let stored = self.repository.insert(record)?;
        info!(application_id = %stored.id, job_id = %stored.job_id.0, "application submitted");
        Ok(stored)
    }

    pub fn get(
        &self,
        application_id: &ApplicationId,
    ) -> Result<ApplicationRecord, ApplicationServiceError> {
        let record = self
            .repository
            .fetch(application_id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }

    /// Applications for one job, oldest first.
    pub fn list_for_job(
        &self,
        job_id: &JobId,
    ) -> Result<Vec<ApplicationRecord>, ApplicationServiceError> {
        let mut records = self.repository.list_for_job(job_id)?;
        records.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(records)
    }

    /// Validate and persist a status change.
    ///
    /// Validation runs before the store is touched, so a rejected request never writes.
    pub fn update_status(
        &self,
        application_id: &ApplicationId,
        requested: &str,
        reason: Option<&str>,
    ) -> Result<ApplicationRecord, ApplicationServiceError> {
        let current = self.get(application_id)?;
        let transition = transition_status(current.status, requested, reason)?;

        let updated = self
            .repository
            .update_status(application_id, &transition, self.clock.now())?;

        debug!(
            application_id = %application_id,
            from = %current.status,
            to = %updated.status,
            "application status updated"
        );
        Ok(updated)
    }
}

/// Error raised by the application service.
#[derive(Debug, thiserror::Error)]
pub enum ApplicationServiceError {
    #[error("submission is missing {0}")]
    IncompleteSubmission(&'static str),
    #[error(transparent)]
    Transition(#[from] TransitionError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
