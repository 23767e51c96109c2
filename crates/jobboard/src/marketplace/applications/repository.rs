use chrono::{DateTime, Utc};
use serde::Serialize;

use super::domain::{ApplicantId, ApplicationId, ApplicationRecord, JobId};
use super::status::StatusTransition;
use crate::marketplace::RepositoryError;

/// Storage abstraction so the service module can be exercised in isolation.
pub trait ApplicationRepository: Send + Sync {
    fn insert(&self, record: ApplicationRecord) -> Result<ApplicationRecord, RepositoryError>;
    fn fetch(&self, id: &ApplicationId) -> Result<Option<ApplicationRecord>, RepositoryError>;
    fn list_for_job(&self, job_id: &JobId) -> Result<Vec<ApplicationRecord>, RepositoryError>;
    /// Single-document write of status and reason. Absent ids report `NotFound`.
    fn update_status(
        &self,
        id: &ApplicationId,
        transition: &StatusTransition,
        updated_at: DateTime<Utc>,
    ) -> Result<ApplicationRecord, RepositoryError>;
}

/// Public JSON shape of an application.
#[derive(Debug, Clone, Serialize)]
pub struct ApplicationView {
    pub application_id: ApplicationId,
    pub job_id: JobId,
    pub applicant_id: ApplicantId,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ApplicationRecord {
    pub fn view(&self) -> ApplicationView {
        ApplicationView {
            application_id: self.id.clone(),
            job_id: self.job_id.clone(),
            applicant_id: self.applicant_id.clone(),
            status: self.status.label(),
            rejection_reason: self.rejection_reason.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    /// Apply a validated transition in place; stores use this to keep the reason invariant.
    pub fn apply(&mut self, transition: &StatusTransition, updated_at: DateTime<Utc>) {
        self.status = transition.status;
        self.rejection_reason = transition.rejection_reason.clone();
        self.updated_at = updated_at;
    }
}
