use chrono::{DateTime, Utc};
use jobboard::marketplace::applications::{
    ApplicationId, ApplicationRecord, ApplicationRepository, JobId, StatusTransition,
};
use jobboard::marketplace::moderation::{
    EntityFlags, EntityKind, ModerationStore, ModerationTarget,
};
use jobboard::marketplace::notifications::{
    parse_timestamp, NotificationSource, RawNotification, RawRemark,
};
use jobboard::marketplace::RepositoryError;
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-local stand-in for the document store behind every marketplace trait.
#[derive(Default)]
pub(crate) struct InMemoryMarketplace {
    applications: Mutex<HashMap<ApplicationId, ApplicationRecord>>,
    entities: Mutex<HashMap<ModerationTarget, EntityFlags>>,
    notifications: Mutex<Vec<RawNotification>>,
    remarks: Mutex<Vec<RawRemark>>,
}

impl InMemoryMarketplace {
    pub(crate) fn register(&self, kind: EntityKind, id: &str) {
        self.entities
            .lock()
            .expect("entity mutex poisoned")
            .entry(ModerationTarget::new(kind, id))
            .or_default();
    }

    pub(crate) fn notify(&self, notification: RawNotification) {
        self.notifications
            .lock()
            .expect("notification mutex poisoned")
            .push(notification);
    }
}

impl ApplicationRepository for InMemoryMarketplace {
    fn insert(&self, record: ApplicationRecord) -> Result<ApplicationRecord, RepositoryError> {
        let mut guard = self.applications.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    fn fetch(&self, id: &ApplicationId) -> Result<Option<ApplicationRecord>, RepositoryError> {
        let guard = self.applications.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn list_for_job(&self, job_id: &JobId) -> Result<Vec<ApplicationRecord>, RepositoryError> {
        let guard = self.applications.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .filter(|record| &record.job_id == job_id)
            .cloned()
            .collect())
    }

    fn update_status(
        &self,
        id: &ApplicationId,
        transition: &StatusTransition,
        updated_at: DateTime<Utc>,
    ) -> Result<ApplicationRecord, RepositoryError> {
        let mut guard = self.applications.lock().expect("repository mutex poisoned");
        let record = guard.get_mut(id).ok_or(RepositoryError::NotFound)?;
        record.apply(transition, updated_at);
        Ok(record.clone())
    }
}

impl ModerationStore for InMemoryMarketplace {
    fn flags(&self, target: &ModerationTarget) -> Result<EntityFlags, RepositoryError> {
        let guard = self.entities.lock().expect("entity mutex poisoned");
        guard.get(target).cloned().ok_or(RepositoryError::NotFound)
    }

    fn update_flag(
        &self,
        target: &ModerationTarget,
        field: &str,
        value: bool,
    ) -> Result<EntityFlags, RepositoryError> {
        let mut guard = self.entities.lock().expect("entity mutex poisoned");
        let entity = guard.get_mut(target).ok_or(RepositoryError::NotFound)?;
        entity.flags.insert(field.to_string(), value);
        Ok(entity.clone())
    }

    fn append_remark(&self, company_id: &str, remark: RawRemark) -> Result<(), RepositoryError> {
        let company = ModerationTarget::new(EntityKind::Company, company_id);
        if !self
            .entities
            .lock()
            .expect("entity mutex poisoned")
            .contains_key(&company)
        {
            return Err(RepositoryError::NotFound);
        }
        self.remarks
            .lock()
            .expect("remark mutex poisoned")
            .push(remark);
        Ok(())
    }
}

impl NotificationSource for InMemoryMarketplace {
    fn standard(&self, recipient_id: &str) -> Result<Vec<RawNotification>, RepositoryError> {
        let guard = self.notifications.lock().expect("notification mutex poisoned");
        Ok(guard
            .iter()
            .filter(|item| item.recipient_id == recipient_id)
            .cloned()
            .collect())
    }

    fn remarks(&self, company_id: &str) -> Result<Vec<RawRemark>, RepositoryError> {
        let guard = self.remarks.lock().expect("remark mutex poisoned");
        Ok(guard
            .iter()
            .filter(|item| item.company_id == company_id)
            .cloned()
            .collect())
    }

    fn mark_read(&self, notification_id: &str) -> Result<RawNotification, RepositoryError> {
        let mut guard = self.notifications.lock().expect("notification mutex poisoned");
        let item = guard
            .iter_mut()
            .find(|item| item.id == notification_id)
            .ok_or(RepositoryError::NotFound)?;
        item.is_read = true;
        Ok(item.clone())
    }
}

pub(crate) fn parse_cleared_at(raw: &str) -> Result<DateTime<Utc>, String> {
    parse_timestamp(raw)
        .ok_or_else(|| format!("failed to parse '{raw}' as RFC 3339 or YYYY-MM-DD"))
}
