use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{TimeZone, Utc};

use crate::clock::FixedClock;
use crate::marketplace::moderation::{
    EntityFlags, EntityKind, ModerationService, ModerationStore, ModerationTarget,
};
use crate::marketplace::notifications::RawRemark;
use crate::marketplace::RepositoryError;

#[derive(Default, Clone)]
pub(super) struct MemoryStore {
    pub(super) entities: Arc<Mutex<HashMap<ModerationTarget, EntityFlags>>>,
    pub(super) remarks: Arc<Mutex<HashMap<String, Vec<RawRemark>>>>,
}

impl MemoryStore {
    pub(super) fn seeded() -> Self {
        let store = Self::default();
        for (kind, id) in [
            (EntityKind::Company, "company-1"),
            (EntityKind::Job, "job-1"),
            (EntityKind::User, "user-1"),
        ] {
            store
                .entities
                .lock()
                .expect("lock")
                .insert(ModerationTarget::new(kind, id), EntityFlags::default());
        }
        store
    }

    pub(super) fn snapshot(&self, target: &ModerationTarget) -> EntityFlags {
        self.entities
            .lock()
            .expect("lock")
            .get(target)
            .cloned()
            .expect("entity present")
    }
}

impl ModerationStore for MemoryStore {
    fn flags(&self, target: &ModerationTarget) -> Result<EntityFlags, RepositoryError> {
        self.entities
            .lock()
            .expect("lock")
            .get(target)
            .cloned()
            .ok_or(RepositoryError::NotFound)
    }

    fn update_flag(
        &self,
        target: &ModerationTarget,
        field: &str,
        value: bool,
    ) -> Result<EntityFlags, RepositoryError> {
        let mut guard = self.entities.lock().expect("lock");
        let entity = guard.get_mut(target).ok_or(RepositoryError::NotFound)?;
        entity.flags.insert(field.to_string(), value);
        Ok(entity.clone())
    }

    fn append_remark(&self, company_id: &str, remark: RawRemark) -> Result<(), RepositoryError> {
        let company = ModerationTarget::new(EntityKind::Company, company_id);
        if !self.entities.lock().expect("lock").contains_key(&company) {
            return Err(RepositoryError::NotFound);
        }
        self.remarks
            .lock()
            .expect("lock")
            .entry(company_id.to_string())
            .or_default()
            .push(remark);
        Ok(())
    }
}

pub(super) struct OfflineStore;

impl ModerationStore for OfflineStore {
    fn flags(&self, _target: &ModerationTarget) -> Result<EntityFlags, RepositoryError> {
        Err(RepositoryError::Unavailable("connection reset".to_string()))
    }

    fn update_flag(
        &self,
        _target: &ModerationTarget,
        _field: &str,
        _value: bool,
    ) -> Result<EntityFlags, RepositoryError> {
        Err(RepositoryError::Unavailable("connection reset".to_string()))
    }

    fn append_remark(&self, _company_id: &str, _remark: RawRemark) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("connection reset".to_string()))
    }
}

pub(super) fn build_service(store: MemoryStore) -> ModerationService<MemoryStore> {
    let clock = FixedClock(Utc.timestamp_opt(5_000, 0).single().expect("valid"));
    ModerationService::with_clock(Arc::new(store), Arc::new(clock))
}
