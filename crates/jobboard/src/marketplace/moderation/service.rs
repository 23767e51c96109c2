use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing::info;

use super::domain::{EntityKind, ModerationFlag, ModerationTarget, ToggleOutcome};
use super::store::ModerationStore;
use crate::clock::{Clock, SystemClock};
use crate::marketplace::notifications::RawRemark;
use crate::marketplace::RepositoryError;

pub struct ModerationService<S> {
    store: Arc<S>,
    clock: Arc<dyn Clock>,
}

static REMARK_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_remark_id() -> String {
    let id = REMARK_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    format!("rmk-{id:06}")
}

impl<S> ModerationService<S>
where
    S: ModerationStore + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self::with_clock(store, Arc::new(SystemClock))
    }

    pub fn with_clock(store: Arc<S>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Flip one flag and report the value that was written.
    ///
    /// Read-then-write with no version check: concurrent toggles on the same flag race and the
    /// last write wins.
    pub fn toggle(
        &self,
        target: &ModerationTarget,
        flag: ModerationFlag,
    ) -> Result<ToggleOutcome, ModerationError> {
        let field = target
            .kind
            .field_name(flag)
            .ok_or(ModerationError::UnsupportedFlag {
                kind: target.kind,
                flag,
            })?;

        let current = self.store.flags(target)?.get(field);
        let stored = self.store.update_flag(target, field, !current)?;
        let new_value = stored.get(field);

        info!(
            kind = %target.kind,
            id = %target.id,
            field,
            new_value,
            "moderation flag toggled"
        );

        Ok(ToggleOutcome {
            kind: target.kind,
            id: target.id.clone(),
            flag,
            new_value,
        })
    }

    /// Append an admin remark to a company's history; it then appears in that company's feed.
    pub fn add_remark(&self, company_id: &str, text: &str) -> Result<RawRemark, ModerationError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ModerationError::EmptyRemark);
        }

        let remark = RawRemark {
            id: Some(next_remark_id()),
            company_id: company_id.to_string(),
            text: text.to_string(),
            date: self.clock.now(),
        };
        self.store.append_remark(company_id, remark.clone())?;

        info!(company_id, remark_id = remark.id.as_deref(), "company remark recorded");
        Ok(remark)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ModerationError {
    #[error("{kind} has no {flag} flag")]
    UnsupportedFlag {
        kind: EntityKind,
        flag: ModerationFlag,
    },
    #[error("remark text must not be empty")]
    EmptyRemark,
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
