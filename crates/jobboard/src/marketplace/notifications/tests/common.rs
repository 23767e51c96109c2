use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

use crate::marketplace::notifications::{
    FeedAggregator, NotificationFeedService, NotificationSource, RawNotification, RawRemark,
};
use crate::marketplace::RepositoryError;

pub(super) fn at(seconds: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(seconds, 0).single().expect("valid timestamp")
}

pub(super) fn notification(id: &str, message: &str, seconds: i64) -> RawNotification {
    RawNotification {
        id: id.to_string(),
        recipient_id: "company-1".to_string(),
        message: message.to_string(),
        created_at: at(seconds),
        is_read: false,
    }
}

pub(super) fn remark(id: Option<&str>, text: &str, seconds: i64) -> RawRemark {
    RawRemark {
        id: id.map(str::to_string),
        company_id: "company-1".to_string(),
        text: text.to_string(),
        date: at(seconds),
    }
}

#[derive(Default, Clone)]
pub(super) struct MemorySource {
    pub(super) standard: Arc<Mutex<HashMap<String, Vec<RawNotification>>>>,
    pub(super) remarks: Arc<Mutex<HashMap<String, Vec<RawRemark>>>>,
}

impl MemorySource {
    pub(super) fn with(standard: Vec<RawNotification>, remarks: Vec<RawRemark>) -> Self {
        let source = Self::default();
        for item in standard {
            source
                .standard
                .lock()
                .expect("lock")
                .entry(item.recipient_id.clone())
                .or_default()
                .push(item);
        }
        for item in remarks {
            source
                .remarks
                .lock()
                .expect("lock")
                .entry(item.company_id.clone())
                .or_default()
                .push(item);
        }
        source
    }
}

impl NotificationSource for MemorySource {
    fn standard(&self, recipient_id: &str) -> Result<Vec<RawNotification>, RepositoryError> {
        let guard = self.standard.lock().expect("lock");
        Ok(guard.get(recipient_id).cloned().unwrap_or_default())
    }

    fn remarks(&self, company_id: &str) -> Result<Vec<RawRemark>, RepositoryError> {
        let guard = self.remarks.lock().expect("lock");
        Ok(guard.get(company_id).cloned().unwrap_or_default())
    }

    fn mark_read(&self, notification_id: &str) -> Result<RawNotification, RepositoryError> {
        let mut guard = self.standard.lock().expect("lock");
        let item = guard
            .values_mut()
            .flat_map(|items| items.iter_mut())
            .find(|item| item.id == notification_id)
            .ok_or(RepositoryError::NotFound)?;
        item.is_read = true;
        Ok(item.clone())
    }
}

/// Source where one side always fails.
pub(super) struct FlakySource {
    pub(super) inner: MemorySource,
    pub(super) fail_standard: bool,
    pub(super) fail_remarks: bool,
}

impl NotificationSource for FlakySource {
    fn standard(&self, recipient_id: &str) -> Result<Vec<RawNotification>, RepositoryError> {
        if self.fail_standard {
            return Err(RepositoryError::Unavailable("timeout".to_string()));
        }
        self.inner.standard(recipient_id)
    }

    fn remarks(&self, company_id: &str) -> Result<Vec<RawRemark>, RepositoryError> {
        if self.fail_remarks {
            return Err(RepositoryError::Unavailable("timeout".to_string()));
        }
        self.inner.remarks(company_id)
    }

    fn mark_read(&self, _notification_id: &str) -> Result<RawNotification, RepositoryError> {
        Err(RepositoryError::Unavailable("timeout".to_string()))
    }
}

pub(super) fn build_service(source: MemorySource) -> NotificationFeedService<MemorySource> {
    NotificationFeedService::new(Arc::new(source), FeedAggregator::new("Remark:"))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
