use super::domain::{RawNotification, RawRemark};
use crate::marketplace::RepositoryError;

/// The two independently fetched inputs of a feed, plus the read-marker write.
pub trait NotificationSource: Send + Sync {
    fn standard(&self, recipient_id: &str) -> Result<Vec<RawNotification>, RepositoryError>;
    fn remarks(&self, company_id: &str) -> Result<Vec<RawRemark>, RepositoryError>;
    fn mark_read(&self, notification_id: &str) -> Result<RawNotification, RepositoryError>;
}
