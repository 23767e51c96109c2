use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Notification as the store hands it over.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawNotification {
    pub id: String,
    pub recipient_id: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub is_read: bool,
}

/// Free-text admin note attached to a company.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRemark {
    #[serde(default)]
    pub id: Option<String>,
    pub company_id: String,
    pub text: String,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Standard,
    Remark,
}

/// One entry of the merged feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
    pub is_read: bool,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
}

impl From<RawNotification> for Notification {
    fn from(raw: RawNotification) -> Self {
        Self {
            id: raw.id,
            message: raw.message,
            created_at: raw.created_at,
            is_read: raw.is_read,
            kind: NotificationKind::Standard,
        }
    }
}
