use std::collections::HashMap;

use chrono::{DateTime, Utc};

use super::domain::{Notification, NotificationKind, RawNotification, RawRemark};

pub const DEFAULT_REMARK_PREFIX: &str = "📝 Admin remark:";

/// Merges standard notifications and remarks into one newest-first feed.
#[derive(Debug, Clone)]
pub struct FeedAggregator {
    remark_prefix: String,
}

impl Default for FeedAggregator {
    fn default() -> Self {
        Self::new(DEFAULT_REMARK_PREFIX)
    }
}

impl FeedAggregator {
    pub fn new(remark_prefix: impl Into<String>) -> Self {
        Self {
            remark_prefix: remark_prefix.into(),
        }
    }

    pub fn remark_prefix(&self) -> &str {
        &self.remark_prefix
    }

    /// Project, filter, dedupe by message text, then sort by `created_at` descending.
    ///
    /// `cleared_at` is the client's watermark: anything at or before it is hidden, not deleted.
    /// When two entries share a message the later one in assembly order (remarks, then standard)
    /// wins and keeps the earlier one's slot.
    pub fn merge(
        &self,
        standard: Vec<RawNotification>,
        remarks: Vec<RawRemark>,
        cleared_at: Option<DateTime<Utc>>,
    ) -> Vec<Notification> {
        let visible =
            |created_at: &DateTime<Utc>| cleared_at.map_or(true, |mark| *created_at > mark);

        let assembled = remarks
            .into_iter()
            .enumerate()
            .map(|(position, remark)| self.project_remark(position, remark))
            .chain(standard.into_iter().map(Notification::from))
            .filter(|item| visible(&item.created_at));

        let mut slots: HashMap<String, usize> = HashMap::new();
        let mut merged: Vec<Notification> = Vec::new();
        for item in assembled {
            match slots.get(&item.message) {
                Some(&slot) => merged[slot] = item,
                None => {
                    slots.insert(item.message.clone(), merged.len());
                    merged.push(item);
                }
            }
        }

        merged.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        merged
    }

    fn project_remark(&self, position: usize, remark: RawRemark) -> Notification {
        // Id-less remarks get a token derived from their content so repeated merges agree.
        let token = remark
            .id
            .unwrap_or_else(|| format!("{}-{position}", remark.date.timestamp_millis()));

        Notification {
            id: format!("remark-{token}"),
            message: format!("{} {}", self.remark_prefix, remark.text),
            created_at: remark.date,
            is_read: false,
            kind: NotificationKind::Remark,
        }
    }
}

/// [`FeedAggregator::merge`] with the default remark prefix.
pub fn merge_feeds(
    standard: Vec<RawNotification>,
    remarks: Vec<RawRemark>,
    cleared_at: Option<DateTime<Utc>>,
) -> Vec<Notification> {
    FeedAggregator::default().merge(standard, remarks, cleared_at)
}
