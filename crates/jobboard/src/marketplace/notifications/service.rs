use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, warn};

use super::domain::Notification;
use super::feed::FeedAggregator;
use super::source::NotificationSource;
use crate::marketplace::RepositoryError;

/// Which input of the feed a degraded result is missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedSource {
    Standard,
    Remarks,
}

/// Merged feed plus the sources that could not be read for it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedOutcome {
    pub notifications: Vec<Notification>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub degraded_sources: Vec<FeedSource>,
}

impl FeedOutcome {
    pub fn is_partial(&self) -> bool {
        !self.degraded_sources.is_empty()
    }
}

pub struct NotificationFeedService<S> {
    source: Arc<S>,
    aggregator: FeedAggregator,
}

impl<S> NotificationFeedService<S>
where
    S: NotificationSource + 'static,
{
    pub fn new(source: Arc<S>, aggregator: FeedAggregator) -> Self {
        Self { source, aggregator }
    }

    /// Build the feed for one recipient. A failing source contributes nothing instead of
    /// failing the whole feed.
    pub fn feed(&self, recipient_id: &str, cleared_at: Option<DateTime<Utc>>) -> FeedOutcome {
        let mut degraded_sources = Vec::new();

        let standard = self.source.standard(recipient_id).unwrap_or_else(|err| {
            warn!(recipient_id, error = %err, "standard notifications unavailable");
            degraded_sources.push(FeedSource::Standard);
            Vec::new()
        });

        let remarks = self.source.remarks(recipient_id).unwrap_or_else(|err| {
            warn!(recipient_id, error = %err, "company remarks unavailable");
            degraded_sources.push(FeedSource::Remarks);
            Vec::new()
        });

        let notifications = self.aggregator.merge(standard, remarks, cleared_at);
        debug!(
            recipient_id,
            items = notifications.len(),
            partial = !degraded_sources.is_empty(),
            "feed assembled"
        );

        FeedOutcome {
            notifications,
            degraded_sources,
        }
    }

    pub fn mark_read(&self, notification_id: &str) -> Result<Notification, RepositoryError> {
        let raw = self.source.mark_read(notification_id)?;
        Ok(Notification::from(raw))
    }
}
