//! Merged notification feed: system notifications plus admin remarks on a company.

pub mod domain;
mod feed;
mod import;
pub mod router;
pub mod service;
pub mod source;

#[cfg(test)]
mod tests;

pub use domain::{Notification, NotificationKind, RawNotification, RawRemark};
pub use feed::{merge_feeds, FeedAggregator, DEFAULT_REMARK_PREFIX};
pub use import::{parse_notifications, parse_remarks, parse_timestamp, FeedImportError};
pub use router::notification_router;
pub use service::{FeedOutcome, FeedSource, NotificationFeedService};
pub use source::NotificationSource;
