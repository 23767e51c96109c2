use crate::infra::parse_cleared_at;
use chrono::{DateTime, Utc};
use clap::Args;
use jobboard::config::FeedConfig;
use jobboard::error::AppError;
use jobboard::marketplace::notifications::{
    parse_notifications, parse_remarks, FeedAggregator, FeedImportError, Notification,
    NotificationKind,
};
use std::fs::File;
use std::path::{Path, PathBuf};

#[derive(Args, Debug, Default)]
pub(crate) struct FeedArgs {
    /// CSV export of notifications (id,recipient_id,message,created_at[,is_read])
    #[arg(long)]
    pub(crate) notifications: Option<PathBuf>,
    /// CSV export of company remarks (id,company_id,text,date)
    #[arg(long)]
    pub(crate) remarks: Option<PathBuf>,
    /// Hide everything at or before this instant (RFC 3339 or YYYY-MM-DD)
    #[arg(long, value_parser = parse_cleared_at)]
    pub(crate) cleared_at: Option<DateTime<Utc>>,
    /// Prefix placed in front of remark text
    #[arg(long)]
    pub(crate) remark_prefix: Option<String>,
    /// Print the merged feed as JSON instead of a table
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) fn run_feed(args: FeedArgs) -> Result<(), AppError> {
    let FeedArgs {
        notifications,
        remarks,
        cleared_at,
        remark_prefix,
        json,
    } = args;

    let standard = load_or_warn(notifications.as_deref(), "notifications", parse_notifications);
    let remarks = load_or_warn(remarks.as_deref(), "remarks", parse_remarks);

    let prefix = remark_prefix.unwrap_or_else(|| FeedConfig::default().remark_prefix);
    let feed = FeedAggregator::new(prefix).merge(standard, remarks, cleared_at);

    if json {
        let rendered = serde_json::to_string_pretty(&feed)
            .map_err(|err| AppError::Io(std::io::Error::other(err)))?;
        println!("{rendered}");
    } else {
        print!("{}", render_feed(&feed));
    }

    Ok(())
}

/// A missing or unreadable export contributes nothing instead of aborting the merge.
fn load_or_warn<T>(
    path: Option<&Path>,
    label: &str,
    parse: fn(File) -> Result<Vec<T>, FeedImportError>,
) -> Vec<T> {
    let Some(path) = path else {
        return Vec::new();
    };

    let loaded = File::open(path)
        .map_err(|err| err.to_string())
        .and_then(|file| parse(file).map_err(|err| err.to_string()));

    match loaded {
        Ok(items) => items,
        Err(err) => {
            eprintln!("warning: skipping {label} from {}: {err}", path.display());
            Vec::new()
        }
    }
}

pub(crate) fn render_feed(feed: &[Notification]) -> String {
    if feed.is_empty() {
        return "No notifications.\n".to_string();
    }

    let mut out = String::new();
    for item in feed {
        let marker = match (item.kind, item.is_read) {
            (NotificationKind::Remark, _) => "R",
            (NotificationKind::Standard, true) => " ",
            (NotificationKind::Standard, false) => "*",
        };
        out.push_str(&format!(
            "{marker} {}  {}\n",
            item.created_at.format("%Y-%m-%d %H:%M"),
            item.message
        ));
    }
    out
}
