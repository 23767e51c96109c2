use std::io::Read;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer};

use super::domain::{RawNotification, RawRemark};

#[derive(Debug, thiserror::Error)]
pub enum FeedImportError {
    #[error("failed to read feed export: {0}")]
    Csv(#[from] csv::Error),
    #[error("row {row}: '{value}' is not an RFC 3339 timestamp or YYYY-MM-DD date")]
    InvalidTimestamp { row: usize, value: String },
}

/// Parse a notifications export with columns `id,recipient_id,message,created_at[,is_read]`.
pub fn parse_notifications<R: Read>(reader: R) -> Result<Vec<RawNotification>, FeedImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut notifications = Vec::new();

    for (index, record) in csv_reader.deserialize::<NotificationRow>().enumerate() {
        let row = record?;
        let created_at = timestamp_for_row(index, &row.created_at)?;
        notifications.push(RawNotification {
            id: row.id,
            recipient_id: row.recipient_id,
            message: row.message,
            created_at,
            is_read: row.is_read.unwrap_or(false),
        });
    }

    Ok(notifications)
}

/// Parse a remarks export with columns `id,company_id,text,date`; `id` may be blank.
pub fn parse_remarks<R: Read>(reader: R) -> Result<Vec<RawRemark>, FeedImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut remarks = Vec::new();

    for (index, record) in csv_reader.deserialize::<RemarkRow>().enumerate() {
        let row = record?;
        let date = timestamp_for_row(index, &row.date)?;
        remarks.push(RawRemark {
            id: row.id,
            company_id: row.company_id,
            text: row.text,
            date,
        });
    }

    Ok(remarks)
}

/// Accepts RFC 3339 timestamps or bare dates (midnight UTC).
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn timestamp_for_row(index: usize, value: &str) -> Result<DateTime<Utc>, FeedImportError> {
    parse_timestamp(value).ok_or_else(|| FeedImportError::InvalidTimestamp {
        // header is line 1
        row: index + 2,
        value: value.to_string(),
    })
}

#[derive(Debug, Deserialize)]
struct NotificationRow {
    id: String,
    recipient_id: String,
    message: String,
    created_at: String,
    #[serde(default)]
    is_read: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct RemarkRow {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    id: Option<String>,
    company_id: String,
    text: String,
    date: String,
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
