//! Date and time utility functions
//!
//! Expiration dates are plain calendar dates (`YYYY-MM-DD`); record timestamps
//! are milliseconds since the Unix epoch.

use chrono::{Datelike, Duration, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Standard date format used for expiration dates, locally and remotely
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a date string in YYYY-MM-DD format to NaiveDate
pub fn parse_date(date_str: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(date_str, DATE_FORMAT)
}

/// Format a NaiveDate to YYYY-MM-DD string
pub fn format_ymd(d: NaiveDate) -> String {
    d.format(DATE_FORMAT).to_string()
}

/// Current local calendar date
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Format date with offset from the given day to YYYY-MM-DD string
pub fn format_date_with_offset(from: NaiveDate, days_offset: i64) -> String {
    format_ymd(from + Duration::days(days_offset))
}

/// Current time in milliseconds since the Unix epoch
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Number of days from `today` until `date` (negative once expired)
pub fn days_until(date: NaiveDate, today: NaiveDate) -> i64 {
    (date - today).num_days()
}

/// Where a product stands relative to its expiration date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExpiryStatus {
    /// The expiration date has passed.
    Expired,
    /// Expires at the end of today.
    ExpiresToday,
    /// Expires within the configured window; carries days remaining.
    ExpiringSoon(i64),
    Fresh,
}

impl ExpiryStatus {
    /// Classify `date` against `today` with a look-ahead window of `soon_days`.
    pub fn classify(date: NaiveDate, today: NaiveDate, soon_days: i64) -> Self {
        match days_until(date, today) {
            d if d < 0 => ExpiryStatus::Expired,
            0 => ExpiryStatus::ExpiresToday,
            d if d <= soon_days => ExpiryStatus::ExpiringSoon(d),
            _ => ExpiryStatus::Fresh,
        }
    }

    /// Classify a stored `YYYY-MM-DD` string. Unparseable dates count as expired.
    pub fn classify_str(date_str: &str, today: NaiveDate, soon_days: i64) -> Self {
        match parse_date(date_str) {
            Ok(date) => Self::classify(date, today, soon_days),
            Err(_) => ExpiryStatus::Expired,
        }
    }

    pub fn needs_attention(&self) -> bool {
        !matches!(self, ExpiryStatus::Fresh)
    }
}

/// Human-readable expiry label relative to `today`
///
/// # Arguments
/// * `date_str` - Date string in YYYY-MM-DD format
/// * `today` - Reference day
///
/// # Returns
/// * `String` - e.g. "expired yesterday", "expires today", "expires in 4 days"
pub fn format_expiry(date_str: &str, today: NaiveDate) -> String {
    let date = match parse_date(date_str) {
        Ok(date) => date,
        Err(_) => return date_str.to_string(),
    };

    match days_until(date, today) {
        -1 => "expired yesterday".to_string(),
        0 => "expires today".to_string(),
        1 => "expires tomorrow".to_string(),
        diff if diff < -1 && diff >= -30 => format!("expired {} days ago", -diff),
        diff if diff > 1 && diff <= 30 => format!("expires in {} days", diff),
        _ => {
            // Dates further out show the date itself, with the year only when it differs
            if date.year() == today.year() {
                date.format("%b %d").to_string()
            } else {
                date.format("%b %d, %Y").to_string()
            }
        }
    }
}
