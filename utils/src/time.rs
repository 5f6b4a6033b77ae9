//! Date formatting helpers.

use chrono::{DateTime, Utc};

/// Format a poll's creation time the way poll cards show it: `Oct 5, 2024`.
pub fn format_created_date(created_at: &DateTime<Utc>) -> String {
    created_at.format("%b %-d, %Y").to_string()
}
