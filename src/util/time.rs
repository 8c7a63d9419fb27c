use crate::error::Error;
use crate::error::*;
use chrono::DateTime;
use snafu::ResultExt;

/// Wall-clock seconds between two RFC 3339 timestamps, floored.
/// `end` before `start` yields a negative value, deliberately unclamped.
pub fn elapsed_seconds(start: &str, end: &str) -> Result<i64, Error> {
    let started_at = DateTime::parse_from_rfc3339(start).context(TimestampParseSnafu {
        field: "started_at",
        value: start,
    })?;
    let completed_at = DateTime::parse_from_rfc3339(end).context(TimestampParseSnafu {
        field: "completed_at",
        value: end,
    })?;

    let difference = completed_at - started_at;
    Ok(difference.num_milliseconds().div_euclid(1000))
}

pub fn format_duration(total_seconds: i64) -> String {
    // runtimes can be negative when completion precedes start
    if total_seconds < 0 {
        return format!("-{}", format_duration(-total_seconds));
    }

    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    let mut output = String::new();

    if hours > 0 {
        output += &format!("{} hour{}", hours, if hours == 1 { "" } else { "s" });
    }

    if minutes > 0 {
        if !output.is_empty() {
            output += ", ";
        }

        output += &format!("{} minute{}", minutes, if minutes == 1 { "" } else { "s" });
    }

    if seconds > 0 {
        if !output.is_empty() {
            output += " and ";
        }

        output += &format!("{} second{}", seconds, if seconds == 1 { "" } else { "s" });
    }

    if output.is_empty() {
        output = "0 seconds".to_string();
    }

    output
}
