//! Conversion of raw BLE notification logs into replay entries.
//!
//! Recognised lines look like:
//!
//! ```text
//! I 09:41:07.512 Notification received from 00002a5b-0000-1000-8000-00805f9b34fb, value: (0x) 02-0A-00-00-02
//! ```

use super::entries::{save_entries, ReplayEntry};
use super::ReplayError;
use chrono::{Duration, NaiveTime};
use std::path::Path;

const NOTIFICATION_MARKER: &str = "Notification received from ";
const VALUE_MARKER: &str = ", value: (0x)";

/// A notification found in a log line.
#[derive(Debug, Clone, PartialEq)]
struct LogNotification {
    time: NaiveTime,
    value: String,
}

fn parse_line(line: &str) -> Option<LogNotification> {
    let marker = line.find(NOTIFICATION_MARKER)?;

    // "... I <time> Notification received from ..."
    let mut head = line[..marker].split_whitespace().rev();
    let time = head.next()?;
    if head.next()? != "I" {
        return None;
    }
    let time = NaiveTime::parse_from_str(time, "%H:%M:%S%.f").ok()?;

    let rest = &line[marker + NOTIFICATION_MARKER.len()..];
    let value_at = rest.find(VALUE_MARKER)?;
    let source = &rest[..value_at];
    if source.is_empty() || source.contains(char::is_whitespace) {
        return None;
    }

    let value = rest[value_at + VALUE_MARKER.len()..].split_whitespace().next()?;
    if !value
        .chars()
        .all(|c| c == '-' || c.is_ascii_digit() || ('A'..='F').contains(&c))
    {
        return None;
    }

    Some(LogNotification {
        time,
        value: value.to_string(),
    })
}

/// Extract replay entries from log text.
///
/// Timestamps are seconds relative to the first notification, rounded to
/// milliseconds. Lines that are not notifications are skipped.
pub fn parse_log(content: &str) -> Vec<ReplayEntry> {
    let mut first: Option<NaiveTime> = None;

    content
        .lines()
        .filter_map(parse_line)
        .map(|notification| {
            let start = *first.get_or_insert(notification.time);
            let mut offset = notification.time - start;
            if offset < Duration::zero() {
                // Log crossed midnight
                offset += Duration::days(1);
            }
            let micros = offset.num_microseconds().unwrap_or(0);

            ReplayEntry {
                timestamp: (micros as f64 / 1000.0).round() / 1000.0,
                value: notification.value,
            }
        })
        .collect()
}

/// Convert a log file into a replay JSON file, returning the entry count.
pub fn convert_log_file(input: &Path, output: &Path) -> Result<usize, ReplayError> {
    let content =
        std::fs::read_to_string(input).map_err(|e| ReplayError::IoError(e.to_string()))?;

    let entries = parse_log(&content);
    save_entries(output, &entries)?;

    tracing::info!(
        input = %input.display(),
        output = %output.display(),
        count = entries.len(),
        "Converted notification log"
    );

    Ok(entries.len())
}
