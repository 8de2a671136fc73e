use chrono::{DateTime, Local, Utc};
use servtrack_core::util::normalize_text_option;
use servtrack_core::{ClientEntity, TimeTrackingEntity};

use crate::error::CliError;

pub fn normalize_id(raw: &str) -> Result<String, CliError> {
    normalize_text_option(Some(raw.to_string())).ok_or(CliError::EmptyId)
}

pub fn normalize_note(parts: &[String]) -> Result<String, CliError> {
    normalize_text_option(Some(parts.join(" "))).ok_or(CliError::EmptyNote)
}

/// Both coordinates or neither; clap enforces the pairing.
pub const fn location(lat: Option<f64>, long: Option<f64>) -> Option<(f64, f64)> {
    match (lat, long) {
        (Some(lat), Some(long)) => Some((lat, long)),
        _ => None,
    }
}

pub fn short_id(record: &TimeTrackingEntity) -> String {
    record.id.to_string().chars().take(13).collect()
}

pub fn format_record_lines(records: &[TimeTrackingEntity], now: DateTime<Utc>) -> Vec<String> {
    records
        .iter()
        .map(|record| {
            let short_id = short_id(record);
            let status = record.status.as_str();
            let started = format_relative_time(record.start_time, now);
            let duration = format_duration(record.start_time, record.end_time.unwrap_or(now));
            format!(
                "{short_id:<13}  {status:<9}  {:<16}  {:<16}  {started:<10}  {duration}",
                record.employee_id, record.client_id
            )
        })
        .collect()
}

pub fn record_detail_lines(
    record: &TimeTrackingEntity,
    client: Option<&ClientEntity>,
    now: DateTime<Utc>,
) -> Vec<String> {
    let mut lines = vec![
        format!("ID:        {}", record.id),
        format!("Status:    {}", record.status),
        format!("Employee:  {}", record.employee_id),
    ];
    match client {
        Some(client) => lines.push(format!(
            "Client:    {} <{}> ({})",
            client.name, client.email, client.id
        )),
        None => lines.push(format!("Client:    {}", record.client_id)),
    }
    lines.push(format!("Started:   {}", format_clock(record.start_time)));
    if let Some(end_time) = record.end_time {
        lines.push(format!("Stopped:   {}", format_clock(end_time)));
    }
    lines.push(format!(
        "Duration:  {}",
        format_duration(record.start_time, record.end_time.unwrap_or(now))
    ));
    if let Some((lat, long)) = location(record.lat_start_time, record.long_start_time) {
        lines.push(format!("Start at:  {lat:.5}, {long:.5}"));
    }
    if let Some((lat, long)) = location(record.lat_end_time, record.long_end_time) {
        lines.push(format!("End at:    {lat:.5}, {long:.5}"));
    }
    if let Some(notes) = &record.notes {
        lines.push(format!("Notes:     {notes}"));
    }
    lines
}

pub fn format_clock(timestamp: DateTime<Utc>) -> String {
    timestamp
        .with_timezone(&Local)
        .format("%Y-%m-%d %H:%M")
        .to_string()
}

pub fn format_duration(start: DateTime<Utc>, end: DateTime<Utc>) -> String {
    let minutes = (end - start).num_minutes().max(0);
    if minutes < 60 {
        format!("{minutes}m")
    } else {
        format!("{}h {:02}m", minutes / 60, minutes % 60)
    }
}

pub fn format_relative_time(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let diff = (now - timestamp).num_milliseconds().max(0);
    let minute = 60_000;
    let hour = 60 * minute;
    let day = 24 * hour;
    let week = 7 * day;

    if diff < minute {
        "just now".to_string()
    } else if diff < hour {
        format!("{}m ago", diff / minute)
    } else if diff < day {
        format!("{}h ago", diff / hour)
    } else if diff < week {
        format!("{}d ago", diff / day)
    } else {
        format!("{}w ago", diff / week)
    }
}
