use std::io::Write;

use chrono::Utc;
use servtrack_core::{TimeTrackingContext, TimeTrackingService};

use crate::commands::common::format_record_lines;
use crate::error::CliError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListFilter {
    All,
    Client(String),
    Employee(String),
}

impl ListFilter {
    pub fn from_args(client: Option<String>, employee: Option<String>) -> Self {
        match (client, employee) {
            (Some(client), _) => Self::Client(client.trim().to_string()),
            (None, Some(employee)) => Self::Employee(employee.trim().to_string()),
            (None, None) => Self::All,
        }
    }
}

pub async fn run_list<S: TimeTrackingService>(
    context: &TimeTrackingContext<S>,
    filter: &ListFilter,
    active_only: bool,
    as_json: bool,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let fetched = match filter {
        ListFilter::All => context.fetch_time_tracking().await?,
        ListFilter::Client(client_id) => context.fetch_time_tracking_by_client(client_id).await?,
        ListFilter::Employee(employee_id) => {
            context.fetch_time_tracking_by_employee(employee_id).await?
        }
    };
    let records = if active_only {
        context.active_records()
    } else {
        fetched
    };

    if as_json {
        writeln!(out, "{}", serde_json::to_string_pretty(&records)?)?;
    } else if records.is_empty() {
        writeln!(out, "No time tracking records")?;
    } else {
        for line in format_record_lines(&records, Utc::now()) {
            writeln!(out, "{line}")?;
        }
    }

    Ok(())
}
