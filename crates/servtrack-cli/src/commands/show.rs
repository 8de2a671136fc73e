use std::io::Write;

use chrono::Utc;
use serde::Serialize;
use servtrack_core::view::{ClientLookup, ServiceEmployeeView};
use servtrack_core::{ClientEntity, TimeTrackingContext, TimeTrackingEntity, TimeTrackingService};

use crate::commands::common::{normalize_id, record_detail_lines};
use crate::error::CliError;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ShowOutput<'a> {
    time_tracking: &'a TimeTrackingEntity,
    client: Option<&'a ClientEntity>,
}

pub async fn run_show<S, L>(
    context: TimeTrackingContext<S>,
    lookup: L,
    id: &str,
    as_json: bool,
    out: &mut impl Write,
) -> Result<(), CliError>
where
    S: TimeTrackingService,
    L: ClientLookup,
{
    let id = normalize_id(id)?;
    let mut view = ServiceEmployeeView::new(id.as_str(), context, lookup);
    view.load().await?;

    let Some(record) = view.time_tracking() else {
        return Err(CliError::NotLoaded(id));
    };

    if as_json {
        let output = ShowOutput {
            time_tracking: record,
            client: view.client(),
        };
        writeln!(out, "{}", serde_json::to_string_pretty(&output)?)?;
    } else {
        for line in record_detail_lines(record, view.client(), Utc::now()) {
            writeln!(out, "{line}")?;
        }
    }
    Ok(())
}
