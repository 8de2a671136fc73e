use std::io::Write;

use chrono::{DateTime, Utc};
use servtrack_core::view::{ClientLookup, ServiceEmployeeView, SkipReason, StopOutcome};
use servtrack_core::{TimeTrackingContext, TimeTrackingService};

use crate::commands::common::{format_clock, normalize_id};
use crate::error::CliError;

pub async fn run_stop<S, L>(
    context: &TimeTrackingContext<S>,
    lookup: L,
    id: &str,
    location: Option<(f64, f64)>,
    now: DateTime<Utc>,
    out: &mut impl Write,
) -> Result<(), CliError>
where
    S: TimeTrackingService,
    L: ClientLookup,
{
    let id = normalize_id(id)?;
    let mut view = ServiceEmployeeView::new(id.as_str(), context.clone(), lookup);
    view.load().await?;

    match view.handle_stop(now, location).await {
        StopOutcome::Stopped(record) => {
            tracing::info!(id = %record.id, "Stopped service");
            writeln!(out, "Stopped {} at {}", record.id, format_clock(now))?;
            Ok(())
        }
        StopOutcome::Skipped(SkipReason::AlreadyConcluded) => {
            tracing::info!(id = %id, "Stop skipped, service already concluded");
            writeln!(out, "Service {id} is already concluded")?;
            Ok(())
        }
        StopOutcome::Skipped(SkipReason::MissingRecord) => Err(CliError::NotLoaded(id)),
        StopOutcome::Skipped(reason) => Err(CliError::StopSkipped(reason)),
        StopOutcome::Failed(error) => Err(error.into()),
    }
}
