use std::io::Write;

use servtrack_core::util::normalize_text_option;
use servtrack_core::{NewTimeTracking, TimeTrackingContext, TimeTrackingService};

use crate::error::CliError;

#[derive(Debug, Clone, Default)]
pub struct StartArgs {
    pub employee_id: String,
    pub client_id: String,
    pub location: Option<(f64, f64)>,
    pub notes: Option<String>,
}

pub async fn run_start<S: TimeTrackingService>(
    context: &TimeTrackingContext<S>,
    args: StartArgs,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let mut input = NewTimeTracking::new(args.employee_id.trim(), args.client_id.trim());
    if let Some((lat, long)) = args.location {
        input = input.with_start_location(lat, long);
    }
    if let Some(notes) = normalize_text_option(args.notes) {
        input = input.with_notes(notes);
    }

    let created = context.create_time_tracking(&input).await?;
    tracing::info!(id = %created.id, employee_id = %created.employee_id, "Started service");
    writeln!(out, "{}", created.id)?;
    Ok(())
}
