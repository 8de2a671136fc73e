use std::io::Write;

use servtrack_core::{TimeTrackingContext, TimeTrackingPatch, TimeTrackingService};

use crate::commands::common::{normalize_id, normalize_note};
use crate::error::CliError;

pub async fn run_note<S: TimeTrackingService>(
    context: &TimeTrackingContext<S>,
    id: &str,
    text: &[String],
    out: &mut impl Write,
) -> Result<(), CliError> {
    let id = normalize_id(id)?;
    let note = normalize_note(text)?;

    let patch = TimeTrackingPatch::default().with_notes(note);
    let updated = context.update_time_tracking(&id, &patch).await?;
    tracing::debug!(id = %updated.id, "Updated notes");
    writeln!(out, "{}", updated.id)?;
    Ok(())
}
