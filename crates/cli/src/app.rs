//! Run driver: validation, reclamation and final reporting.

use anyhow::Context;
use spacekeeper_core::{
    cleanup, validate, CleanupError, DeviceProbe, EventSink, FileRemover, Outcome, ReclaimReport,
    Reclaimer, SpaceProbe, TracingEvents,
};

use crate::config::RunConfig;

/// Run a cleanup against the real filesystem, logging progress.
pub fn execute(run: &RunConfig) -> anyhow::Result<ReclaimReport> {
    let report = cleanup(&run.directories, &run.reclaim, &mut TracingEvents)
        .context("Cleanup aborted")?;
    log_summary(&report);
    Ok(report)
}

/// Run a cleanup with explicit platform collaborators.
pub fn execute_with<D, S, R, E>(
    run: &RunConfig,
    devices: &D,
    reclaimer: Reclaimer<S, R>,
    events: &mut E,
) -> anyhow::Result<ReclaimReport>
where
    D: DeviceProbe + ?Sized,
    S: SpaceProbe,
    R: FileRemover,
    E: EventSink + ?Sized,
{
    let dirs = validate(&run.directories, devices, events).context("Cleanup aborted")?;
    let report = reclaimer
        .run(&dirs, &run.reclaim, events)
        .context("Cleanup aborted")?;
    log_summary(&report);
    Ok(report)
}

/// Whether the event stream already logged the reason for `err`.
///
/// Validation aborts are reported as events before the error is returned.
pub fn already_reported(err: &anyhow::Error) -> bool {
    matches!(
        err.downcast_ref::<CleanupError>(),
        Some(CleanupError::NoExistingDirectory | CleanupError::DifferentDevices { .. })
    )
}

fn log_summary(report: &ReclaimReport) {
    match report.outcome {
        Outcome::AlreadySatisfied => {}
        Outcome::Reclaimed | Outcome::ExhaustedInsufficient => {
            tracing::info!(
                outcome = ?report.outcome,
                removed = report.removed.len(),
                failed = report.failures.len(),
                available_mb = report.final_available_mb,
                dry_run = report.dry_run,
                "Cleanup finished",
            );
        }
    }
}

/// Serialize a report for `--json`.
pub fn report_json(report: &ReclaimReport) -> anyhow::Result<String> {
    serde_json::to_string_pretty(report).context("Failed to serialize report")
}
