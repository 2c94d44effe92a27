use log::{info, warn};

use crate::RunSummary;

/// Log the outcome of a run. Called after every pipeline thread has joined, so nothing here
/// interleaves with the progress bars.
pub fn report_run_summary(summary: &RunSummary) {
    if let Some(ref msg) = summary.discovery_error {
        warn!(
            "Discovery stopped early after {} pages: {}",
            summary.pages, msg
        );
    }
    if summary.failed > 0 {
        warn!(
            "{} of {} items failed; rerun to retry them (existing files are skipped)",
            summary.failed,
            summary.processed()
        );
    }
    info!(
        "Discovered {} items on {} pages: {} downloaded, {} already present, {} failed",
        summary.discovered, summary.pages, summary.succeeded, summary.skipped, summary.failed
    );
}
