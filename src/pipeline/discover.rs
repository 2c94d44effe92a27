//! Producer loop: page through the listing and push every identifier into the queue.

use log::debug;
use std::thread;
use std::time::Duration;

use crate::engine::progress::ProgressTracker;
use crate::error::GelfetchError;
use crate::utils::config::PipelineConsts;
use crate::{DiscoveryReport, WorkItem};

use super::Listing;
use super::queue::BlockingQueue;

/// Why discovery stopped early. The text goes straight onto the status line.
enum Stop {
    Failed(&'static str, GelfetchError),
    QueueClosed,
}

fn record_stop(tracker: &ProgressTracker, report: &mut DiscoveryReport, stop: Stop) {
    let (status, detail) = match stop {
        Stop::Failed(status, err) => (status, format!("{status}: {err}")),
        Stop::QueueClosed => ("Queue closed", "queue closed during discovery".to_string()),
    };
    debug!("discovery stopped: {detail}");
    tracker.set_status_label(status);
    report.failure = Some(detail);
}

/// Fetch and parse pages starting at `pid = 0`, advancing by [`PipelineConsts::PAGE_STRIDE`]
/// until the cursor passes the upper bound read from the first page.
///
/// Any fetch or parse error ends discovery (no retry). The queue is never closed here; the
/// orchestrator closes it once this function has returned and its thread has joined.
pub fn run_discovery<L>(
    listing: &L,
    queue: &BlockingQueue<WorkItem>,
    tracker: &ProgressTracker,
    page_delay: Duration,
) -> DiscoveryReport
where
    L: Listing + ?Sized,
{
    let mut report = DiscoveryReport::default();
    let mut cursor = 0_u64;
    let mut upper = 0_u64;

    loop {
        let url = match listing.page_url(cursor) {
            Ok(url) => url,
            Err(e) => {
                record_stop(tracker, &mut report, Stop::Failed("Failed to construct url", e));
                break;
            }
        };
        let page = match listing.fetch_page(&url) {
            Ok(page) => page,
            Err(e) => {
                record_stop(tracker, &mut report, Stop::Failed("Failed to GET", e));
                break;
            }
        };

        if cursor == 0 {
            upper = match listing.parse_upper_bound(&page) {
                Ok(upper) => upper,
                Err(e) => {
                    let stop = Stop::Failed("Failed to parse upper bound", e);
                    record_stop(tracker, &mut report, stop);
                    break;
                }
            };
            tracker.set_maximum(upper);
        }

        let ids = match listing.parse_item_identifiers(&page) {
            Ok(ids) => ids,
            Err(e) => {
                let stop = Stop::Failed("Failed to parse identifiers", e);
                record_stop(tracker, &mut report, stop);
                break;
            }
        };
        report.pages += 1;
        debug!("page pid={cursor}: {} identifiers", ids.len());

        let mut closed = false;
        for id in ids {
            if queue.push(id).is_err() {
                closed = true;
                break;
            }
            report.pushed += 1;
        }
        if closed {
            record_stop(tracker, &mut report, Stop::QueueClosed);
            break;
        }

        tracker.set_current(cursor);
        tracker.set_status_label(format!("{cursor:<7} / ~{upper:<7}"));

        cursor += PipelineConsts::PAGE_STRIDE;
        if cursor > upper {
            break;
        }
        thread::sleep(page_delay);
    }

    debug!(
        "discovery done: {} pages, {} identifiers",
        report.pages, report.pushed
    );
    report
}
