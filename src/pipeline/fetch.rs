use log::debug;
use std::thread;
use std::time::Duration;

use crate::engine::progress::ProgressTracker;
use crate::{FetchTally, Retrieved, WorkItem};

use super::ItemRetriever;
use super::queue::BlockingQueue;

/// Single fetcher: pop until end of stream, retrieving each item with `tracker` as its
/// progress sink. A failed item is recorded on the status line and skipped; the loop only
/// ends when the queue is closed and drained.
pub fn fetcher_loop<R>(
    retriever: &R,
    queue: &BlockingQueue<WorkItem>,
    tracker: &ProgressTracker,
    item_delay: Duration,
) -> FetchTally
where
    R: ItemRetriever + ?Sized,
{
    let mut tally = FetchTally::default();
    while let Some(item) = queue.pop() {
        tracker.set_progress(0, 1);
        tracker.set_prefix_label(item.as_str());
        tracker.set_status_label("Starting");
        match retriever.retrieve(&item, tracker) {
            Ok(Retrieved::Downloaded { bytes }) => {
                debug!("{item}: {bytes} bytes");
                tally.succeeded += 1;
                tracker.set_status_label("Sleep...");
            }
            Ok(Retrieved::AlreadyExists) => {
                debug!("{item}: already present");
                tracker.set_progress(1, 1);
                tally.skipped += 1;
                tracker.set_status_label("Exists");
            }
            Err(e) => {
                // Failure label stays up through the sleep so it is visible for at least one frame.
                debug!("{item}: {e}");
                tally.failed += 1;
                tracker.set_status_label(e.status_label());
            }
        }
        thread::sleep(item_delay);
    }
    tracker.set_status_label("Finished");
    tally
}
