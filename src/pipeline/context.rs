//! Pipeline tuning and the shared state every pipeline thread borrows.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::Opts;
use crate::WorkItem;
use crate::engine::progress::{Frame, ProgressTracker};
use crate::utils::config::{DelayConsts, PipelineConsts, WorkerLimits};

use super::queue::BlockingQueue;

/// Thread count and politeness delays for one run, already clamped to their floors.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PipelineTuning {
    pub num_workers: usize,
    pub page_delay: Duration,
    pub item_delay: Duration,
    /// Reporter poll interval.
    pub report_interval: Duration,
}

impl PipelineTuning {
    /// Clamp raw values: workers to at least [`WorkerLimits::MIN`], delays to at least
    /// [`DelayConsts::MIN_MS`].
    pub fn new(num_workers: usize, page_delay_ms: u64, item_delay_ms: u64) -> Self {
        PipelineTuning {
            num_workers: num_workers.max(WorkerLimits::MIN),
            page_delay: Duration::from_millis(page_delay_ms.max(DelayConsts::MIN_MS)),
            item_delay: Duration::from_millis(item_delay_ms.max(DelayConsts::MIN_MS)),
            report_interval: PipelineConsts::REPORT_INTERVAL,
        }
    }

    /// Worker clamp only; no politeness sleeps and a fast reporter. For tests and local sources.
    pub fn unthrottled(num_workers: usize) -> Self {
        PipelineTuning {
            num_workers: num_workers.max(WorkerLimits::MIN),
            page_delay: Duration::ZERO,
            item_delay: Duration::ZERO,
            report_interval: Duration::from_millis(5),
        }
    }
}

impl From<&Opts> for PipelineTuning {
    fn from(o: &Opts) -> Self {
        PipelineTuning::new(o.workers, o.page_delay_ms, o.item_delay_ms)
    }
}

/// State owned by one run and borrowed by every pipeline thread. Dropped only after the
/// thread scope has joined all of them.
pub struct PipelineState {
    pub queue: BlockingQueue<WorkItem>,
    pub discoverer: ProgressTracker,
    pub fetchers: Vec<ProgressTracker>,
    /// Fetchers started and not yet exited.
    live_fetchers: AtomicUsize,
}

impl PipelineState {
    pub fn new(num_workers: usize) -> Self {
        PipelineState {
            queue: BlockingQueue::new(),
            discoverer: ProgressTracker::with_prefix(format!("{:<10}", "Parser")),
            fetchers: (0..num_workers)
                .map(|i| ProgressTracker::with_prefix(format!("Fetcher {i:>3}")))
                .collect(),
            live_fetchers: AtomicUsize::new(0),
        }
    }

    /// Called by the orchestrator right before a fetcher thread is spawned.
    pub(crate) fn fetcher_started(&self) {
        self.live_fetchers.fetch_add(1, Ordering::AcqRel);
    }

    /// Called by a fetcher on exit, and by the orchestrator when a spawn it announced failed.
    pub(crate) fn fetcher_stopped(&self) {
        self.live_fetchers.fetch_sub(1, Ordering::AcqRel);
    }

    pub fn live_fetchers(&self) -> usize {
        self.live_fetchers.load(Ordering::Acquire)
    }

    /// Nothing left to show changing: queue closed and drained, every fetcher gone.
    pub fn is_finished(&self) -> bool {
        self.queue.is_drained() && self.live_fetchers() == 0
    }

    pub fn frame(&self) -> Frame {
        Frame {
            queued: self.queue.len(),
            discoverer: self.discoverer.snapshot(),
            fetchers: self.fetchers.iter().map(|t| t.snapshot()).collect(),
        }
    }
}
