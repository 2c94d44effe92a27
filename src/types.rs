//! Public and internal types for the gelfetch API and pipeline.

use std::fmt;
use std::path::PathBuf;

use crate::utils::config::{DelayConsts, HttpConsts, PackagePaths, WorkerLimits};

/// Opaque identifier (a content hash) naming one fetchable payload.
///
/// Moved from the discoverer into the queue and from the queue into a fetcher; never mutated.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct WorkItem(String);

impl WorkItem {
    pub fn new(id: impl Into<String>) -> Self {
        WorkItem(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WorkItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for WorkItem {
    fn from(s: &str) -> Self {
        WorkItem(s.to_string())
    }
}

impl From<String> for WorkItem {
    fn from(s: String) -> Self {
        WorkItem(s)
    }
}

/// One tag from the autocomplete search.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tag {
    pub name: String,
    pub post_count: u64,
}

/// Successful outcome of retrieving one item.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Retrieved {
    /// Payload was transferred and written; `bytes` is the size on disk.
    Downloaded { bytes: u64 },
    /// Output already existed; nothing was transferred. Counts as success.
    AlreadyExists,
}

/// What the discoverer did before it stopped.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DiscoveryReport {
    /// Listing pages fetched and parsed.
    pub pages: u64,
    /// Identifiers pushed into the queue.
    pub pushed: usize,
    /// Set when discovery stopped on an error rather than running out of pages.
    pub failure: Option<String>,
}

/// Per-fetcher outcome counts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FetchTally {
    pub succeeded: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl FetchTally {
    pub fn processed(&self) -> usize {
        self.succeeded + self.skipped + self.failed
    }

    pub fn merge(&mut self, other: &FetchTally) {
        self.succeeded += other.succeeded;
        self.skipped += other.skipped;
        self.failed += other.failed;
    }
}

/// Aggregate result of one pipeline run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub pages: u64,
    pub discovered: usize,
    pub succeeded: usize,
    pub skipped: usize,
    pub failed: usize,
    pub discovery_error: Option<String>,
}

impl RunSummary {
    pub fn from_parts(discovery: DiscoveryReport, tallies: &[FetchTally]) -> Self {
        let mut total = FetchTally::default();
        for t in tallies {
            total.merge(t);
        }
        RunSummary {
            pages: discovery.pages,
            discovered: discovery.pushed,
            succeeded: total.succeeded,
            skipped: total.skipped,
            failed: total.failed,
            discovery_error: discovery.failure,
        }
    }

    pub fn processed(&self) -> usize {
        self.succeeded + self.skipped + self.failed
    }
}

/// Full options (CLI, config file, lib). Normalized into
/// [`PipelineTuning`](crate::pipeline::PipelineTuning) before a run.
#[derive(Clone, Debug)]
pub struct Opts {
    /// Fetcher thread count. Values below 1 are coerced to 1.
    pub workers: usize,
    /// Delay between listing pages in milliseconds. Floored at [`DelayConsts::MIN_MS`].
    pub page_delay_ms: u64,
    /// Delay after each item in milliseconds. Floored at [`DelayConsts::MIN_MS`].
    pub item_delay_ms: u64,
    /// Board root, e.g. `https://gelbooru.com`.
    pub host: String,
    /// Directory that receives `<hash>.<format>` files.
    pub output_dir: PathBuf,
    pub user_agent: String,
    /// Image extensions tried in order for every hash.
    pub formats: Vec<String>,
    /// Debug logging.
    pub verbose: bool,
    /// No progress bars.
    pub quiet: bool,
}

impl Default for Opts {
    fn default() -> Self {
        Opts {
            workers: WorkerLimits::DEFAULT,
            page_delay_ms: DelayConsts::PAGE_DEFAULT_MS,
            item_delay_ms: DelayConsts::ITEM_DEFAULT_MS,
            host: HttpConsts::HOST.to_string(),
            output_dir: PathBuf::from(PackagePaths::get().default_output_dir()),
            user_agent: HttpConsts::DEFAULT_USER_AGENT.to_string(),
            formats: HttpConsts::DEFAULT_FORMATS
                .iter()
                .map(|f| f.to_string())
                .collect(),
            verbose: false,
            quiet: false,
        }
    }
}
