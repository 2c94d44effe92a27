//! The concurrent core: one discoverer feeding a closeable queue, a pool of fetchers draining
//! it, and a reporter rendering every stage's progress.
//!
//! The pipeline talks to the outside world only through [`Listing`] and [`ItemRetriever`];
//! the Gelbooru implementations live in [`crate::engine::gelbooru`].

pub mod context;
pub mod discover;
pub mod error_handler;
pub mod fetch;
pub mod orchestrator;
pub mod queue;
pub mod reporter;

pub use context::{PipelineState, PipelineTuning};
pub use discover::run_discovery;
pub use error_handler::report_run_summary;
pub use fetch::fetcher_loop;
pub use orchestrator::run_pipeline;
pub use queue::BlockingQueue;
pub use reporter::run_reporter;

use crate::engine::progress::ProgressSink;
use crate::error::GelfetchResult;
use crate::{Retrieved, WorkItem};

/// Paginated index of item identifiers. Called only from the discoverer thread.
pub trait Listing: Sync {
    /// URL of the page whose first post is at offset `cursor`.
    fn page_url(&self, cursor: u64) -> GelfetchResult<String>;

    fn fetch_page(&self, url: &str) -> GelfetchResult<Vec<u8>>;

    /// Highest page offset referenced by the first page.
    fn parse_upper_bound(&self, page: &[u8]) -> GelfetchResult<u64>;

    fn parse_item_identifiers(&self, page: &[u8]) -> GelfetchResult<Vec<WorkItem>>;
}

/// Fetches the payload for one identifier. Called concurrently from every fetcher thread.
pub trait ItemRetriever: Sync {
    /// Retrieve `item`, reporting byte progress into `sink`. An output that already exists is
    /// `Ok(Retrieved::AlreadyExists)`, not an error.
    fn retrieve(&self, item: &WorkItem, sink: &dyn ProgressSink) -> GelfetchResult<Retrieved>;
}
