use log::debug;
use std::io;
use std::thread::{self, ScopedJoinHandle};

use crate::engine::progress::Renderer;
use crate::error::{GelfetchError, GelfetchResult};
use crate::{DiscoveryReport, FetchTally, RunSummary};

use super::context::{PipelineState, PipelineTuning};
use super::discover::run_discovery;
use super::error_handler::report_run_summary;
use super::fetch::fetcher_loop;
use super::reporter::run_reporter;
use super::{ItemRetriever, Listing};

/// Decrements the live-fetcher count when a fetcher thread ends, panic included, so the
/// reporter can never wait on a fetcher that is gone.
struct LiveFetcher<'a>(&'a PipelineState);

impl Drop for LiveFetcher<'_> {
    fn drop(&mut self) {
        self.0.fetcher_stopped();
    }
}

fn spawn_error(what: &str, e: io::Error) -> GelfetchError {
    GelfetchError::Thread(format!("failed to spawn {what}: {e}"))
}

fn join_named<T>(handle: ScopedJoinHandle<'_, T>) -> GelfetchResult<T> {
    let name = handle.thread().name().unwrap_or("pipeline").to_string();
    handle
        .join()
        .map_err(|_| GelfetchError::Thread(format!("{name} thread panicked")))
}

/// Run discovery, the fetcher pool and the reporter to completion.
///
/// Startup order: discoverer, fetchers, reporter. Shutdown order: join discoverer, close the
/// queue, join fetchers, join reporter. All threads live in one [`thread::scope`], so the
/// shared state cannot be dropped while any of them still runs.
///
/// If a thread fails to spawn, the queue is closed so everything already started drains and
/// exits, the scope joins it, and the spawn error is returned. Per-item and discovery
/// failures are not errors here; they are counted in the returned [`RunSummary`].
pub fn run_pipeline<L, R, D>(
    listing: &L,
    retriever: &R,
    tuning: &PipelineTuning,
    renderer: &mut D,
) -> GelfetchResult<RunSummary>
where
    L: Listing + ?Sized,
    R: ItemRetriever + ?Sized,
    D: Renderer + ?Sized,
{
    let state = PipelineState::new(tuning.num_workers);
    let state = &state;
    debug!(
        "starting pipeline: {} fetchers, page delay {:?}, item delay {:?}",
        tuning.num_workers, tuning.page_delay, tuning.item_delay
    );

    let summary = thread::scope(|s| -> GelfetchResult<RunSummary> {
        let discoverer = thread::Builder::new()
            .name("discoverer".to_string())
            .spawn_scoped(s, move || {
                run_discovery(listing, &state.queue, &state.discoverer, tuning.page_delay)
            });
        let discoverer = match discoverer {
            Ok(h) => h,
            Err(e) => {
                state.queue.close();
                return Err(spawn_error("discoverer", e));
            }
        };

        let mut fetchers: Vec<ScopedJoinHandle<'_, FetchTally>> =
            Vec::with_capacity(state.fetchers.len());
        for (i, tracker) in state.fetchers.iter().enumerate() {
            state.fetcher_started();
            let spawned = thread::Builder::new()
                .name(format!("fetcher-{i}"))
                .spawn_scoped(s, move || {
                    let _live = LiveFetcher(state);
                    fetcher_loop(retriever, &state.queue, tracker, tuning.item_delay)
                });
            match spawned {
                Ok(h) => fetchers.push(h),
                Err(e) => {
                    state.fetcher_stopped();
                    state.queue.close();
                    return Err(spawn_error(&format!("fetcher {i}"), e));
                }
            }
        }

        let reporter = thread::Builder::new()
            .name("reporter".to_string())
            .spawn_scoped(s, move || {
                run_reporter(state, renderer, tuning.report_interval)
            });
        let reporter = match reporter {
            Ok(h) => h,
            Err(e) => {
                state.queue.close();
                return Err(spawn_error("reporter", e));
            }
        };

        // Close strictly after the discoverer is gone so no push can race the close. Close
        // even if it panicked, otherwise the fetchers would wait forever.
        let discovery = join_named(discoverer);
        state.queue.close();

        let mut tallies = Vec::with_capacity(fetchers.len());
        let mut fetcher_error = None;
        for h in fetchers {
            match join_named(h) {
                Ok(t) => tallies.push(t),
                Err(e) => {
                    fetcher_error.get_or_insert(e);
                }
            }
        }
        let frames = join_named(reporter)?;
        debug!("reporter drew {frames} frames");

        let discovery: DiscoveryReport = discovery?;
        if let Some(e) = fetcher_error {
            return Err(e);
        }
        Ok(RunSummary::from_parts(discovery, &tallies))
    })?;

    report_run_summary(&summary);
    Ok(summary)
}
