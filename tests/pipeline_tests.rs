use gelfetch::engine::progress::{Frame, ProgressSink, Renderer};
use gelfetch::pipeline::{ItemRetriever, Listing, PipelineTuning, run_pipeline};
use gelfetch::{GelfetchError, GelfetchResult, Retrieved, WorkItem};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

// --- fakes ---

/// In-memory listing: `pages[cursor]` is the comma-separated identifier list of that page.
struct FakeListing {
    upper: u64,
    pages: HashMap<u64, Vec<&'static str>>,
    fail_upper: bool,
    fetched: Mutex<Vec<u64>>,
}

impl FakeListing {
    fn new(upper: u64, pages: &[(u64, &[&'static str])]) -> Self {
        FakeListing {
            upper,
            pages: pages.iter().map(|(c, ids)| (*c, ids.to_vec())).collect(),
            fail_upper: false,
            fetched: Mutex::new(Vec::new()),
        }
    }

    fn fetched(&self) -> Vec<u64> {
        self.fetched.lock().unwrap().clone()
    }
}

impl Listing for FakeListing {
    fn page_url(&self, cursor: u64) -> GelfetchResult<String> {
        Ok(format!("mem://{cursor}"))
    }

    fn fetch_page(&self, url: &str) -> GelfetchResult<Vec<u8>> {
        let cursor: u64 = url.trim_start_matches("mem://").parse().unwrap();
        self.fetched.lock().unwrap().push(cursor);
        match self.pages.get(&cursor) {
            Some(ids) => Ok(ids.join(",").into_bytes()),
            None => Err(GelfetchError::Http {
                url: url.to_string(),
                status: 503,
            }),
        }
    }

    fn parse_upper_bound(&self, _page: &[u8]) -> GelfetchResult<u64> {
        if self.fail_upper {
            return Err(GelfetchError::Parse("no pid links".to_string()));
        }
        Ok(self.upper)
    }

    fn parse_item_identifiers(&self, page: &[u8]) -> GelfetchResult<Vec<WorkItem>> {
        let text = std::str::from_utf8(page).unwrap();
        Ok(text
            .split(',')
            .filter(|s| !s.is_empty())
            .map(WorkItem::from)
            .collect())
    }
}

#[derive(Default)]
struct FakeRetriever {
    existing: HashSet<&'static str>,
    broken: HashSet<&'static str>,
    panics_on: Option<&'static str>,
    calls: Mutex<Vec<String>>,
}

impl FakeRetriever {
    fn calls(&self) -> Vec<String> {
        let mut calls = self.calls.lock().unwrap().clone();
        calls.sort();
        calls
    }
}

impl ItemRetriever for FakeRetriever {
    fn retrieve(&self, item: &WorkItem, sink: &dyn ProgressSink) -> GelfetchResult<Retrieved> {
        self.calls.lock().unwrap().push(item.to_string());
        if self.panics_on == Some(item.as_str()) {
            panic!("retriever blew up on {item}");
        }
        if self.existing.contains(item.as_str()) {
            return Ok(Retrieved::AlreadyExists);
        }
        if self.broken.contains(item.as_str()) {
            return Err(GelfetchError::Http {
                url: format!("mem://{item}"),
                status: 404,
            });
        }
        sink.label(&format!("{item}.png"));
        sink.transferred(5, 10);
        sink.transferred(10, 10);
        Ok(Retrieved::Downloaded { bytes: 10 })
    }
}

#[derive(Default)]
struct RecordingRenderer {
    frames: usize,
    last: Option<Frame>,
}

impl Renderer for RecordingRenderer {
    fn draw(&mut self, _frame: &Frame) {
        self.frames += 1;
    }

    fn finish(&mut self, frame: &Frame) {
        self.last = Some(frame.clone());
    }
}

fn ids(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

// --- end-to-end pipeline ---

#[test]
fn test_two_pages_every_item_retrieved_once() {
    let listing = FakeListing::new(42, &[(0, &["a1", "a2"]), (42, &["a3"])]);
    let retriever = FakeRetriever::default();
    let mut renderer = RecordingRenderer::default();

    let summary = run_pipeline(
        &listing,
        &retriever,
        &PipelineTuning::unthrottled(2),
        &mut renderer,
    )
    .unwrap();

    assert_eq!(listing.fetched(), vec![0, 42]);
    assert_eq!(retriever.calls(), ids(&["a1", "a2", "a3"]));
    assert_eq!(summary.pages, 2);
    assert_eq!(summary.discovered, 3);
    assert_eq!(summary.succeeded, 3);
    assert_eq!(summary.processed(), 3);
    assert_eq!(summary.discovery_error, None);
}

#[test]
fn test_cursor_stops_after_passing_upper_bound() {
    let listing = FakeListing::new(
        100,
        &[(0, &["a"]), (42, &["b"]), (84, &["c"]), (126, &["never"])],
    );
    let retriever = FakeRetriever::default();
    let mut renderer = RecordingRenderer::default();
    let summary = run_pipeline(
        &listing,
        &retriever,
        &PipelineTuning::unthrottled(3),
        &mut renderer,
    )
    .unwrap();
    assert_eq!(listing.fetched(), vec![0, 42, 84]);
    assert_eq!(retriever.calls(), ids(&["a", "b", "c"]));
    assert_eq!(summary.pages, 3);
}

#[test]
fn test_existing_item_is_skipped_not_retried() {
    let listing = FakeListing::new(0, &[(0, &["a1", "a2", "a3"])]);
    let retriever = FakeRetriever {
        existing: HashSet::from(["a1"]),
        ..Default::default()
    };
    let mut renderer = RecordingRenderer::default();
    let summary = run_pipeline(
        &listing,
        &retriever,
        &PipelineTuning::unthrottled(2),
        &mut renderer,
    )
    .unwrap();
    assert_eq!(retriever.calls(), ids(&["a1", "a2", "a3"]));
    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.succeeded, 2);
    assert_eq!(summary.failed, 0);
}

#[test]
fn test_failed_item_does_not_stop_the_fetcher() {
    let listing = FakeListing::new(0, &[(0, &["ok1", "bad", "ok2", "ok3"])]);
    let retriever = FakeRetriever {
        broken: HashSet::from(["bad"]),
        ..Default::default()
    };
    let mut renderer = RecordingRenderer::default();
    let summary = run_pipeline(
        &listing,
        &retriever,
        &PipelineTuning::unthrottled(1),
        &mut renderer,
    )
    .unwrap();
    assert_eq!(retriever.calls().len(), 4);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.succeeded, 3);
}

#[test]
fn test_upper_bound_failure_pushes_nothing_and_fetchers_exit() {
    let mut listing = FakeListing::new(42, &[(0, &["a1"]), (42, &["a2"])]);
    listing.fail_upper = true;
    let retriever = FakeRetriever::default();
    let mut renderer = RecordingRenderer::default();
    let summary = run_pipeline(
        &listing,
        &retriever,
        &PipelineTuning::unthrottled(3),
        &mut renderer,
    )
    .unwrap();

    assert!(retriever.calls().is_empty());
    assert_eq!(summary.discovered, 0);
    assert_eq!(summary.pages, 0);
    let reason = summary.discovery_error.unwrap();
    assert!(reason.starts_with("Failed to parse upper bound"), "{reason}");

    let last = renderer.last.unwrap();
    assert_eq!(last.discoverer.status, "Failed to parse upper bound");
    assert!(last.fetchers.iter().all(|f| f.status == "Finished"));
}

#[test]
fn test_page_fetch_failure_keeps_items_already_queued() {
    // Second page is missing from the fake and answers 503.
    let listing = FakeListing::new(42, &[(0, &["a1", "a2"])]);
    let retriever = FakeRetriever::default();
    let mut renderer = RecordingRenderer::default();
    let summary = run_pipeline(
        &listing,
        &retriever,
        &PipelineTuning::unthrottled(2),
        &mut renderer,
    )
    .unwrap();
    assert_eq!(summary.pages, 1);
    assert_eq!(summary.discovered, 2);
    assert_eq!(summary.succeeded, 2);
    assert!(
        summary
            .discovery_error
            .as_deref()
            .is_some_and(|r| r.starts_with("Failed to GET"))
    );
}

#[test]
fn test_empty_listing_terminates() {
    let listing = FakeListing::new(0, &[(0, &[])]);
    let retriever = FakeRetriever::default();
    let mut renderer = RecordingRenderer::default();
    let summary = run_pipeline(
        &listing,
        &retriever,
        &PipelineTuning::unthrottled(4),
        &mut renderer,
    )
    .unwrap();
    assert_eq!(summary.pages, 1);
    assert_eq!(summary.processed(), 0);
}

#[test]
fn test_zero_workers_coerced_to_one() {
    let listing = FakeListing::new(0, &[(0, &["a1", "a2"])]);
    let retriever = FakeRetriever::default();
    let mut renderer = RecordingRenderer::default();
    let tuning = PipelineTuning::unthrottled(0);
    assert_eq!(tuning.num_workers, 1);
    let summary = run_pipeline(&listing, &retriever, &tuning, &mut renderer).unwrap();
    assert_eq!(summary.succeeded, 2);
    assert_eq!(renderer.last.unwrap().fetchers.len(), 1);
}

#[test]
fn test_final_frame_shows_finished_pipeline() {
    let listing = FakeListing::new(0, &[(0, &["a1", "a2", "a3"])]);
    let retriever = FakeRetriever::default();
    let mut renderer = RecordingRenderer::default();
    run_pipeline(
        &listing,
        &retriever,
        &PipelineTuning::unthrottled(2),
        &mut renderer,
    )
    .unwrap();

    assert!(renderer.frames >= 1);
    let last = renderer.last.unwrap();
    assert_eq!(last.queued, 0);
    assert_eq!(last.fetchers.len(), 2);
    for f in &last.fetchers {
        assert_eq!(f.status, "Finished");
        assert!(f.current <= f.maximum);
    }
    assert!(last.discoverer.prefix.starts_with("Parser"));
}

#[test]
fn test_panicking_fetcher_is_reported_as_thread_error() {
    let listing = FakeListing::new(0, &[(0, &["i1", "i2", "i3", "i4", "i5"])]);
    let retriever = FakeRetriever {
        panics_on: Some("i2"),
        ..Default::default()
    };
    let mut renderer = RecordingRenderer::default();
    let err = run_pipeline(
        &listing,
        &retriever,
        &PipelineTuning::unthrottled(2),
        &mut renderer,
    )
    .unwrap_err();

    assert!(matches!(err, GelfetchError::Thread(_)), "{err}");
    assert!(err.to_string().contains("panicked"), "{err}");
    // The surviving fetcher drained the rest and the reporter still finished.
    let calls = retriever.calls();
    assert_eq!(calls.len(), 5);
    let last = renderer.last.unwrap();
    assert_eq!(last.queued, 0);
}

// --- tuning ---

#[test]
fn test_tuning_floors_delays() {
    let t = PipelineTuning::new(0, 5, 0);
    assert_eq!(t.num_workers, 1);
    assert_eq!(t.page_delay, Duration::from_millis(100));
    assert_eq!(t.item_delay, Duration::from_millis(100));

    let t = PipelineTuning::new(8, 750, 250);
    assert_eq!(t.num_workers, 8);
    assert_eq!(t.page_delay, Duration::from_millis(750));
    assert_eq!(t.item_delay, Duration::from_millis(250));
}

#[test]
fn test_tuning_from_default_opts() {
    let t = PipelineTuning::from(&gelfetch::Opts::default());
    assert_eq!(t.num_workers, 10);
    assert_eq!(t.page_delay, Duration::from_millis(500));
    assert_eq!(t.item_delay, Duration::from_millis(100));
}
