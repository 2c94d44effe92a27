//! Progress state shared between pipeline threads and the reporter, plus terminal rendering.
//!
//! Each [`ProgressTracker`] has exactly one writer (the thread that owns the stage) and one
//! reader (the reporter). Readers only ever get a [`TrackerSnapshot`] copy; the lock is held
//! just long enough to copy counters and labels in or out, so a reader never sees a
//! half-written label and a writer is never stalled by rendering.

use kdam::{Animation, Bar, BarExt};
use std::sync::{Mutex, MutexGuard};

use crate::utils::config::PipelineConsts;

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Point-in-time copy of a tracker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TrackerSnapshot {
    pub current: u64,
    /// Always ≥ 1.
    pub maximum: u64,
    pub prefix: String,
    pub status: String,
}

impl Default for TrackerSnapshot {
    fn default() -> Self {
        TrackerSnapshot {
            current: 0,
            maximum: 1,
            prefix: String::new(),
            status: String::new(),
        }
    }
}

impl TrackerSnapshot {
    pub fn ratio(&self) -> f64 {
        self.current as f64 / self.maximum as f64
    }

    pub fn percent(&self) -> u8 {
        (self.ratio() * 100.0) as u8
    }
}

/// Lock-guarded counter/label bundle. Invariant: `1 <= maximum` and `current <= maximum`.
#[derive(Debug, Default)]
pub struct ProgressTracker {
    state: Mutex<TrackerSnapshot>,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        let tracker = Self::new();
        tracker.set_prefix_label(prefix);
        tracker
    }

    // A writer that panicked mid-update still left a valid snapshot (every mutation is a
    // single assignment), so poisoning is ignored rather than spread to the reporter.
    fn state(&self) -> MutexGuard<'_, TrackerSnapshot> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Set `current`, clamped to `maximum`.
    pub fn set_current(&self, n: u64) {
        let mut s = self.state();
        s.current = n.min(s.maximum);
    }

    /// Set `maximum` (at least 1) and re-clamp `current`.
    pub fn set_maximum(&self, n: u64) {
        let mut s = self.state();
        s.maximum = n.max(1);
        s.current = s.current.min(s.maximum);
    }

    /// Set both under one lock so the reporter never sees the new current against the old maximum.
    pub fn set_progress(&self, current: u64, maximum: u64) {
        let mut s = self.state();
        s.maximum = maximum.max(1);
        s.current = current.min(s.maximum);
    }

    pub fn set_prefix_label(&self, text: impl Into<String>) {
        let text = text.into();
        self.state().prefix = text;
    }

    pub fn set_status_label(&self, text: impl Into<String>) {
        let text = text.into();
        self.state().status = text;
    }

    pub fn snapshot(&self) -> TrackerSnapshot {
        self.state().clone()
    }
}

/// Receives byte-level sub-progress while one item is transferred.
pub trait ProgressSink: Sync {
    /// `now` bytes of `total` transferred. `total == 0` means unknown and is ignored.
    fn transferred(&self, now: u64, total: u64);

    /// Name of what is currently being transferred (e.g. `"<hash>.png"`).
    fn label(&self, _text: &str) {}
}

impl ProgressSink for ProgressTracker {
    fn transferred(&self, now: u64, total: u64) {
        if total == 0 {
            return;
        }
        self.set_progress(now, total);
        self.set_status_label(format_megabytes(now, total));
    }

    fn label(&self, text: &str) {
        self.set_prefix_label(text);
    }
}

/// `"  1.2 /   3.4 MB"`
pub fn format_megabytes(now: u64, total: u64) -> String {
    format!(
        "{:5.1} / {:5.1} MB",
        now as f64 / BYTES_PER_MB,
        total as f64 / BYTES_PER_MB
    )
}

/// Everything the reporter shows in one redraw.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Frame {
    /// Items waiting in the queue when the frame was taken.
    pub queued: usize,
    pub discoverer: TrackerSnapshot,
    pub fetchers: Vec<TrackerSnapshot>,
}

/// Draws frames. Only the reporter thread calls into a renderer.
pub trait Renderer: Send {
    fn draw(&mut self, frame: &Frame);

    /// Last frame of the run; leave the terminal in a clean state afterwards.
    fn finish(&mut self, frame: &Frame) {
        self.draw(frame);
    }
}

/// Renders nothing (quiet mode).
#[derive(Debug, Default)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn draw(&mut self, _frame: &Frame) {}
}

/// One kdam bar per tracker, stacked at fixed positions so every redraw overwrites the
/// previous frame in place.
#[derive(Default)]
pub struct TerminalRenderer {
    bars: Vec<Bar>,
}

fn create_line(position: u16) -> Bar {
    kdam::tqdm!(
        total = 1,
        position = position,
        animation = Animation::Classic,
        leave = true
    )
}

fn pad_label(text: &str) -> String {
    format!("{:<width$}", text, width = PipelineConsts::LABEL_WIDTH)
}

fn apply_snapshot(bar: &mut Bar, snap: &TrackerSnapshot, status: String) {
    bar.total = snap.maximum as usize;
    bar.set_description(pad_label(&snap.prefix));
    bar.set_postfix(status);
    let _ = bar.update_to(snap.current as usize);
    let _ = bar.refresh();
}

impl TerminalRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    fn ensure_lines(&mut self, count: usize) {
        while self.bars.len() < count {
            let position = self.bars.len() as u16;
            self.bars.push(create_line(position));
        }
    }
}

impl Renderer for TerminalRenderer {
    fn draw(&mut self, frame: &Frame) {
        self.ensure_lines(frame.fetchers.len() + 1);
        let discoverer_status = format!("{} | queued {}", frame.discoverer.status, frame.queued);
        apply_snapshot(&mut self.bars[0], &frame.discoverer, discoverer_status);
        for (bar, snap) in self.bars[1..].iter_mut().zip(&frame.fetchers) {
            apply_snapshot(bar, snap, snap.status.clone());
        }
    }

    fn finish(&mut self, frame: &Frame) {
        self.draw(frame);
        // Move the cursor below the stacked bars so later log lines don't overwrite them.
        eprint!("{}", "\n".repeat(self.bars.len()));
    }
}
