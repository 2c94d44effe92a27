use gelfetch::engine::progress::{ProgressSink, ProgressTracker, format_megabytes};
use std::sync::Arc;
use std::thread;

// --- counters ---

#[test]
fn test_new_tracker_is_empty() {
    let s = ProgressTracker::new().snapshot();
    assert_eq!(s.current, 0);
    assert_eq!(s.maximum, 1);
    assert!(s.prefix.is_empty());
    assert!(s.status.is_empty());
}

#[test]
fn test_current_clamped_to_maximum() {
    let t = ProgressTracker::new();
    t.set_maximum(10);
    t.set_current(25);
    assert_eq!(t.snapshot().current, 10);
}

#[test]
fn test_lowering_maximum_reclamps_current() {
    let t = ProgressTracker::new();
    t.set_progress(8, 10);
    t.set_maximum(5);
    let s = t.snapshot();
    assert_eq!((s.current, s.maximum), (5, 5));
}

#[test]
fn test_zero_maximum_becomes_one() {
    let t = ProgressTracker::new();
    t.set_maximum(0);
    assert_eq!(t.snapshot().maximum, 1);
    t.set_progress(3, 0);
    let s = t.snapshot();
    assert_eq!((s.current, s.maximum), (1, 1));
}

#[test]
fn test_percent_of_half() {
    let t = ProgressTracker::new();
    t.set_progress(21, 42);
    assert_eq!(t.snapshot().percent(), 50);
}

// --- labels ---

#[test]
fn test_labels_replace_previous_text() {
    let t = ProgressTracker::with_prefix("Fetcher   0");
    t.set_status_label("Starting");
    t.set_status_label("Exists");
    let s = t.snapshot();
    assert_eq!(s.prefix, "Fetcher   0");
    assert_eq!(s.status, "Exists");
}

#[test]
fn test_sink_label_sets_prefix() {
    let t = ProgressTracker::new();
    ProgressSink::label(&t, "abcd.png");
    assert_eq!(t.snapshot().prefix, "abcd.png");
}

#[test]
fn test_megabytes_format() {
    assert_eq!(format_megabytes(1024 * 1024, 3 * 1024 * 1024), "  1.0 /   3.0 MB");
}

// --- concurrent writer and reader ---

#[test]
fn test_reader_always_sees_clamped_snapshot() {
    let t = Arc::new(ProgressTracker::new());
    let writer = {
        let t = Arc::clone(&t);
        thread::spawn(move || {
            for i in 1..=5_000u64 {
                t.set_progress(i, 1 + i % 7);
                t.set_status_label(format!("step {i}"));
            }
        })
    };
    for _ in 0..5_000 {
        let s = t.snapshot();
        assert!(s.maximum >= 1);
        assert!(s.current <= s.maximum);
    }
    writer.join().unwrap();
    assert_eq!(t.snapshot().status, "step 5000");
}
