//! Closeable blocking FIFO connecting the discoverer to the fetcher pool.
//!
//! Built on an unbounded crossbeam channel. The queue keeps the only [`Sender`] behind a mutex;
//! closing takes and drops it, which disconnects the channel and wakes every receiver blocked in
//! `recv`. Receivers keep draining buffered items after disconnect and only then see an error,
//! which is exactly "closed and empty".

use crossbeam_channel::{Receiver, SendError, Sender, unbounded};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

pub struct BlockingQueue<T> {
    tx: Mutex<Option<Sender<T>>>,
    rx: Receiver<T>,
    closed: AtomicBool,
}

impl<T> Default for BlockingQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> BlockingQueue<T> {
    pub fn new() -> Self {
        let (tx, rx) = unbounded();
        Self {
            tx: Mutex::new(Some(tx)),
            rx,
            closed: AtomicBool::new(false),
        }
    }

    /// Append `item` at the tail and wake one waiting popper.
    ///
    /// Fails with the item handed back once the queue is closed; nothing is enqueued.
    pub fn push(&self, item: T) -> Result<(), SendError<T>> {
        let guard = self.tx.lock().unwrap_or_else(|e| e.into_inner());
        match guard.as_ref() {
            // Unbounded send never blocks, so holding the lock here cannot stall a popper.
            Some(tx) => tx.send(item),
            None => Err(SendError(item)),
        }
    }

    /// Block until an item is available or the queue is closed and drained.
    ///
    /// Returns `None` (end of stream) only when closed *and* empty. Items pushed before
    /// `close` are always delivered first.
    pub fn pop(&self) -> Option<T> {
        self.rx.recv().ok()
    }

    /// Mark closed and wake every blocked popper. Idempotent.
    pub fn close(&self) {
        let sender = self
            .tx
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take();
        self.closed.store(true, Ordering::Release);
        // Dropping the last sender disconnects the channel: all blocked `recv` calls return.
        drop(sender);
    }

    /// Snapshot for display only; racy by nature.
    pub fn len(&self) -> usize {
        self.rx.len()
    }

    /// Snapshot for display only; racy by nature.
    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// True once closed and empty: every future `pop` returns `None`.
    pub fn is_drained(&self) -> bool {
        self.is_closed() && self.is_empty()
    }
}
