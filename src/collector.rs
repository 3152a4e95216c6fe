use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::thread;
use std::time::Duration;

use crate::cancel::CancelToken;
use crate::errors::{CollectorError, Result};
use crate::sink::{ProducerHandle, ProgressSink, SinkStatus};
use crate::window::{BatchStart, RowWindow};

/// How often the waiting caller re-checks the finished flag and the
/// cancellation token. Bounded latency in exchange for not needing a
/// blocking notification channel from the producer.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Accumulation state touched only under the mutex.
struct SinkState<T> {
    rows: Vec<T>,
    total_seen: u64,
    error: Option<String>,
}

/// Bridges an asynchronous push-based producer to a synchronous caller.
///
/// The producer pushes item batches via [`push_batch`] and a terminal
/// status via [`set_status`] from its own thread; a single caller
/// thread blocks in [`wait_for_finish`] until the offset/limit window
/// is satisfied, the producer terminates, or the caller cancels, then
/// takes the retained items with [`take_rows`].
///
/// Once the window is satisfied the collector unsubscribes itself from
/// the producer so no further data is pushed; late deliveries that
/// arrive anyway are ignored.
///
/// [`push_batch`]: WindowedCollector::push_batch
/// [`set_status`]: WindowedCollector::set_status
/// [`wait_for_finish`]: WindowedCollector::wait_for_finish
/// [`take_rows`]: WindowedCollector::take_rows
pub struct WindowedCollector<T, P: ProducerHandle> {
    producer: P,
    window: RowWindow,
    progress: Option<Box<dyn ProgressSink>>,
    state: Mutex<SinkState<T>>,
    finished: AtomicBool,
    unsubscribed: AtomicBool,
}

impl<T, P: ProducerHandle> WindowedCollector<T, P> {
    pub fn new(producer: P, window: RowWindow) -> Self {
        Self {
            producer,
            window,
            progress: None,
            state: Mutex::new(SinkState {
                rows: Vec::new(),
                total_seen: 0,
                error: None,
            }),
            finished: AtomicBool::new(false),
            unsubscribed: AtomicBool::new(false),
        }
    }

    /// Attach a progress sink that receives a row count message after
    /// every delivered batch.
    pub fn with_progress(mut self, progress: Box<dyn ProgressSink>) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Receive a batch of items from the producer thread.
    ///
    /// Applies the window, appends the in-window items in arrival
    /// order and advances the seen-items counter. A no-op once the
    /// collector is finished, so late or duplicate deliveries after an
    /// early stop are harmless.
    pub fn push_batch(&self, items: Vec<T>) {
        if self.finished.load(Ordering::Acquire) {
            return;
        }

        let mut stop = false;
        let loaded = {
            let mut state = self.state.lock().unwrap();
            match self
                .window
                .locate(items.len() as u64, state.total_seen)
            {
                BatchStart::All => {
                    state.total_seen += items.len() as u64;
                    state.rows.extend(items);
                }
                BatchStart::BeforeWindow => {
                    state.total_seen += items.len() as u64;
                }
                BatchStart::At(start) => {
                    state.total_seen += start as u64;
                    for item in items.into_iter().skip(start) {
                        if self.window.is_full(state.rows.len() as u64) {
                            stop = true;
                            break;
                        }
                        state.rows.push(item);
                        state.total_seen += 1;
                    }
                    if self.window.is_full(state.rows.len() as u64) {
                        stop = true;
                    }
                }
            }
            state.rows.len()
        };

        if stop {
            // The window is satisfied, no more data is needed.
            log::debug!("window satisfied after {} rows", loaded);
            self.finished.store(true, Ordering::Release);
            self.unsubscribe();
        }

        if let Some(progress) = &self.progress {
            progress.report(&format!("{} rows loaded", loaded));
        }
    }

    /// Receive the stream status from the producer thread.
    ///
    /// `Complete` and `Error` finish the collector; `Running` is
    /// ignored. Idempotent: once finished, later statuses change
    /// nothing.
    pub fn set_status(&self, status: SinkStatus) {
        if self.finished.load(Ordering::Acquire) {
            return;
        }
        match status {
            SinkStatus::Running => {}
            SinkStatus::Complete => {
                self.finished.store(true, Ordering::Release);
            }
            SinkStatus::Error(message) => {
                self.state.lock().unwrap().error = Some(message);
                self.finished.store(true, Ordering::Release);
            }
        }
    }

    /// Block the caller thread until the collector finishes or the
    /// token is cancelled, polling at a bounded interval.
    ///
    /// On cancellation the collector finishes itself, unsubscribes
    /// from the producer and returns [`CollectorError::Cancelled`];
    /// items accumulated so far stay retrievable. A producer-reported
    /// failure surfaces as [`CollectorError::Producer`].
    pub fn wait_for_finish(&self, cancel: &CancelToken) -> Result<()> {
        while !self.finished.load(Ordering::Acquire) {
            if cancel.is_cancelled() {
                self.finished.store(true, Ordering::Release);
                self.unsubscribe();
                return Err(CollectorError::Cancelled);
            }
            thread::sleep(POLL_INTERVAL);
        }

        let error = self.state.lock().unwrap().error.clone();
        match error {
            Some(message) => Err(CollectorError::Producer(message)),
            None => Ok(()),
        }
    }

    /// Move the accumulated items out of the collector.
    pub fn take_rows(&self) -> Vec<T> {
        std::mem::take(&mut self.state.lock().unwrap().rows)
    }

    /// Number of items currently retained.
    pub fn row_count(&self) -> usize {
        self.state.lock().unwrap().rows.len()
    }

    /// Number of items the producer has delivered so far, including
    /// those skipped by the window.
    pub fn total_seen(&self) -> u64 {
        self.state.lock().unwrap().total_seen
    }

    pub fn is_finished(&self) -> bool {
        self.finished.load(Ordering::Acquire)
    }

    /// Ask the producer to stop pushing, at most once. The window is
    /// already satisfied when this runs, so a failure cannot affect
    /// the caller's result and is only logged.
    fn unsubscribe(&self) {
        if self.unsubscribed.swap(true, Ordering::AcqRel) {
            return;
        }
        if let Err(e) = self.producer.unsubscribe() {
            log::warn!("failed to unsubscribe from producer: {}", e);
        }
    }
}
