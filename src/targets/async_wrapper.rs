//! Asynchronous target wrapper
//!
//! [`AsyncTargetWrapper`] puts a bounded queue and a worker thread in front
//! of another target. Writes return as soon as the event is queued; the
//! worker drains the queue in batches. When the queue is full the
//! configured [`OverflowPolicy`] applies, except for Error and Fatal events
//! which are written synchronously instead of being dropped.

use crate::core::logger::panic_message;
use crate::core::{
    LogEvent, LogLevel, OverflowCallback, OverflowPolicy, Result, RouterError, Target, TargetRef,
};
use crossbeam_channel::{bounded, Receiver, SendTimeoutError, Sender, TrySendError};
use parking_lot::{Mutex, RwLock};
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Default time to wait for the worker to drain when the wrapper is dropped
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// Default queue capacity
pub const DEFAULT_QUEUE_CAPACITY: usize = 10_000;

const BATCH_SIZE: usize = 50;
const BATCH_TIMEOUT_MS: u64 = 10;

/// Counters for an [`AsyncTargetWrapper`]
///
/// Each `record_*` method returns the value before the increment.
#[derive(Debug, Default)]
pub struct AsyncTargetMetrics {
    enqueued: AtomicU64,
    written: AtomicU64,
    write_failures: AtomicU64,
    dropped: AtomicU64,
    queue_full_events: AtomicU64,
    block_events: AtomicU64,
    critical_preserved: AtomicU64,
}

impl AsyncTargetMetrics {
    pub const fn new() -> Self {
        Self {
            enqueued: AtomicU64::new(0),
            written: AtomicU64::new(0),
            write_failures: AtomicU64::new(0),
            dropped: AtomicU64::new(0),
            queue_full_events: AtomicU64::new(0),
            block_events: AtomicU64::new(0),
            critical_preserved: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn enqueued(&self) -> u64 {
        self.enqueued.load(Ordering::Relaxed)
    }

    /// Events the wrapped target accepted, queued or synchronous
    #[inline]
    pub fn written(&self) -> u64 {
        self.written.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn write_failures(&self) -> u64 {
        self.write_failures.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn dropped_count(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn queue_full_events(&self) -> u64 {
        self.queue_full_events.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn block_events(&self) -> u64 {
        self.block_events.load(Ordering::Relaxed)
    }

    /// Error/Fatal events written synchronously because the queue was full
    #[inline]
    pub fn critical_preserved(&self) -> u64 {
        self.critical_preserved.load(Ordering::Relaxed)
    }

    /// Dropped events as a percentage of everything offered
    pub fn drop_rate(&self) -> f64 {
        let dropped = self.dropped_count();
        let total = self.written() + self.write_failures() + dropped;
        if total == 0 {
            0.0
        } else {
            (dropped as f64 / total as f64) * 100.0
        }
    }

    #[inline]
    fn record_enqueued(&self) -> u64 {
        self.enqueued.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    fn record_written(&self) -> u64 {
        self.written.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    fn record_write_failure(&self) -> u64 {
        self.write_failures.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    fn record_dropped(&self) -> u64 {
        self.dropped.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    fn record_queue_full(&self) -> u64 {
        self.queue_full_events.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    fn record_block(&self) -> u64 {
        self.block_events.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    fn record_critical_preserved(&self) -> u64 {
        self.critical_preserved.fetch_add(1, Ordering::Relaxed)
    }
}

/// State shared between the wrapper and its worker thread
struct WorkerShared {
    inner: TargetRef,
    metrics: AsyncTargetMetrics,
    // Events queued or in a batch but not yet handed to `inner`
    pending: AtomicUsize,
}

impl WorkerShared {
    fn write_one(&self, event: &LogEvent) -> Result<()> {
        let result = match catch_unwind(AssertUnwindSafe(|| self.inner.write(event))) {
            Ok(result) => result,
            Err(panic_info) => {
                let panic_msg = panic_message(panic_info.as_ref());
                eprintln!(
                    "[LOGGER CRITICAL] Target '{}' panicked in async worker: {}",
                    self.inner.name(),
                    panic_msg
                );
                Err(RouterError::target(self.inner.name(), format!("panicked: {}", panic_msg)))
            }
        };

        match &result {
            Ok(()) => {
                self.metrics.record_written();
            }
            Err(_) => {
                self.metrics.record_write_failure();
            }
        }
        result
    }

    fn process_batch(&self, batch: &[LogEvent]) {
        for event in batch {
            if let Err(e) = self.write_one(event) {
                eprintln!("[LOGGER ERROR] Async target '{}' write failed: {}", self.inner.name(), e);
            }
        }
        self.pending.fetch_sub(batch.len(), Ordering::AcqRel);
    }

    fn run(&self, receiver: Receiver<LogEvent>) {
        let mut batch = Vec::with_capacity(BATCH_SIZE);

        loop {
            match receiver.recv() {
                Ok(event) => batch.push(event),
                Err(_) => break,
            }

            while batch.len() < BATCH_SIZE {
                match receiver.try_recv() {
                    Ok(event) => batch.push(event),
                    Err(_) => break,
                }
            }

            if batch.len() < BATCH_SIZE {
                // Small batch: give producers a moment to fill it
                thread::sleep(Duration::from_millis(BATCH_TIMEOUT_MS));
                while batch.len() < BATCH_SIZE {
                    match receiver.try_recv() {
                        Ok(event) => batch.push(event),
                        Err(_) => break,
                    }
                }
            }

            self.process_batch(&batch);
            batch.clear();
        }
    }
}

/// Makes any target asynchronous.
///
/// # Example
///
/// ```
/// use rust_log_router::prelude::*;
/// use rust_log_router::targets::AsyncTargetWrapper;
/// use std::sync::Arc;
///
/// let memory = Arc::new(MemoryTarget::new("memory"));
/// let wrapper = AsyncTargetWrapper::builder(memory.clone())
///     .capacity(1000)
///     .overflow_policy(OverflowPolicy::Block)
///     .on_overflow(Arc::new(|dropped: u64| eprintln!("ALERT: {} events dropped", dropped)))
///     .build();
///
/// wrapper.write(&LogEvent::new("App", LogLevel::Info, "queued")).unwrap();
/// wrapper.flush().unwrap();
/// assert_eq!(memory.messages(), vec!["queued".to_string()]);
/// ```
pub struct AsyncTargetWrapper {
    name: String,
    capacity: usize,
    shared: Arc<WorkerShared>,
    sender: RwLock<Option<Sender<LogEvent>>>,
    worker: Mutex<Option<thread::JoinHandle<()>>>,
    overflow_policy: OverflowPolicy,
    on_overflow: Option<OverflowCallback>,
}

impl AsyncTargetWrapper {
    /// Wrap `inner` with the default capacity and overflow policy
    pub fn new(inner: TargetRef) -> Self {
        Self::builder(inner).build()
    }

    pub fn builder(inner: TargetRef) -> AsyncTargetWrapperBuilder {
        AsyncTargetWrapperBuilder::new(inner)
    }

    fn spawn(
        name: String,
        inner: TargetRef,
        capacity: usize,
        overflow_policy: OverflowPolicy,
        on_overflow: Option<OverflowCallback>,
    ) -> Self {
        let capacity = capacity.max(1);
        let (sender, receiver) = bounded(capacity);
        let shared = Arc::new(WorkerShared {
            inner,
            metrics: AsyncTargetMetrics::new(),
            pending: AtomicUsize::new(0),
        });

        let worker_shared = Arc::clone(&shared);
        let spawned = thread::Builder::new()
            .name(format!("async-target-{}", name))
            .spawn(move || worker_shared.run(receiver));

        let (sender, worker) = match spawned {
            Ok(handle) => (Some(sender), Some(handle)),
            Err(e) => {
                eprintln!(
                    "[LOGGER ERROR] Failed to spawn worker for '{}': {}. Writing synchronously.",
                    name, e
                );
                (None, None)
            }
        };

        Self {
            name,
            capacity,
            shared,
            sender: RwLock::new(sender),
            worker: Mutex::new(worker),
            overflow_policy,
            on_overflow,
        }
    }

    pub fn inner(&self) -> &TargetRef {
        &self.shared.inner
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn overflow_policy(&self) -> &OverflowPolicy {
        &self.overflow_policy
    }

    pub fn metrics(&self) -> &AsyncTargetMetrics {
        &self.shared.metrics
    }

    /// Events accepted but not yet written
    pub fn pending(&self) -> usize {
        self.shared.pending.load(Ordering::Acquire)
    }

    /// Queue `event` without applying the overflow policy
    pub fn try_enqueue(&self, event: &LogEvent) -> Result<()> {
        let guard = self.sender.read();
        let Some(sender) = guard.as_ref() else {
            return Err(RouterError::ChannelSendError);
        };

        self.shared.pending.fetch_add(1, Ordering::AcqRel);
        match sender.try_send(event.clone()) {
            Ok(()) => {
                self.shared.metrics.record_enqueued();
                Ok(())
            }
            Err(TrySendError::Full(_)) => {
                self.shared.pending.fetch_sub(1, Ordering::AcqRel);
                Err(RouterError::queue_full(sender.len(), self.capacity))
            }
            Err(TrySendError::Disconnected(_)) => {
                self.shared.pending.fetch_sub(1, Ordering::AcqRel);
                Err(RouterError::ChannelSendError)
            }
        }
    }

    fn handle_overflow(&self, sender: &Sender<LogEvent>, event: LogEvent) -> Result<()> {
        self.shared.metrics.record_queue_full();

        // Error and Fatal are never dropped
        if event.level >= LogLevel::Error {
            self.shared.metrics.record_critical_preserved();
            return self.shared.write_one(&event);
        }

        match &self.overflow_policy {
            OverflowPolicy::DropNewest => {
                self.shared.metrics.record_dropped();
                Ok(())
            }

            OverflowPolicy::Block => {
                self.shared.metrics.record_block();
                self.send_blocking(sender, event, None)
            }

            OverflowPolicy::BlockWithTimeout(timeout) => {
                self.shared.metrics.record_block();
                self.send_blocking(sender, event, Some(*timeout))
            }

            OverflowPolicy::AlertAndDrop => {
                self.alert_and_drop();
                Ok(())
            }
        }
    }

    fn send_blocking(
        &self,
        sender: &Sender<LogEvent>,
        event: LogEvent,
        timeout: Option<Duration>,
    ) -> Result<()> {
        self.shared.pending.fetch_add(1, Ordering::AcqRel);
        let sent = match timeout {
            None => sender.send(event).map_err(|_| SendTimeoutError::Disconnected(())),
            Some(timeout) => sender.send_timeout(event, timeout).map_err(|e| match e {
                SendTimeoutError::Timeout(_) => SendTimeoutError::Timeout(()),
                SendTimeoutError::Disconnected(_) => SendTimeoutError::Disconnected(()),
            }),
        };

        match sent {
            Ok(()) => {
                self.shared.metrics.record_enqueued();
                Ok(())
            }
            Err(SendTimeoutError::Timeout(())) => {
                self.shared.pending.fetch_sub(1, Ordering::AcqRel);
                self.alert_and_drop();
                Ok(())
            }
            Err(SendTimeoutError::Disconnected(())) => {
                self.shared.pending.fetch_sub(1, Ordering::AcqRel);
                Err(RouterError::ChannelSendError)
            }
        }
    }

    fn alert_and_drop(&self) {
        let dropped_count = self.shared.metrics.record_dropped();

        // Alert on first drop and every 1000th thereafter
        let should_alert = dropped_count == 0 || (dropped_count + 1) % 1000 == 0;

        if should_alert {
            eprintln!(
                "[LOGGER WARNING] Queue of '{}' full, {} events dropped. \
                 Consider increasing capacity or using a different overflow policy.",
                self.name,
                dropped_count + 1
            );

            if let Some(ref callback) = self.on_overflow {
                callback(dropped_count + 1);
            }
        }
    }

    fn wait_for_drain(&self, timeout: Duration) -> bool {
        let start = Instant::now();
        while self.pending() > 0 {
            if start.elapsed() >= timeout {
                return false;
            }
            thread::sleep(Duration::from_millis(1));
        }
        true
    }

    /// Stop accepting queued writes, drain the queue and join the worker.
    ///
    /// Returns `false` if the worker did not finish within `timeout` or
    /// panicked. Writes after shutdown go straight to the wrapped target.
    pub fn shutdown(&self, timeout: Duration) -> bool {
        drop(self.sender.write().take());

        let mut finished = true;
        if let Some(handle) = self.worker.lock().take() {
            let start = Instant::now();

            loop {
                if handle.is_finished() {
                    if let Err(e) = handle.join() {
                        eprintln!(
                            "[LOGGER ERROR] Async worker for '{}' panicked during shutdown: {:?}",
                            self.name, e
                        );
                        finished = false;
                    }
                    break;
                }

                if start.elapsed() >= timeout {
                    eprintln!(
                        "[LOGGER WARNING] Async worker for '{}' did not finish within {:?}. \
                         Some events may be lost.",
                        self.name, timeout
                    );
                    finished = false;
                    break;
                }

                thread::sleep(Duration::from_millis(10));
            }
        }

        if let Err(e) = self.shared.inner.flush() {
            eprintln!("[LOGGER ERROR] Failed to flush '{}' during shutdown: {}", self.name, e);
            return false;
        }

        finished
    }
}

impl Target for AsyncTargetWrapper {
    fn write(&self, event: &LogEvent) -> Result<()> {
        let guard = self.sender.read();
        let Some(sender) = guard.as_ref() else {
            return self.shared.write_one(event);
        };

        self.shared.pending.fetch_add(1, Ordering::AcqRel);
        match sender.try_send(event.clone()) {
            Ok(()) => {
                self.shared.metrics.record_enqueued();
                Ok(())
            }
            Err(TrySendError::Full(event)) => {
                self.shared.pending.fetch_sub(1, Ordering::AcqRel);
                self.handle_overflow(sender, event)
            }
            Err(TrySendError::Disconnected(_)) => {
                self.shared.pending.fetch_sub(1, Ordering::AcqRel);
                Err(RouterError::ChannelSendError)
            }
        }
    }

    /// Wait for queued events to reach the wrapped target, then flush it
    fn flush(&self) -> Result<()> {
        if !self.wait_for_drain(DEFAULT_SHUTDOWN_TIMEOUT) {
            return Err(RouterError::target(
                &self.name,
                format!("{} events still queued after {:?}", self.pending(), DEFAULT_SHUTDOWN_TIMEOUT),
            ));
        }
        self.shared.inner.flush()
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl Drop for AsyncTargetWrapper {
    fn drop(&mut self) {
        self.shutdown(DEFAULT_SHUTDOWN_TIMEOUT);

        let dropped = self.shared.metrics.dropped_count();
        if dropped > 0 {
            eprintln!(
                "[LOGGER WARNING] Async target '{}' shutting down with {} dropped events (drop rate: {:.2}%)",
                self.name,
                dropped,
                self.shared.metrics.drop_rate()
            );
        }
    }
}

impl fmt::Debug for AsyncTargetWrapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsyncTargetWrapper")
            .field("name", &self.name)
            .field("inner", &self.shared.inner.name())
            .field("capacity", &self.capacity)
            .field("overflow_policy", &self.overflow_policy)
            .field("pending", &self.pending())
            .finish()
    }
}

/// Builder for [`AsyncTargetWrapper`]
#[must_use = "builder methods return a new value"]
pub struct AsyncTargetWrapperBuilder {
    inner: TargetRef,
    name: Option<String>,
    capacity: usize,
    overflow_policy: OverflowPolicy,
    on_overflow: Option<OverflowCallback>,
}

impl AsyncTargetWrapperBuilder {
    pub fn new(inner: TargetRef) -> Self {
        Self {
            inner,
            name: None,
            capacity: DEFAULT_QUEUE_CAPACITY,
            overflow_policy: OverflowPolicy::default(),
            on_overflow: None,
        }
    }

    /// Defaults to the wrapped target's name
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn overflow_policy(mut self, policy: OverflowPolicy) -> Self {
        self.overflow_policy = policy;
        self
    }

    /// Called with the total drop count on the first drop and every 1000th after
    pub fn on_overflow(mut self, callback: OverflowCallback) -> Self {
        self.on_overflow = Some(callback);
        self
    }

    pub fn build(self) -> AsyncTargetWrapper {
        let name = self
            .name
            .unwrap_or_else(|| self.inner.name().to_string());
        AsyncTargetWrapper::spawn(
            name,
            self.inner,
            self.capacity,
            self.overflow_policy,
            self.on_overflow,
        )
    }
}
