//! Size/timeout-triggered buffering in front of an NDJSON destination.
//!
//! The sink holds serialized records in memory and drains them to its
//! destination when either
//! - an append brings the buffer to `flush_size` (flushed synchronously, on
//!   the appending thread), or
//! - `flush_timeout` elapses after the last append.
//!
//! One timer task lives as long as the sink. Each non-flushing append moves
//! the flush deadline to `now + flush_timeout`; the task sleeps until the
//! deadline and re-checks it on waking, so a deadline that moved or was
//! cleared by another flush never triggers a write.
//!
//! Flushing swaps the buffer for an empty one and takes the destination lock
//! before releasing the buffer lock. Appends may proceed into the fresh buffer
//! while lines are written, and flush cycles still reach the destination in
//! order.

use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use parking_lot::{Mutex, MutexGuard};
use tokio::runtime::Handle;
use tokio::sync::Notify;
use tokio::task::AbortHandle;
use tokio::time::Instant;

use crate::error::LogError;

/// Default number of buffered records that forces a flush.
pub const DEFAULT_FLUSH_SIZE: usize = 10;
/// Default idle time after the last append before a flush.
pub const DEFAULT_FLUSH_TIMEOUT: Duration = Duration::from_millis(5000);

/// Flush triggers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlushPolicy {
    pub flush_size: usize,
    pub flush_timeout: Duration,
}

impl Default for FlushPolicy {
    fn default() -> Self {
        Self {
            flush_size: DEFAULT_FLUSH_SIZE,
            flush_timeout: DEFAULT_FLUSH_TIMEOUT,
        }
    }
}

/// Why a flush ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FlushCause {
    Threshold,
    Timeout,
    Explicit,
}

/// Point-in-time copy of the sink counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SinkStats {
    /// Records accepted by `append`.
    pub appended: u64,
    /// Flush cycles that drained at least one record.
    pub flushes: u64,
    /// Records handed to the destination.
    pub flushed_records: u64,
    /// Destination writes that failed.
    pub write_errors: u64,
}

#[derive(Default)]
struct Counters {
    appended: AtomicU64,
    flushes: AtomicU64,
    flushed_records: AtomicU64,
    write_errors: AtomicU64,
}

struct BufferState {
    lines: Vec<String>,
    /// When the timer task should flush; `None` while disarmed.
    deadline: Option<Instant>,
}

struct Shared {
    buffer: Mutex<BufferState>,
    destination: Mutex<Box<dyn Write + Send>>,
    /// Wakes the timer task when a deadline is armed from idle.
    armed: Notify,
    counters: Counters,
}

/// Buffered NDJSON sink.
///
/// Dropping the sink performs a final flush; [`close`](Self::close) does the
/// same explicitly.
pub struct BufferedSink {
    shared: Arc<Shared>,
    policy: FlushPolicy,
    timer: AbortHandle,
}

impl BufferedSink {
    /// Open `path` for appending and buffer in front of it.
    ///
    /// The containing directory must already exist.
    pub fn open(path: impl AsRef<Path>, policy: FlushPolicy) -> Result<Self, LogError> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|source| LogError::DestinationUnavailable {
                path: path.to_path_buf(),
                source,
            })?;
        Self::with_writer(BufWriter::new(file), policy)
    }

    /// Buffer in front of an arbitrary writer.
    ///
    /// Must be called from within a tokio runtime; the timer task runs on it.
    pub fn with_writer(
        writer: impl Write + Send + 'static,
        policy: FlushPolicy,
    ) -> Result<Self, LogError> {
        let runtime = Handle::try_current().map_err(|_| LogError::NoRuntime)?;
        let policy = FlushPolicy {
            flush_size: policy.flush_size.max(1),
            ..policy
        };
        let shared = Arc::new(Shared {
            buffer: Mutex::new(BufferState {
                lines: Vec::with_capacity(policy.flush_size),
                deadline: None,
            }),
            destination: Mutex::new(Box::new(writer)),
            armed: Notify::new(),
            counters: Counters::default(),
        });
        let timer = runtime
            .spawn(Arc::clone(&shared).run_timer())
            .abort_handle();
        Ok(Self {
            shared,
            policy,
            timer,
        })
    }

    pub fn policy(&self) -> FlushPolicy {
        self.policy
    }

    /// Buffer one serialized record. Never fails; the record is in memory
    /// once this returns.
    pub fn append(&self, line: String) {
        let mut state = self.shared.buffer.lock();
        state.lines.push(line);
        self.shared.counters.appended.fetch_add(1, Ordering::Relaxed);

        if state.lines.len() >= self.policy.flush_size {
            self.shared.drain(state, FlushCause::Threshold);
            return;
        }

        let was_idle = state
            .deadline
            .replace(Instant::now() + self.policy.flush_timeout)
            .is_none();
        drop(state);
        // A running sleep picks up a later deadline when it wakes.
        if was_idle {
            self.shared.armed.notify_one();
        }
    }

    /// Drain whatever is buffered now.
    pub fn flush(&self) {
        let state = self.shared.buffer.lock();
        self.shared.drain(state, FlushCause::Explicit);
    }

    /// Final flush, then flush the destination itself.
    pub fn close(self) {
        // Drop does the work.
        drop(self);
    }

    /// Records currently buffered.
    pub fn pending(&self) -> usize {
        self.shared.buffer.lock().lines.len()
    }

    /// Whether a timeout flush is armed.
    pub fn has_pending_timer(&self) -> bool {
        self.shared.buffer.lock().deadline.is_some()
    }

    pub fn stats(&self) -> SinkStats {
        let c = &self.shared.counters;
        SinkStats {
            appended: c.appended.load(Ordering::Relaxed),
            flushes: c.flushes.load(Ordering::Relaxed),
            flushed_records: c.flushed_records.load(Ordering::Relaxed),
            write_errors: c.write_errors.load(Ordering::Relaxed),
        }
    }
}

impl Drop for BufferedSink {
    fn drop(&mut self) {
        self.timer.abort();
        let state = self.shared.buffer.lock();
        self.shared.drain(state, FlushCause::Explicit);
        if let Err(e) = self.shared.destination.lock().flush() {
            self.shared
                .counters
                .write_errors
                .fetch_add(1, Ordering::Relaxed);
            tracing::error!(error = %e, "failed to flush log destination on close");
        }
    }
}

impl Shared {
    /// The timer task: one reusable `Sleep`, reset to each new deadline.
    async fn run_timer(self: Arc<Self>) {
        let sleep = tokio::time::sleep(Duration::ZERO);
        tokio::pin!(sleep);
        loop {
            let deadline = self.buffer.lock().deadline;
            match deadline {
                None => self.armed.notified().await,
                Some(deadline) => {
                    sleep.as_mut().reset(deadline);
                    tokio::select! {
                        () = &mut sleep => self.flush_if_due(),
                        () = self.armed.notified() => {}
                    }
                }
            }
        }
    }

    /// Flush if the armed deadline has passed. A deadline that moved or was
    /// cleared since the timer went to sleep is left alone.
    fn flush_if_due(&self) {
        let state = self.buffer.lock();
        if state.deadline.is_some_and(|d| d <= Instant::now()) {
            self.drain(state, FlushCause::Timeout);
        }
    }

    /// Swap out the buffer, disarm the timer, and write the drained lines in
    /// order. Consumes the buffer guard so the buffer is unlocked while
    /// writing.
    fn drain(&self, mut state: MutexGuard<'_, BufferState>, cause: FlushCause) {
        state.deadline = None;
        if state.lines.is_empty() {
            return;
        }
        let lines = std::mem::take(&mut state.lines);
        let mut destination = self.destination.lock();
        drop(state);

        tracing::debug!(records = lines.len(), ?cause, "flushing log buffer");

        let mut failed = 0u64;
        for line in &lines {
            if let Err(e) = writeln!(destination, "{line}") {
                failed += 1;
                tracing::error!(error = %e, "failed to write log record");
            }
        }
        if let Err(e) = destination.flush() {
            failed += 1;
            tracing::error!(error = %e, "failed to flush log destination");
        }

        let c = &self.counters;
        c.flushes.fetch_add(1, Ordering::Relaxed);
        c.flushed_records
            .fetch_add(lines.len() as u64, Ordering::Relaxed);
        if failed > 0 {
            c.write_errors.fetch_add(failed, Ordering::Relaxed);
        }
    }
}

/// In-memory destination shared between a sink and its observer.
///
/// Each `flush` on the writer marks the end of one flush cycle, so tests and
/// embedders can see exactly which lines were written together.
#[derive(Debug, Clone, Default)]
pub struct MemoryDestination {
    inner: Arc<Mutex<MemoryState>>,
}

#[derive(Debug, Default)]
struct MemoryState {
    pending: Vec<u8>,
    batches: Vec<Vec<String>>,
}

impl MemoryDestination {
    pub fn new() -> Self {
        Self::default()
    }

    /// Completed flush cycles, each a list of lines without terminators.
    /// Cycles that wrote nothing are not recorded.
    pub fn batches(&self) -> Vec<Vec<String>> {
        self.inner.lock().batches.clone()
    }

    /// Every line written so far, in order.
    pub fn lines(&self) -> Vec<String> {
        self.batches().into_iter().flatten().collect()
    }
}

impl Write for MemoryDestination {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.inner.lock().pending.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        let mut state = self.inner.lock();
        if state.pending.is_empty() {
            return Ok(());
        }
        let text = String::from_utf8_lossy(&std::mem::take(&mut state.pending)).into_owned();
        let batch = text.lines().map(str::to_string).collect();
        state.batches.push(batch);
        Ok(())
    }
}
