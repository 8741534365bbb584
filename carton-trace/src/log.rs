//! # Trace Log
//!
//! The append-only store for completed [`TraceItem`]s and the RAII scope
//! that feeds it.
//!
//! ## Concurrency
//!
//! One mutex guards the item vector for both append and snapshot; trace
//! volume is orders of magnitude smaller than the work being measured, so
//! a plain lock is the right tradeoff. [`TraceLog::events`] copies the
//! shared handles out under the lock so readers iterate without holding
//! it; items appended after a snapshot was taken are invisible to that
//! snapshot.
//!
//! ## The process-wide log
//!
//! [`enable_tracing`] lazily creates a log that lives for the rest of the
//! process. There is deliberately no teardown: worker threads may still be
//! completing scopes while the process exits, and a one-time leak is
//! cheaper than ordered shutdown. A [`TraceLog`] can also be constructed
//! directly for embedding and tests.

use std::sync::{Arc, OnceLock};

use parking_lot::Mutex;

use crate::item::{TraceItem, TraceKind};

/// Sized for a large build so steady-state appends never reallocate.
const PREALLOCATED_EVENTS: usize = 16384;

/// Thread-safe, append-only store of completed trace items.
#[derive(Debug)]
pub struct TraceLog {
    items: Mutex<Vec<Arc<TraceItem>>>,
}

impl TraceLog {
    pub fn new() -> Self {
        TraceLog {
            items: Mutex::new(Vec::with_capacity(PREALLOCATED_EVENTS)),
        }
    }

    /// Appends one completed item. Items arrive in completion order, which
    /// may interleave arbitrarily across threads.
    pub fn add(&self, item: TraceItem) {
        self.items.lock().push(Arc::new(item));
    }

    /// A snapshot of everything collected so far. Items added afterwards
    /// are not part of it.
    pub fn events(&self) -> Vec<Arc<TraceItem>> {
        self.items.lock().clone()
    }
}

impl Default for TraceLog {
    fn default() -> Self {
        Self::new()
    }
}

static TRACE_LOG: OnceLock<TraceLog> = OnceLock::new();

/// Turns tracing on for the rest of the process. Idempotent; there is no
/// way to turn it off again.
pub fn enable_tracing() -> &'static TraceLog {
    TRACE_LOG.get_or_init(TraceLog::new)
}

/// Whether [`enable_tracing`] has been called.
pub fn tracing_enabled() -> bool {
    TRACE_LOG.get().is_some()
}

/// The process-wide log, if tracing has been enabled.
pub fn trace_log() -> Option<&'static TraceLog> {
    TRACE_LOG.get()
}

/// A stack-scoped measurement.
///
/// Starts the clock at construction and hands the finished item to the log
/// exactly once, either at an explicit [`ScopedTrace::done`] or when the
/// scope unwinds, whichever comes first. Constructed against the
/// process-wide log it is a complete no-op while tracing is disabled: no
/// item is allocated and nothing is recorded.
pub struct ScopedTrace<'log> {
    inner: Option<(TraceItem, &'log TraceLog)>,
}

impl ScopedTrace<'static> {
    /// Starts a trace against the process-wide log.
    pub fn new(kind: TraceKind, name: &str) -> Self {
        match trace_log() {
            Some(log) => ScopedTrace {
                inner: Some((TraceItem::start(kind, name), log)),
            },
            None => ScopedTrace { inner: None },
        }
    }
}

impl<'log> ScopedTrace<'log> {
    /// Starts a trace against an explicitly-owned log.
    pub fn with_log(log: &'log TraceLog, kind: TraceKind, name: &str) -> Self {
        ScopedTrace {
            inner: Some((TraceItem::start(kind, name), log)),
        }
    }

    /// Annotates the event with the toolchain it ran under.
    pub fn set_toolchain(&mut self, toolchain: &str) {
        if let Some((item, _)) = &mut self.inner {
            item.set_toolchain(toolchain);
        }
    }

    /// Annotates the event with the command line it describes.
    pub fn set_cmdline(&mut self, cmdline: &str) {
        if let Some((item, _)) = &mut self.inner {
            item.set_cmdline(cmdline);
        }
    }

    /// Stops the clock and records the event. Calling it again, or
    /// dropping the scope afterwards, does nothing.
    pub fn done(&mut self) {
        if let Some((mut item, log)) = self.inner.take() {
            item.complete();
            log.add(item);
        }
    }
}

impl Drop for ScopedTrace<'_> {
    fn drop(&mut self) {
        self.done();
    }
}
