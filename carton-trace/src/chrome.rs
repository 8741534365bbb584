//! Chrome Trace Event Format export.
//!
//! Writes the full event snapshot as one JSON document consumable by
//! `chrome://tracing` and Perfetto. The document is built in a single pass
//! and written whole; trace volume is bounded by build size, so streaming
//! buys nothing here.
//!
//! Native thread ids can exceed what JSON numbers represent reliably, so
//! they are remapped to small sequential integers in first-seen order over
//! the snapshot. The leading `thread_name` metadata event labels the
//! thread that performs the export, which is assumed to be the main
//! thread.

use std::collections::HashMap;
use std::io;
use std::path::Path;
use std::sync::Arc;
use std::thread::{self, ThreadId};

use serde::Serialize;

use crate::item::TraceItem;
use crate::log::{TraceLog, trace_log};

#[derive(Serialize)]
struct TraceDocument<'a> {
    #[serde(rename = "traceEvents")]
    trace_events: Vec<TraceEvent<'a>>,
}

#[derive(Serialize)]
struct TraceEvent<'a> {
    pid: u32,
    tid: u64,
    ts: u64,
    ph: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    dur: Option<u64>,
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    cat: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    args: Option<TraceArgs<'a>>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum TraceArgs<'a> {
    ThreadName {
        name: &'a str,
    },
    Annotations {
        #[serde(skip_serializing_if = "Option::is_none")]
        toolchain: Option<&'a str>,
        #[serde(skip_serializing_if = "Option::is_none")]
        cmdline: Option<&'a str>,
    },
}

/// Renders one event snapshot as a complete trace document.
pub fn render_trace(events: &[Arc<TraceItem>]) -> String {
    let mut tids: HashMap<ThreadId, u64> = HashMap::new();
    for item in events {
        let next = tids.len() as u64;
        tids.entry(item.thread_id()).or_insert(next);
    }
    let next = tids.len() as u64;
    let main_tid = *tids.entry(thread::current().id()).or_insert(next);

    let mut trace_events = Vec::with_capacity(events.len() + 1);
    trace_events.push(TraceEvent {
        pid: 0,
        tid: main_tid,
        ts: 0,
        ph: "M",
        dur: None,
        name: "thread_name",
        cat: None,
        args: Some(TraceArgs::ThreadName {
            name: "Main thread",
        }),
    });
    for item in events {
        let args = if item.toolchain().is_some() || item.cmdline().is_some() {
            Some(TraceArgs::Annotations {
                toolchain: item.toolchain(),
                cmdline: item.cmdline(),
            })
        } else {
            None
        };
        trace_events.push(TraceEvent {
            pid: 0,
            tid: tids[&item.thread_id()],
            ts: item.begin().as_micros(),
            ph: "X",
            dur: Some(item.delta().as_micros()),
            name: item.name(),
            cat: Some(item.kind().category()),
            args,
        });
    }
    serde_json::to_string(&TraceDocument { trace_events })
        .expect("a trace document has no unserializable values")
}

/// Serializes `log`'s snapshot and writes it to `path` in one shot.
pub fn save_trace(log: &TraceLog, path: &Path) -> io::Result<()> {
    std::fs::write(path, render_trace(&log.events()))
}

/// Writes the process-wide log to `path`. Does nothing when tracing was
/// never enabled.
pub fn save_traces(path: &Path) -> io::Result<()> {
    match trace_log() {
        Some(log) => save_trace(log, path),
        None => Ok(()),
    }
}
