//! Human-readable summarization of collected trace events.
//!
//! Three report sections cover the phases that dominate build time: build
//! file parses (one line per event), build file executions and script runs
//! (coalesced by name), and an aggregate line for the header-check pass.
//! Every other event kind is ignored by this report; the exported trace
//! file carries the full detail.

use std::cmp::Reverse;
use std::collections::HashMap;
use std::fmt::Write as _;
use std::sync::Arc;

use crate::item::{TraceItem, TraceKind};
use crate::log::trace_log;
use crate::ticks::TickDelta;

/// Summarizes the process-wide log. Returns the empty string when tracing
/// was never enabled.
pub fn summarize_traces() -> String {
    match trace_log() {
        Some(log) => summarize(&log.events()),
        None => String::new(),
    }
}

/// Renders the text report for one event snapshot.
pub fn summarize(events: &[Arc<TraceItem>]) -> String {
    let mut parses = Vec::new();
    let mut file_execs = Vec::new();
    let mut script_execs = Vec::new();
    let mut aggregate_checks = Vec::new();
    let mut single_header_checks = 0u64;
    for item in events {
        match item.kind() {
            TraceKind::FileParse => parses.push(item.as_ref()),
            TraceKind::FileExecute => file_execs.push(item.as_ref()),
            TraceKind::ScriptExecute => script_execs.push(item.as_ref()),
            TraceKind::CheckHeaders => aggregate_checks.push(item.as_ref()),
            TraceKind::CheckHeader => single_header_checks += 1,
            _ => {}
        }
    }

    let mut out = String::new();
    out.push_str("File parse times: (time in ms, name)\n");
    write_sorted(&mut parses, &mut out);
    out.push_str("\nFile execute times: (total time in ms, # executions, name)\n");
    write_coalesced(&file_execs, &mut out);
    out.push_str("\nScript execute times: (total time in ms, # executions, name)\n");
    write_coalesced(&script_execs, &mut out);
    if !aggregate_checks.is_empty() {
        // Normally a single event per run; summed anyway.
        let mut total = TickDelta::ZERO;
        for check in &aggregate_checks {
            total += check.delta();
        }
        out.push_str("\nHeader check time: (total time in ms, files checked)\n");
        let _ = writeln!(out, "{:8.2}  {}", total.as_millis_f64(), single_header_checks);
    }
    out
}

/// One line per event, slowest first. The sort is stable, so equal
/// durations keep completion order.
fn write_sorted(items: &mut [&TraceItem], out: &mut String) {
    items.sort_by_key(|item| Reverse(item.delta()));
    for item in items {
        let _ = writeln!(out, "{:8.2}  {}", item.delta().as_millis_f64(), item.name());
    }
}

/// Groups events by exact name, sums durations and counts, and writes one
/// line per group, largest total first (ties keep first-seen order).
fn write_coalesced(items: &[&TraceItem], out: &mut String) {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<(&str, TickDelta, u64)> = Vec::new();
    for item in items {
        match index.get(item.name()) {
            Some(&at) => {
                groups[at].1 += item.delta();
                groups[at].2 += 1;
            }
            None => {
                index.insert(item.name(), groups.len());
                groups.push((item.name(), item.delta(), 1));
            }
        }
    }
    groups.sort_by_key(|(_, total, _)| Reverse(*total));
    for (name, total, count) in groups {
        let _ = writeln!(out, "{:8.2} {:4}  {}", total.as_millis_f64(), count, name);
    }
}
