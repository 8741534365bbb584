//! Lifecycle of the process-wide trace log.
//!
//! Enabling tracing is sticky for the whole process, so this lives in its
//! own integration test binary: the disabled-state assertions must run
//! before anything has called `enable_tracing`, and unit tests in the
//! library share a process. One test function keeps the ordering explicit.

use std::thread;

use carton_trace::{
    ScopedTrace, TraceKind, enable_tracing, save_traces, summarize_traces, tracing_enabled,
};

#[test]
fn global_log_lifecycle() {
    // Disabled: scopes are no-ops, the summary is empty, and saving writes
    // no file.
    assert!(!tracing_enabled());
    {
        let mut scope = ScopedTrace::new(TraceKind::Setup, "early");
        scope.done();
    }
    assert_eq!(summarize_traces(), "");
    let dir = tempfile::tempdir().unwrap();
    let skipped = dir.path().join("disabled.json");
    save_traces(&skipped).unwrap();
    assert!(!skipped.exists());

    // Enabling is idempotent and sticky, and the pre-enable scope left no
    // trace behind.
    let log = enable_tracing();
    assert!(tracing_enabled());
    assert!(std::ptr::eq(log, enable_tracing()));
    assert!(log.events().is_empty());

    // Scopes feed the log from any thread, in completion order.
    {
        let _outer = ScopedTrace::new(TraceKind::FileParse, "//BUILD.carton");
        thread::spawn(|| {
            let _inner = ScopedTrace::new(TraceKind::ScriptExecute, "helper.py");
        })
        .join()
        .unwrap();
    }
    let events = log.events();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].name(), "helper.py");
    assert_eq!(events[1].name(), "//BUILD.carton");
    for event in &events {
        assert!(event.end() >= event.begin());
    }

    let summary = summarize_traces();
    assert!(summary.contains("//BUILD.carton"));
    assert!(summary.contains("helper.py"));

    // Saving produces a parseable document with the remapped thread ids.
    let saved = dir.path().join("trace.json");
    save_traces(&saved).unwrap();
    let doc: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&saved).unwrap()).unwrap();
    let rendered = doc["traceEvents"].as_array().unwrap();
    assert_eq!(rendered.len(), 3);
    assert_eq!(rendered[0]["ph"], "M");
    assert_eq!(rendered[0]["args"]["name"], "Main thread");
    // helper.py ran on the spawned thread (first seen -> tid 0); the
    // parse ran here.
    assert_eq!(rendered[1]["cat"], "script_exec");
    assert_eq!(rendered[1]["tid"], 0);
    assert_eq!(rendered[2]["cat"], "parse");
    assert_eq!(rendered[2]["tid"], 1);
    assert_eq!(rendered[0]["tid"], 1);

    // A second done() (or the drop after it) records nothing extra.
    let mut scope = ScopedTrace::new(TraceKind::Setup, "once");
    scope.done();
    scope.done();
    drop(scope);
    assert_eq!(log.events().len(), 3);
}
