//! # Build Tracing
//!
//! Timed instrumentation for build phases, modeled as an append-only log
//! of completed events.
//!
//! ## Usage
//!
//! Tracing is off until [`enable_tracing`] is called; before that every
//! [`ScopedTrace`] is a complete no-op. Once enabled it stays enabled for
//! the rest of the process and the log is never torn down, so worker
//! threads may keep emitting events right up to process exit without any
//! shutdown ordering.
//!
//! ```
//! use carton_trace::{ScopedTrace, TraceKind, enable_tracing, summarize_traces};
//!
//! enable_tracing();
//! {
//!     let mut scope = ScopedTrace::new(TraceKind::FileParse, "//BUILD.carton");
//!     // ... parse the file ...
//!     scope.done();
//! }
//! println!("{}", summarize_traces());
//! ```
//!
//! ## Consumers
//!
//! Two independent consumers read the collected events after the build:
//! [`summarize_traces`] renders a text report for the console, and
//! [`save_traces`] writes a Chrome Trace Event Format JSON file for trace
//! viewers.

mod chrome;
mod item;
mod log;
mod summary;
mod ticks;

pub use chrome::{render_trace, save_trace, save_traces};
pub use item::{TraceItem, TraceKind};
pub use log::{ScopedTrace, TraceLog, enable_tracing, trace_log, tracing_enabled};
pub use summary::{summarize, summarize_traces};
pub use ticks::{TickDelta, Ticks};
