//! One completed timed measurement of a build phase.

use std::thread::{self, ThreadId};

use crate::ticks::{TickDelta, Ticks};

/// The closed set of build phases a trace item can describe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TraceKind {
    /// Toolchain and environment setup.
    Setup,
    /// Reading a build file from disk.
    FileLoad,
    /// Parsing a build file.
    FileParse,
    /// Executing a build file.
    FileExecute,
    /// Executing a template expansion inside a build file.
    FileExecuteTemplate,
    /// Writing a generic output file.
    FileWrite,
    /// Writing a generated source file.
    FileWriteGenerated,
    /// Writing a backend build manifest.
    FileWriteNinja,
    /// Loading an imported file.
    ImportLoad,
    /// Waiting on another thread's in-flight import.
    ImportBlock,
    /// Running an external script.
    ScriptExecute,
    /// Defining one target.
    DefineTarget,
    /// Finalizing one resolved target.
    OnResolved,
    /// Checking a single header.
    CheckHeader,
    /// The aggregate header-check pass.
    CheckHeaders,
    /// Walking target metadata.
    WalkMetadata,
}

impl TraceKind {
    /// The category string used in exported trace files. These are wire
    /// format; trace viewers key off them.
    pub fn category(&self) -> &'static str {
        match self {
            TraceKind::Setup => "setup",
            TraceKind::FileLoad => "load",
            TraceKind::FileParse => "parse",
            TraceKind::FileExecute => "file_exec",
            TraceKind::FileExecuteTemplate => "file_exec_template",
            TraceKind::FileWrite => "file_write",
            TraceKind::FileWriteGenerated => "file_write_generated",
            TraceKind::FileWriteNinja => "file_write_ninja",
            TraceKind::ImportLoad => "import_load",
            TraceKind::ImportBlock => "import_block",
            TraceKind::ScriptExecute => "script_exec",
            TraceKind::DefineTarget => "define",
            TraceKind::OnResolved => "onresolved",
            TraceKind::CheckHeader => "hdr",
            TraceKind::CheckHeaders => "header_check",
            TraceKind::WalkMetadata => "walk_metadata",
        }
    }
}

/// One timed event. Owned by a [`ScopedTrace`](crate::ScopedTrace) while
/// the clock runs, then handed to the log and immutable from that point
/// on.
#[derive(Debug, Clone)]
pub struct TraceItem {
    kind: TraceKind,
    name: String,
    thread: ThreadId,
    begin: Ticks,
    end: Ticks,
    toolchain: Option<String>,
    cmdline: Option<String>,
}

impl TraceItem {
    /// Starts the clock on the current thread.
    pub(crate) fn start(kind: TraceKind, name: impl Into<String>) -> Self {
        TraceItem {
            kind,
            name: name.into(),
            thread: thread::current().id(),
            begin: Ticks::now(),
            end: Ticks::default(),
            toolchain: None,
            cmdline: None,
        }
    }

    /// Stops the clock.
    pub(crate) fn complete(&mut self) {
        self.end = Ticks::now();
    }

    pub(crate) fn set_toolchain(&mut self, toolchain: impl Into<String>) {
        self.toolchain = Some(toolchain.into());
    }

    pub(crate) fn set_cmdline(&mut self, cmdline: impl Into<String>) {
        self.cmdline = Some(cmdline.into());
    }

    #[cfg(test)]
    pub(crate) fn synthetic(
        kind: TraceKind,
        name: &str,
        thread: ThreadId,
        begin: Ticks,
        end: Ticks,
    ) -> Self {
        TraceItem {
            kind,
            name: name.to_string(),
            thread,
            begin,
            end,
            toolchain: None,
            cmdline: None,
        }
    }

    pub fn kind(&self) -> TraceKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The thread the measurement ran on.
    pub fn thread_id(&self) -> ThreadId {
        self.thread
    }

    pub fn begin(&self) -> Ticks {
        self.begin
    }

    pub fn end(&self) -> Ticks {
        self.end
    }

    pub fn delta(&self) -> TickDelta {
        self.end - self.begin
    }

    pub fn toolchain(&self) -> Option<&str> {
        self.toolchain.as_deref()
    }

    pub fn cmdline(&self) -> Option<&str> {
        self.cmdline.as_deref()
    }
}
