use std::path::Path;

use anyhow::{Context, Result, bail};
use carton_bundle::resolve_graph;
use carton_trace::{enable_tracing, save_traces, summarize_traces};

use crate::{manifest, output};

pub fn execute(manifest_path: &Path, time: bool, tracelog: Option<&Path>) -> Result<()> {
    if time || tracelog.is_some() {
        enable_tracing();
    }

    output::status("Loading", manifest_path.display().to_string());
    let (settings, specs) = manifest::load(manifest_path)?;

    let targets = resolve_graph(specs).context("failed to resolve the target graph")?;
    output::status("Resolved", format!("{} targets", targets.len()));

    // A bad bundle halts that bundle only; the rest still report.
    let mut failures = 0usize;
    for target in &targets {
        if !target.is_create_bundle() {
            continue;
        }
        output::status("Bundle", target.label().to_string());
        let mut outputs = Vec::new();
        match target.bundle().output_files(&settings, &mut outputs) {
            Ok(()) => {
                for file in &outputs {
                    output::step(file.value());
                }
                match target.bundle().bundle_root_dir_output(&settings) {
                    Ok(unit) => output::step(format!("unit: {}", unit.value())),
                    Err(err) => {
                        output::error(format!("{}: {err}", target.label()));
                        failures += 1;
                    }
                }
            }
            Err(err) => {
                output::error(format!("{}: {err}", target.label()));
                failures += 1;
            }
        }
    }

    if let Some(path) = tracelog {
        save_traces(path)
            .with_context(|| format!("failed to write trace file to {}", path.display()))?;
        output::status("Wrote", path.display().to_string());
    }
    if time {
        print!("{}", summarize_traces());
    }

    if failures > 0 {
        bail!("{failures} bundle(s) failed");
    }
    Ok(())
}
