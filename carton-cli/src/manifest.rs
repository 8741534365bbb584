//! Build manifest loading.
//!
//! The manifest is a plain TOML description of an already-evaluated target
//! graph: a build directory plus a list of targets. It is deliberately not
//! a build language; evaluation order, conditionals, and templates belong
//! to whatever produced the file.
//!
//! ```toml
//! build-dir = "//out/Debug"
//!
//! [[target]]
//! label = "//app"
//! kind = "create_bundle"
//! deps = ["//app:resources"]
//!
//! [target.bundle]
//! root-dir = "//out/Debug/App.app"
//! contents-dir = "//out/Debug/App.app/Contents"
//! resources-dir = "//out/Debug/App.app/Contents/Resources"
//! executable-dir = "//out/Debug/App.app/Contents/MacOS"
//! product-type = "com.apple.product-type.application"
//!
//! [[target]]
//! label = "//app:resources"
//! kind = "bundle_data"
//! sources = ["//app/res/icon.png"]
//! destination = "{{bundle_resources_dir}}/{{source_file_part}}"
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use carton_bundle::{BuildSettings, BundleData, BundleDirs, TargetKind, TargetSpec};
use carton_foundation::{Label, LabelPattern, SourceDir, SourceFile, SubstitutionPattern};
use carton_trace::{ScopedTrace, TraceKind};
use serde::Deserialize;

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct Manifest {
    build_dir: String,
    #[serde(default, rename = "target")]
    targets: Vec<TargetEntry>,
}

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct TargetEntry {
    label: String,
    kind: KindEntry,
    #[serde(default)]
    sources: Vec<String>,
    destination: Option<String>,
    #[serde(default)]
    deps: Vec<String>,
    bundle: Option<BundleEntry>,
}

#[derive(Deserialize, Clone, Copy)]
#[serde(rename_all = "snake_case")]
enum KindEntry {
    BundleData,
    CreateBundle,
    Group,
}

impl From<KindEntry> for TargetKind {
    fn from(kind: KindEntry) -> TargetKind {
        match kind {
            KindEntry::BundleData => TargetKind::BundleData,
            KindEntry::CreateBundle => TargetKind::CreateBundle,
            KindEntry::Group => TargetKind::Group,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct BundleEntry {
    root_dir: String,
    contents_dir: String,
    resources_dir: String,
    executable_dir: String,
    product_type: String,
    #[serde(default)]
    transparent: bool,
    #[serde(default)]
    deps_filter: Vec<String>,
    partial_info_plist: Option<String>,
    code_signing_script: Option<String>,
    #[serde(default)]
    code_signing_sources: Vec<String>,
    #[serde(default)]
    code_signing_outputs: Vec<String>,
    #[serde(default)]
    code_signing_args: Vec<String>,
    xcode_test_application_name: Option<String>,
    #[serde(default)]
    xcode_extra_attributes: BTreeMap<String, String>,
}

/// Reads and converts a manifest file.
pub fn load(path: &Path) -> Result<(BuildSettings, Vec<TargetSpec>)> {
    let display = path.display().to_string();
    let text = {
        let _load = ScopedTrace::new(TraceKind::FileLoad, &display);
        fs::read_to_string(path)
            .with_context(|| format!("failed to read manifest at {display}"))?
    };
    parse(&text, &display)
}

/// Parses manifest text; `origin` names the source in diagnostics and
/// trace events.
pub fn parse(text: &str, origin: &str) -> Result<(BuildSettings, Vec<TargetSpec>)> {
    let manifest: Manifest = {
        let _parse = ScopedTrace::new(TraceKind::FileParse, origin);
        toml::from_str(text).with_context(|| format!("failed to parse manifest {origin}"))?
    };

    let build_dir = SourceDir::parse(manifest.build_dir)
        .with_context(|| format!("invalid build-dir in {origin}"))?;
    let settings = BuildSettings::new(build_dir);

    let mut specs = Vec::with_capacity(manifest.targets.len());
    for entry in manifest.targets {
        let label = Label::parse(&entry.label)
            .with_context(|| format!("invalid target label {:?} in {origin}", entry.label))?;
        let mut define = ScopedTrace::new(TraceKind::DefineTarget, &label.to_string());
        let spec = convert_target(label, entry)?;
        define.done();
        specs.push(spec);
    }
    Ok((settings, specs))
}

fn convert_target(label: Label, entry: TargetEntry) -> Result<TargetSpec> {
    let mut spec = TargetSpec::new(label.clone(), entry.kind.into());

    spec.sources = entry
        .sources
        .into_iter()
        .map(|source| {
            SourceFile::parse(source).with_context(|| format!("invalid source in {label}"))
        })
        .collect::<Result<_>>()?;
    spec.destination = entry
        .destination
        .map(|destination| {
            SubstitutionPattern::parse(&destination)
                .with_context(|| format!("invalid destination pattern in {label}"))
        })
        .transpose()?;
    spec.deps = entry
        .deps
        .iter()
        .map(|dep| Label::parse(dep).with_context(|| format!("invalid dep {dep:?} in {label}")))
        .collect::<Result<_>>()?;

    if let Some(bundle) = entry.bundle {
        spec.bundle = convert_bundle(&label, bundle)?;
    }
    Ok(spec)
}

fn convert_bundle(label: &Label, entry: BundleEntry) -> Result<BundleData> {
    let dir = |value: String, which: &str| {
        SourceDir::parse(value).with_context(|| format!("invalid {which} in {label}"))
    };
    let dirs = BundleDirs {
        root_dir: dir(entry.root_dir, "root-dir")?,
        contents_dir: dir(entry.contents_dir, "contents-dir")?,
        resources_dir: dir(entry.resources_dir, "resources-dir")?,
        executable_dir: dir(entry.executable_dir, "executable-dir")?,
    };
    let mut bundle = BundleData::with_dirs(dirs, entry.product_type);
    bundle.set_transparent(entry.transparent);

    let filter = entry
        .deps_filter
        .iter()
        .map(|pattern| {
            LabelPattern::parse(pattern)
                .with_context(|| format!("invalid deps-filter pattern {pattern:?} in {label}"))
        })
        .collect::<Result<Vec<_>>>()?;
    bundle.set_bundle_deps_filter(filter);

    if let Some(plist) = entry.partial_info_plist {
        bundle.set_partial_info_plist(
            SourceFile::parse(plist)
                .with_context(|| format!("invalid partial-info-plist in {label}"))?,
        );
    }
    if let Some(script) = entry.code_signing_script {
        bundle.set_code_signing_script(
            SourceFile::parse(script)
                .with_context(|| format!("invalid code-signing-script in {label}"))?,
        );
    }
    bundle.set_code_signing_sources(
        entry
            .code_signing_sources
            .into_iter()
            .map(|source| {
                SourceFile::parse(source)
                    .with_context(|| format!("invalid code-signing source in {label}"))
            })
            .collect::<Result<_>>()?,
    );
    bundle.set_code_signing_outputs(
        entry
            .code_signing_outputs
            .iter()
            .map(|pattern| {
                SubstitutionPattern::parse(pattern)
                    .with_context(|| format!("invalid code-signing output in {label}"))
            })
            .collect::<Result<_>>()?,
    );
    bundle.set_code_signing_args(entry.code_signing_args);

    if let Some(name) = entry.xcode_test_application_name {
        bundle.set_xcode_test_application_name(name);
    }
    for (key, value) in entry.xcode_extra_attributes {
        bundle.insert_xcode_extra_attribute(key, value);
    }
    Ok(bundle)
}

#[cfg(test)]
mod tests {
    use carton_bundle::resolve_graph;

    use super::*;

    const MANIFEST: &str = r#"
build-dir = "//out/Debug"

[[target]]
label = "//app"
kind = "create_bundle"
deps = ["//app:resources"]

[target.bundle]
root-dir = "//out/Debug/App.app"
contents-dir = "//out/Debug/App.app/Contents"
resources-dir = "//out/Debug/App.app/Contents/Resources"
executable-dir = "//out/Debug/App.app/Contents/MacOS"
product-type = "com.apple.product-type.application"
deps-filter = ["//vendor/*"]

[[target]]
label = "//app:resources"
kind = "bundle_data"
sources = ["//app/res/icon.png"]
destination = "{{bundle_resources_dir}}/{{source_file_part}}"
"#;

    #[test]
    fn parses_and_resolves_a_round_trip_manifest() {
        let (settings, specs) = parse(MANIFEST, "test manifest").unwrap();
        assert_eq!(settings.build_dir().value(), "//out/Debug/");
        assert_eq!(specs.len(), 2);

        let targets = resolve_graph(specs).unwrap();
        let app = targets
            .iter()
            .find(|target| target.is_create_bundle())
            .unwrap();
        let mut outputs = Vec::new();
        app.bundle().output_files(&settings, &mut outputs).unwrap();
        assert_eq!(outputs.len(), 1);
        assert_eq!(outputs[0].value(), "App.app/Contents/Resources/icon.png");
        assert!(app.bundle().is_application());
    }

    #[test]
    fn rejects_unknown_keys() {
        let err = parse("build-dir = \"//out\"\nmystery = 1\n", "test").unwrap_err();
        assert!(err.to_string().contains("failed to parse manifest"));
    }

    #[test]
    fn rejects_bad_destination_patterns() {
        let manifest = r#"
build-dir = "//out/Debug"

[[target]]
label = "//app:resources"
kind = "bundle_data"
sources = ["//app/res/icon.png"]
destination = "{{bundle_junk_dir}}/x"
"#;
        let err = parse(manifest, "test").unwrap_err();
        assert!(err.to_string().contains("invalid destination pattern"));
    }
}
