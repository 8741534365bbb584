//! # Bundle Aggregation State
//!
//! Every target carries a [`BundleData`]; for most targets it is an empty
//! accumulator that merely forwards discovered `bundle_data` dependencies
//! up the graph. For a `create_bundle` target it holds the full description
//! of the assembled bundle: the directory layout, the classified dependency
//! sets, the copy rules derived from them, and the asset-catalog and
//! code-signing metadata.
//!
//! ## Lifecycle
//!
//! A `BundleData` is mutated in two phases and then frozen:
//!
//! 1. While the owning target's dependencies are walked (strictly
//!    bottom-up), [`BundleData::add_bundle_dep`] classifies each discovered
//!    edge. No graph traversal happens here; the resolver presents edges.
//! 2. [`BundleData::on_resolved`] runs once when the owning target's
//!    dependency graph has settled: it derives the copy rules, partitions
//!    asset-catalog inputs, and validates the configuration.
//!
//! After that the structure is read-only and can be shared freely across
//! threads; all derivation queries take `&self`.

use std::collections::BTreeMap;
use std::sync::Arc;

use carton_foundation::{
    Label, LabelPattern, OutputFile, Placeholder, SourceDir, SourceFile, SubstitutionPattern,
};
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::error::BundleError;
use crate::file_rule::{BundleFileRule, expand_pattern};
use crate::settings::BuildSettings;
use crate::target::{Target, TargetKind};
use crate::unique_list::UniqueTargetList;

/// Product type of application bundles, as used by the platform toolchain.
pub const PRODUCT_TYPE_APPLICATION: &str = "com.apple.product-type.application";
/// Product type of framework bundles.
pub const PRODUCT_TYPE_FRAMEWORK: &str = "com.apple.product-type.framework";

/// The directory layout of one bundle. All four directories are
/// source-absolute paths under the build directory; `contents_dir`,
/// `resources_dir`, and `executable_dir` must be `root_dir` or descend
/// from it (validated at resolution).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleDirs {
    pub root_dir: SourceDir,
    pub contents_dir: SourceDir,
    pub resources_dir: SourceDir,
    pub executable_dir: SourceDir,
}

/// Per-target bundle state. See the module documentation for the
/// lifecycle.
#[derive(Debug, Default)]
pub struct BundleData {
    file_rules: Vec<BundleFileRule>,
    bundle_deps: UniqueTargetList,
    forwarded_bundle_deps: UniqueTargetList,
    assets_catalog_sources: Vec<SourceFile>,
    assets_catalog_deps: UniqueTargetList,
    dirs: Option<BundleDirs>,
    product_type: String,
    transparent: bool,
    xcode_test_application_name: Option<String>,
    xcode_extra_attributes: BTreeMap<String, String>,
    partial_info_plist: Option<SourceFile>,
    code_signing_script: Option<SourceFile>,
    code_signing_sources: Vec<SourceFile>,
    code_signing_outputs: Vec<SubstitutionPattern>,
    code_signing_args: Vec<String>,
    bundle_deps_filter: Vec<LabelPattern>,
    owner: Option<Label>,
    resolved: bool,
}

impl BundleData {
    /// An empty accumulator, used by every target that is not itself a
    /// bundle.
    pub fn new() -> Self {
        Self::default()
    }

    /// State for a `create_bundle` target with the given directory layout
    /// and product type.
    pub fn with_dirs(dirs: BundleDirs, product_type: impl Into<String>) -> Self {
        BundleData {
            dirs: Some(dirs),
            product_type: product_type.into(),
            ..Self::default()
        }
    }

    pub fn set_transparent(&mut self, transparent: bool) {
        self.transparent = transparent;
    }

    pub fn set_bundle_deps_filter(&mut self, filter: Vec<LabelPattern>) {
        self.bundle_deps_filter = filter;
    }

    pub fn set_partial_info_plist(&mut self, plist: SourceFile) {
        self.partial_info_plist = Some(plist);
    }

    pub fn set_code_signing_script(&mut self, script: SourceFile) {
        self.code_signing_script = Some(script);
    }

    pub fn set_code_signing_sources(&mut self, sources: Vec<SourceFile>) {
        self.code_signing_sources = sources;
    }

    pub fn set_code_signing_outputs(&mut self, outputs: Vec<SubstitutionPattern>) {
        self.code_signing_outputs = outputs;
    }

    pub fn set_code_signing_args(&mut self, args: Vec<String>) {
        self.code_signing_args = args;
    }

    pub fn set_xcode_test_application_name(&mut self, name: impl Into<String>) {
        self.xcode_test_application_name = Some(name.into());
    }

    pub fn insert_xcode_extra_attribute(
        &mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) {
        self.xcode_extra_attributes.insert(key.into(), value.into());
    }

    /// Classifies one discovered `bundle_data`/`create_bundle` dependency
    /// edge.
    ///
    /// Duplicate presentations of the same target are ignored; first
    /// insertion wins the position. A transparent bundle consumes nested
    /// bundles of its own product type and forwards the rest, pulling the
    /// forwarded bundle's direct bundle deps in for reclassification.
    pub fn add_bundle_dep(&mut self, dep: &Arc<Target>) {
        debug_assert!(!self.resolved, "bundle deps are classified before resolution");
        debug_assert!(
            dep.kind() != TargetKind::Group,
            "the resolver flattens groups before presenting edges"
        );
        if self
            .bundle_deps_filter
            .iter()
            .any(|pattern| pattern.matches(dep.label()))
        {
            debug!(dep = %dep.label(), "bundle dep excluded by filter");
            return;
        }
        if self.transparent
            && dep.is_create_bundle()
            && dep.bundle().product_type() != self.product_type
        {
            if self.forwarded_bundle_deps.push(dep) {
                for sub in dep.bundle().bundle_deps() {
                    self.add_bundle_dep(sub);
                }
            }
            return;
        }
        debug_assert!(
            !self.forwarded_bundle_deps.contains(dep),
            "a dep is either consumed or forwarded, never both"
        );
        self.bundle_deps.push(dep);
    }

    /// Finalization hook, called once per target after its whole dependency
    /// graph has settled. Derives the copy rules from the classified deps,
    /// partitions asset-catalog inputs, and validates the configuration.
    /// Failure is a hard error for the owning target.
    pub fn on_resolved(&mut self, owner: &Label, kind: TargetKind) -> Result<(), BundleError> {
        debug_assert!(!self.resolved, "on_resolved runs once per target");
        self.resolved = true;
        self.owner = Some(owner.clone());
        if kind != TargetKind::CreateBundle {
            return Ok(());
        }

        let dirs = match &self.dirs {
            Some(dirs) => dirs,
            None => {
                return Err(BundleError::MissingBundleDirs {
                    target: owner.clone(),
                });
            }
        };
        for dir in [&dirs.contents_dir, &dirs.resources_dir, &dirs.executable_dir] {
            if !dirs.root_dir.contains_dir(dir) {
                return Err(BundleError::DirOutsideBundleRoot {
                    target: owner.clone(),
                    dir: dir.clone(),
                    root_dir: dirs.root_dir.clone(),
                });
            }
        }

        let deps: Vec<Arc<Target>> = self.bundle_deps.as_slice().to_vec();
        for dep in deps {
            if dep.kind() != TargetKind::BundleData {
                // Nested bundles are consumed as opaque units; they add no
                // per-file copy rules here.
                continue;
            }
            let mut plain = Vec::new();
            for source in dep.sources() {
                if source.value().contains(".xcassets/") {
                    self.assets_catalog_sources.push(source.clone());
                    self.assets_catalog_deps.push(&dep);
                } else {
                    plain.push(source.clone());
                }
            }
            if !plain.is_empty() {
                let destination =
                    dep.destination()
                        .cloned()
                        .ok_or_else(|| BundleError::MissingDestination {
                            target: dep.label().clone(),
                        })?;
                debug!(dep = %dep.label(), files = plain.len(), "derived bundle file rule");
                self.file_rules
                    .push(BundleFileRule::new(dep.label().clone(), plain, destination));
            }
        }

        match &self.code_signing_script {
            Some(_) => {
                if self.code_signing_outputs.is_empty() {
                    return Err(BundleError::CodeSigningNoOutputs {
                        target: owner.clone(),
                    });
                }
            }
            None => {
                if !self.code_signing_sources.is_empty()
                    || !self.code_signing_outputs.is_empty()
                    || !self.code_signing_args.is_empty()
                {
                    return Err(BundleError::CodeSigningWithoutScript {
                        target: owner.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Appends every source file referenced by this bundle, in rule order
    /// then file order, followed by the asset-catalog inputs and the
    /// partial Info.plist. Used for staleness tracking.
    pub fn source_files(&self, out: &mut Vec<SourceFile>) {
        debug_assert!(self.resolved, "bundle queries run after resolution");
        for rule in &self.file_rules {
            out.extend_from_slice(rule.sources());
        }
        out.extend_from_slice(&self.assets_catalog_sources);
        if let Some(plist) = &self.partial_info_plist {
            out.push(plist.clone());
        }
    }

    /// Expands every copy rule against every one of its sources, appending
    /// one output path per input in input order. Fails on unsupported
    /// placeholders and on destructive collisions (two distinct sources
    /// expanding to the same destination).
    pub fn output_files(
        &self,
        settings: &BuildSettings,
        out: &mut Vec<OutputFile>,
    ) -> Result<(), BundleError> {
        debug_assert!(self.resolved, "bundle queries run after resolution");
        out.extend(self.expand_file_rules(settings)?);
        Ok(())
    }

    /// The same expansion as [`BundleData::output_files`] represented as
    /// source files, plus the derived single-file outputs: the compiled
    /// asset catalog, the partial Info.plist, the code-signing outputs,
    /// and finally the collapsed bundle root as the one logical unit for
    /// downstream consumers.
    pub fn outputs_as_source_files(
        &self,
        settings: &BuildSettings,
    ) -> Result<Vec<SourceFile>, BundleError> {
        debug_assert!(self.resolved, "bundle queries run after resolution");
        let mut outputs: Vec<SourceFile> = self
            .expand_file_rules(settings)?
            .into_iter()
            .map(|output| output.as_source_file(settings.build_dir()))
            .collect();
        if !self.assets_catalog_sources.is_empty() {
            outputs.push(self.compiled_asset_catalog_path());
        }
        if let Some(plist) = &self.partial_info_plist {
            outputs.push(plist.clone());
        }
        if self.code_signing_script.is_some() {
            outputs.extend(self.code_signing_output_files(settings)?);
        }
        if !outputs.is_empty() {
            outputs.push(self.bundle_root_dir_output(settings)?);
        }
        Ok(outputs)
    }

    /// The code-signing step's outputs. Patterns that reference per-source
    /// placeholders expand once per code-signing source; the rest expand
    /// once.
    pub fn code_signing_output_files(
        &self,
        settings: &BuildSettings,
    ) -> Result<Vec<SourceFile>, BundleError> {
        debug_assert!(self.resolved, "bundle queries run after resolution");
        let owner = self
            .owner
            .as_ref()
            .expect("bundle queries require a resolved target");
        let mut files = Vec::new();
        for pattern in &self.code_signing_outputs {
            let per_source = pattern.placeholders().any(|placeholder| {
                matches!(
                    placeholder,
                    Placeholder::SourceFilePart
                        | Placeholder::SourceNamePart
                        | Placeholder::SourceRootRelativeDir
                )
            });
            if per_source {
                for source in &self.code_signing_sources {
                    let output = expand_pattern(pattern, settings, self, Some(source), owner)?;
                    files.push(output.as_source_file(settings.build_dir()));
                }
            } else {
                let output = expand_pattern(pattern, settings, self, None, owner)?;
                files.push(output.as_source_file(settings.build_dir()));
            }
        }
        Ok(files)
    }

    /// The single compiled asset catalog under the resources directory.
    ///
    /// # Panics
    ///
    /// Only meaningful when [`BundleData::assets_catalog_sources`] is
    /// non-empty; panics otherwise. Callers check first.
    pub fn compiled_asset_catalog_path(&self) -> SourceFile {
        assert!(
            !self.assets_catalog_sources.is_empty(),
            "no asset catalog inputs were recorded for this bundle"
        );
        self.resources_dir().join_file("Assets.car")
    }

    /// Collapses `root_dir` to the top-level bundle directory under the
    /// build directory: a root of `Bundle.app/Contents` yields
    /// `Bundle.app`, and `Bundle.app` is a fixed point. Downstream
    /// consumers treat that directory as one atomic unit.
    pub fn bundle_root_dir_output(
        &self,
        settings: &BuildSettings,
    ) -> Result<SourceFile, BundleError> {
        let rel = self.dir_output_value(self.root_dir(), settings)?;
        let top = match rel.split_once('/') {
            Some((first, _)) => first,
            None => rel.as_str(),
        };
        Ok(settings.build_dir().join_file(top))
    }

    /// [`BundleData::bundle_root_dir_output`] as a directory handle.
    pub fn bundle_root_dir_output_as_dir(
        &self,
        settings: &BuildSettings,
    ) -> Result<SourceDir, BundleError> {
        let rel = self.dir_output_value(self.root_dir(), settings)?;
        let top = match rel.split_once('/') {
            Some((first, _)) => first,
            None => rel.as_str(),
        };
        Ok(settings.build_dir().join_dir(top))
    }

    /// The directory containing the collapsed bundle root.
    pub fn bundle_dir(&self, settings: &BuildSettings) -> Result<SourceDir, BundleError> {
        let root = self.bundle_root_dir_output_as_dir(settings)?;
        Ok(root
            .parent()
            .expect("the collapsed bundle root is below the build directory"))
    }

    pub fn is_application(&self) -> bool {
        self.product_type == PRODUCT_TYPE_APPLICATION
    }

    pub fn is_framework(&self) -> bool {
        self.product_type == PRODUCT_TYPE_FRAMEWORK
    }

    pub fn file_rules(&self) -> &[BundleFileRule] {
        &self.file_rules
    }

    pub fn bundle_deps(&self) -> &UniqueTargetList {
        &self.bundle_deps
    }

    pub fn forwarded_bundle_deps(&self) -> &UniqueTargetList {
        &self.forwarded_bundle_deps
    }

    pub fn assets_catalog_sources(&self) -> &[SourceFile] {
        &self.assets_catalog_sources
    }

    pub fn assets_catalog_deps(&self) -> &UniqueTargetList {
        &self.assets_catalog_deps
    }

    pub fn product_type(&self) -> &str {
        &self.product_type
    }

    pub fn is_transparent(&self) -> bool {
        self.transparent
    }

    pub fn xcode_test_application_name(&self) -> Option<&str> {
        self.xcode_test_application_name.as_deref()
    }

    pub fn xcode_extra_attributes(&self) -> &BTreeMap<String, String> {
        &self.xcode_extra_attributes
    }

    pub fn partial_info_plist(&self) -> Option<&SourceFile> {
        self.partial_info_plist.as_ref()
    }

    pub fn code_signing_script(&self) -> Option<&SourceFile> {
        self.code_signing_script.as_ref()
    }

    pub fn code_signing_sources(&self) -> &[SourceFile] {
        &self.code_signing_sources
    }

    pub fn code_signing_args(&self) -> &[String] {
        &self.code_signing_args
    }

    pub fn bundle_deps_filter(&self) -> &[LabelPattern] {
        &self.bundle_deps_filter
    }

    pub fn root_dir(&self) -> &SourceDir {
        &self.dirs().root_dir
    }

    pub fn contents_dir(&self) -> &SourceDir {
        &self.dirs().contents_dir
    }

    pub fn resources_dir(&self) -> &SourceDir {
        &self.dirs().resources_dir
    }

    pub fn executable_dir(&self) -> &SourceDir {
        &self.dirs().executable_dir
    }

    fn dirs(&self) -> &BundleDirs {
        self.dirs
            .as_ref()
            .expect("bundle directories are only set on create_bundle targets")
    }

    /// One bundle directory rendered relative to the build directory,
    /// without a trailing slash (the form used inside output paths).
    pub(crate) fn dir_output_value(
        &self,
        dir: &SourceDir,
        settings: &BuildSettings,
    ) -> Result<String, BundleError> {
        let not_below = || BundleError::RootDirNotBelowBuildDir {
            root_dir: self.root_dir().clone(),
            build_dir: settings.build_dir().clone(),
        };
        let rel = dir
            .strip_prefix(settings.build_dir())
            .ok_or_else(not_below)?;
        let rel = rel.trim_end_matches('/');
        if rel.is_empty() {
            return Err(not_below());
        }
        Ok(rel.to_string())
    }

    fn expand_file_rules(&self, settings: &BuildSettings) -> Result<Vec<OutputFile>, BundleError> {
        let mut outputs = Vec::new();
        let mut first_source_for: FxHashMap<OutputFile, SourceFile> = FxHashMap::default();
        for rule in &self.file_rules {
            for source in rule.sources() {
                let output = rule.apply_to_source(settings, self, source)?;
                match first_source_for.get(&output) {
                    Some(first) if first != source => {
                        return Err(BundleError::OutputCollision {
                            dest: output,
                            first: first.clone(),
                            second: source.clone(),
                        });
                    }
                    Some(_) => {}
                    None => {
                        first_source_for.insert(output.clone(), source.clone());
                    }
                }
                outputs.push(output);
            }
        }
        Ok(outputs)
    }
}

#[cfg(test)]
mod tests {
    use carton_foundation::SubstitutionPattern;

    use super::*;

    fn settings() -> BuildSettings {
        BuildSettings::new(SourceDir::new("//out/Debug"))
    }

    fn app_dirs() -> BundleDirs {
        BundleDirs {
            root_dir: SourceDir::new("//out/Debug/App.app"),
            contents_dir: SourceDir::new("//out/Debug/App.app/Contents"),
            resources_dir: SourceDir::new("//out/Debug/App.app/Contents/Resources"),
            executable_dir: SourceDir::new("//out/Debug/App.app/Contents/MacOS"),
        }
    }

    fn label(value: &str) -> Label {
        Label::parse(value).unwrap()
    }

    fn bundle_data_target(name: &str, sources: &[&str], dest: &str) -> Arc<Target> {
        Arc::new(Target::new(
            label(name),
            TargetKind::BundleData,
            sources.iter().map(|s| SourceFile::new(*s)).collect(),
            Some(SubstitutionPattern::parse(dest).unwrap()),
            Vec::new(),
            BundleData::new(),
        ))
    }

    fn resolved_app(deps: &[Arc<Target>]) -> BundleData {
        let mut bundle = BundleData::with_dirs(app_dirs(), PRODUCT_TYPE_APPLICATION);
        for dep in deps {
            bundle.add_bundle_dep(dep);
        }
        bundle.on_resolved(&label("//app"), TargetKind::CreateBundle).unwrap();
        bundle
    }

    #[test]
    fn duplicate_deps_are_ignored_in_first_seen_order() {
        let a = bundle_data_target("//a", &["//a/a.txt"], "{{bundle_resources_dir}}/a.txt");
        let b = bundle_data_target("//b", &["//b/b.txt"], "{{bundle_resources_dir}}/b.txt");
        let mut bundle = BundleData::with_dirs(app_dirs(), PRODUCT_TYPE_APPLICATION);
        bundle.add_bundle_dep(&a);
        bundle.add_bundle_dep(&b);
        bundle.add_bundle_dep(&a);

        let labels: Vec<String> = bundle
            .bundle_deps()
            .iter()
            .map(|t| t.label().to_string())
            .collect();
        assert_eq!(labels, vec!["//a:a", "//b:b"]);
    }

    #[test]
    fn filter_excludes_matching_labels() {
        let vendor = bundle_data_target(
            "//vendor/blob:data",
            &["//vendor/blob/x.bin"],
            "{{bundle_resources_dir}}/x.bin",
        );
        let own = bundle_data_target("//app:res", &["//app/r.txt"], "{{bundle_resources_dir}}/r.txt");
        let mut bundle = BundleData::with_dirs(app_dirs(), PRODUCT_TYPE_APPLICATION);
        bundle.set_bundle_deps_filter(vec![LabelPattern::parse("//vendor/*").unwrap()]);
        bundle.add_bundle_dep(&vendor);
        bundle.add_bundle_dep(&own);

        assert_eq!(bundle.bundle_deps().len(), 1);
        assert_eq!(bundle.bundle_deps().as_slice()[0].label(), &label("//app:res"));
    }

    fn framework_bundle(deps: &[Arc<Target>]) -> Arc<Target> {
        let dirs = BundleDirs {
            root_dir: SourceDir::new("//out/Debug/Fw.framework"),
            contents_dir: SourceDir::new("//out/Debug/Fw.framework"),
            resources_dir: SourceDir::new("//out/Debug/Fw.framework/Resources"),
            executable_dir: SourceDir::new("//out/Debug/Fw.framework"),
        };
        let mut bundle = BundleData::with_dirs(dirs, PRODUCT_TYPE_FRAMEWORK);
        for dep in deps {
            bundle.add_bundle_dep(dep);
        }
        bundle
            .on_resolved(&label("//fw"), TargetKind::CreateBundle)
            .unwrap();
        Arc::new(Target::new(
            label("//fw"),
            TargetKind::CreateBundle,
            Vec::new(),
            None,
            deps.to_vec(),
            bundle,
        ))
    }

    #[test]
    fn transparent_bundle_forwards_foreign_product_types() {
        let leaf = bundle_data_target(
            "//fw:res",
            &["//fw/logo.png"],
            "{{bundle_resources_dir}}/logo.png",
        );
        let framework = framework_bundle(std::slice::from_ref(&leaf));

        let mut bundle = BundleData::with_dirs(app_dirs(), PRODUCT_TYPE_APPLICATION);
        bundle.set_transparent(true);
        bundle.add_bundle_dep(&framework);

        // The framework itself is forwarded, its direct bundle deps are
        // pulled in for consumption.
        let forwarded: Vec<String> = bundle
            .forwarded_bundle_deps()
            .iter()
            .map(|t| t.label().to_string())
            .collect();
        assert_eq!(forwarded, vec!["//fw:fw"]);
        let consumed: Vec<String> = bundle
            .bundle_deps()
            .iter()
            .map(|t| t.label().to_string())
            .collect();
        assert_eq!(consumed, vec!["//fw:res"]);

        // Disjointness of the two sets.
        for dep in bundle.bundle_deps() {
            assert!(!bundle.forwarded_bundle_deps().contains(dep));
        }
    }

    #[test]
    fn opaque_bundle_consumes_nested_bundles_whole() {
        let leaf = bundle_data_target(
            "//fw:res",
            &["//fw/logo.png"],
            "{{bundle_resources_dir}}/logo.png",
        );
        let framework = framework_bundle(std::slice::from_ref(&leaf));

        let mut bundle = BundleData::with_dirs(app_dirs(), PRODUCT_TYPE_APPLICATION);
        bundle.add_bundle_dep(&framework);

        assert_eq!(bundle.bundle_deps().len(), 1);
        assert!(bundle.forwarded_bundle_deps().is_empty());
    }

    #[test]
    fn resolution_builds_rules_and_partitions_asset_catalogs() {
        let dep = bundle_data_target(
            "//app:res",
            &[
                "//app/res/icon.png",
                "//app/Assets.xcassets/AppIcon.appiconset/icon@2x.png",
            ],
            "{{bundle_resources_dir}}/{{source_file_part}}",
        );
        let bundle = resolved_app(std::slice::from_ref(&dep));

        assert_eq!(bundle.file_rules().len(), 1);
        assert_eq!(
            bundle.file_rules()[0].sources(),
            &[SourceFile::new("//app/res/icon.png")]
        );
        assert_eq!(
            bundle.assets_catalog_sources(),
            &[SourceFile::new(
                "//app/Assets.xcassets/AppIcon.appiconset/icon@2x.png"
            )]
        );
        assert_eq!(bundle.assets_catalog_deps().len(), 1);
        assert_eq!(
            bundle.compiled_asset_catalog_path().value(),
            "//out/Debug/App.app/Contents/Resources/Assets.car"
        );
    }

    #[test]
    fn output_files_preserve_input_order() {
        let first = bundle_data_target(
            "//app:res",
            &["//app/res/a.txt", "//app/res/b.txt"],
            "{{bundle_resources_dir}}/{{source_file_part}}",
        );
        let second = bundle_data_target(
            "//app:bin",
            &["//app/tool"],
            "{{bundle_executable_dir}}/{{source_file_part}}",
        );
        let bundle = resolved_app(&[first, second]);

        let mut out = Vec::new();
        bundle.output_files(&settings(), &mut out).unwrap();
        let values: Vec<&str> = out.iter().map(|o| o.value()).collect();
        assert_eq!(
            values,
            vec![
                "App.app/Contents/Resources/a.txt",
                "App.app/Contents/Resources/b.txt",
                "App.app/Contents/MacOS/tool",
            ]
        );
    }

    #[test]
    fn colliding_destinations_from_distinct_sources_fail() {
        let first = bundle_data_target(
            "//a:data",
            &["//a/data.txt"],
            "{{bundle_resources_dir}}/data.txt",
        );
        let second = bundle_data_target(
            "//b:data",
            &["//b/data.txt"],
            "{{bundle_resources_dir}}/{{source_file_part}}",
        );
        let bundle = resolved_app(&[first, second]);

        let mut out = Vec::new();
        let err = bundle.output_files(&settings(), &mut out).unwrap_err();
        assert_eq!(
            err,
            BundleError::OutputCollision {
                dest: OutputFile::new("App.app/Contents/Resources/data.txt"),
                first: SourceFile::new("//a/data.txt"),
                second: SourceFile::new("//b/data.txt"),
            }
        );
    }

    #[test]
    fn same_source_reaching_same_destination_is_tolerated() {
        let first = bundle_data_target(
            "//a:data",
            &["//shared/data.txt"],
            "{{bundle_resources_dir}}/{{source_file_part}}",
        );
        let second = bundle_data_target(
            "//b:data",
            &["//shared/data.txt"],
            "{{bundle_resources_dir}}/data.txt",
        );
        let bundle = resolved_app(&[first, second]);

        let mut out = Vec::new();
        bundle.output_files(&settings(), &mut out).unwrap();
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn unsupported_placeholder_is_a_config_error() {
        let dep = bundle_data_target(
            "//app:gen",
            &["//app/generated.plist"],
            "{{source_gen_dir}}/{{source_file_part}}",
        );
        let bundle = resolved_app(std::slice::from_ref(&dep));

        let mut out = Vec::new();
        let err = bundle.output_files(&settings(), &mut out).unwrap_err();
        assert!(matches!(err, BundleError::UnsupportedPlaceholder { .. }));
    }

    #[test]
    fn root_dir_collapses_to_top_level_bundle_directory() {
        let mut dirs = app_dirs();
        dirs.root_dir = SourceDir::new("//out/Debug/Bundle.app/Contents/Resources");
        dirs.contents_dir = dirs.root_dir.clone();
        dirs.resources_dir = dirs.root_dir.clone();
        dirs.executable_dir = dirs.root_dir.clone();
        let bundle = BundleData::with_dirs(dirs, PRODUCT_TYPE_APPLICATION);

        assert_eq!(
            bundle.bundle_root_dir_output(&settings()).unwrap().value(),
            "//out/Debug/Bundle.app"
        );
        assert_eq!(
            bundle
                .bundle_root_dir_output_as_dir(&settings())
                .unwrap()
                .value(),
            "//out/Debug/Bundle.app/"
        );
        assert_eq!(
            bundle.bundle_dir(&settings()).unwrap().value(),
            "//out/Debug/"
        );
    }

    #[test]
    fn root_dir_collapse_is_a_fixed_point() {
        let mut dirs = app_dirs();
        dirs.root_dir = SourceDir::new("//out/Debug/Bundle.app");
        dirs.contents_dir = dirs.root_dir.clone();
        dirs.resources_dir = dirs.root_dir.clone();
        dirs.executable_dir = dirs.root_dir.clone();
        let bundle = BundleData::with_dirs(dirs, PRODUCT_TYPE_APPLICATION);

        assert_eq!(
            bundle.bundle_root_dir_output(&settings()).unwrap().value(),
            "//out/Debug/Bundle.app"
        );
    }

    #[test]
    fn root_dir_outside_build_dir_is_an_error() {
        let mut dirs = app_dirs();
        dirs.root_dir = SourceDir::new("//elsewhere/Bundle.app");
        dirs.contents_dir = dirs.root_dir.clone();
        dirs.resources_dir = dirs.root_dir.clone();
        dirs.executable_dir = dirs.root_dir.clone();
        let bundle = BundleData::with_dirs(dirs, PRODUCT_TYPE_APPLICATION);

        assert!(matches!(
            bundle.bundle_root_dir_output(&settings()),
            Err(BundleError::RootDirNotBelowBuildDir { .. })
        ));
    }

    #[test]
    fn misplaced_resources_dir_fails_resolution() {
        let mut dirs = app_dirs();
        dirs.resources_dir = SourceDir::new("//out/Debug/Other.app/Resources");
        let mut bundle = BundleData::with_dirs(dirs, PRODUCT_TYPE_APPLICATION);

        let err = bundle
            .on_resolved(&label("//app"), TargetKind::CreateBundle)
            .unwrap_err();
        assert!(matches!(err, BundleError::DirOutsideBundleRoot { .. }));
    }

    #[test]
    fn code_signing_script_requires_outputs() {
        let mut bundle = BundleData::with_dirs(app_dirs(), PRODUCT_TYPE_APPLICATION);
        bundle.set_code_signing_script(SourceFile::new("//build/sign.py"));

        let err = bundle
            .on_resolved(&label("//app"), TargetKind::CreateBundle)
            .unwrap_err();
        assert_eq!(
            err,
            BundleError::CodeSigningNoOutputs {
                target: label("//app"),
            }
        );
    }

    #[test]
    fn code_signing_config_without_script_is_rejected() {
        let mut bundle = BundleData::with_dirs(app_dirs(), PRODUCT_TYPE_APPLICATION);
        bundle.set_code_signing_sources(vec![SourceFile::new("//app/entitlements.plist")]);

        let err = bundle
            .on_resolved(&label("//app"), TargetKind::CreateBundle)
            .unwrap_err();
        assert_eq!(
            err,
            BundleError::CodeSigningWithoutScript {
                target: label("//app"),
            }
        );
    }

    #[test]
    fn outputs_as_source_files_end_with_the_bundle_unit() {
        let dep = bundle_data_target(
            "//app:res",
            &["//app/res/icon.png"],
            "{{bundle_resources_dir}}/{{source_file_part}}",
        );
        let mut bundle = BundleData::with_dirs(app_dirs(), PRODUCT_TYPE_APPLICATION);
        bundle.set_partial_info_plist(SourceFile::new("//out/Debug/partial/Info.plist"));
        bundle.set_code_signing_script(SourceFile::new("//build/sign.py"));
        bundle.set_code_signing_outputs(vec![
            SubstitutionPattern::parse("{{bundle_contents_dir}}/_CodeSignature/CodeResources")
                .unwrap(),
        ]);
        bundle.add_bundle_dep(&dep);
        bundle
            .on_resolved(&label("//app"), TargetKind::CreateBundle)
            .unwrap();

        let outputs = bundle.outputs_as_source_files(&settings()).unwrap();
        let values: Vec<&str> = outputs.iter().map(|f| f.value()).collect();
        assert_eq!(
            values,
            vec![
                "//out/Debug/App.app/Contents/Resources/icon.png",
                "//out/Debug/partial/Info.plist",
                "//out/Debug/App.app/Contents/_CodeSignature/CodeResources",
                "//out/Debug/App.app",
            ]
        );
    }

    #[test]
    fn product_type_classification() {
        let app = BundleData::with_dirs(app_dirs(), PRODUCT_TYPE_APPLICATION);
        assert!(app.is_application());
        assert!(!app.is_framework());

        let other = BundleData::with_dirs(app_dirs(), "com.apple.product-type.bundle.unit-test");
        assert!(!other.is_application());
        assert!(!other.is_framework());
    }

    #[test]
    fn source_files_cover_rules_catalogs_and_plist() {
        let dep = bundle_data_target(
            "//app:res",
            &[
                "//app/res/a.txt",
                "//app/Assets.xcassets/Color.colorset/Contents.json",
            ],
            "{{bundle_resources_dir}}/{{source_file_part}}",
        );
        let mut bundle = BundleData::with_dirs(app_dirs(), PRODUCT_TYPE_APPLICATION);
        bundle.set_partial_info_plist(SourceFile::new("//out/Debug/partial/Info.plist"));
        bundle.add_bundle_dep(&dep);
        bundle
            .on_resolved(&label("//app"), TargetKind::CreateBundle)
            .unwrap();

        let mut sources = Vec::new();
        bundle.source_files(&mut sources);
        let values: Vec<&str> = sources.iter().map(|f| f.value()).collect();
        assert_eq!(
            values,
            vec![
                "//app/res/a.txt",
                "//app/Assets.xcassets/Color.colorset/Contents.json",
                "//out/Debug/partial/Info.plist",
            ]
        );
    }
}
