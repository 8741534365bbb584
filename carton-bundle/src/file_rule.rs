//! One `bundle_data`-style copy rule: a list of sources and the pattern
//! describing where each lands inside the bundle.

use carton_foundation::{
    Label, OutputFile, PatternSegment, Placeholder, SourceFile, SubstitutionPattern,
};

use crate::bundle_data::BundleData;
use crate::error::BundleError;
use crate::settings::BuildSettings;

/// An immutable copy rule owned by a bundle. Built during resolution from
/// one `bundle_data` dependency; `target` is kept for diagnostics only.
#[derive(Debug, Clone)]
pub struct BundleFileRule {
    target: Label,
    sources: Vec<SourceFile>,
    destination: SubstitutionPattern,
}

impl BundleFileRule {
    pub fn new(target: Label, sources: Vec<SourceFile>, destination: SubstitutionPattern) -> Self {
        BundleFileRule {
            target,
            sources,
            destination,
        }
    }

    /// The `bundle_data` target this rule came from.
    pub fn target(&self) -> &Label {
        &self.target
    }

    pub fn sources(&self) -> &[SourceFile] {
        &self.sources
    }

    pub fn destination(&self) -> &SubstitutionPattern {
        &self.destination
    }

    /// Expands the destination pattern for one source file.
    pub fn apply_to_source(
        &self,
        settings: &BuildSettings,
        bundle: &BundleData,
        source: &SourceFile,
    ) -> Result<OutputFile, BundleError> {
        expand_pattern(&self.destination, settings, bundle, Some(source), &self.target)
    }
}

/// Expands one destination pattern inside a bundle.
///
/// Bundle destinations support the per-source name placeholders and the
/// four bundle directories. Anything else ({{source}}, the out/gen
/// directories) has no meaning inside a bundle and is a configuration
/// error, as is a per-source placeholder when no source is in play (the
/// code-signing output case).
pub(crate) fn expand_pattern(
    pattern: &SubstitutionPattern,
    settings: &BuildSettings,
    bundle: &BundleData,
    source: Option<&SourceFile>,
    target: &Label,
) -> Result<OutputFile, BundleError> {
    let unsupported = |placeholder: Placeholder| BundleError::UnsupportedPlaceholder {
        placeholder,
        pattern: pattern.as_str().to_string(),
        target: target.clone(),
    };
    let mut expanded = String::new();
    for segment in pattern.segments() {
        match segment {
            PatternSegment::Literal(text) => expanded.push_str(text),
            PatternSegment::Placeholder(placeholder) => match placeholder {
                Placeholder::SourceFilePart => match source {
                    Some(source) => expanded.push_str(source.file_part()),
                    None => return Err(unsupported(*placeholder)),
                },
                Placeholder::SourceNamePart => match source {
                    Some(source) => expanded.push_str(source.name_part()),
                    None => return Err(unsupported(*placeholder)),
                },
                Placeholder::SourceRootRelativeDir => match source {
                    Some(source) => expanded.push_str(source.source_root_relative_dir()),
                    None => return Err(unsupported(*placeholder)),
                },
                Placeholder::BundleRootDir => {
                    expanded.push_str(&bundle.dir_output_value(bundle.root_dir(), settings)?)
                }
                Placeholder::BundleContentsDir => {
                    expanded.push_str(&bundle.dir_output_value(bundle.contents_dir(), settings)?)
                }
                Placeholder::BundleResourcesDir => {
                    expanded.push_str(&bundle.dir_output_value(bundle.resources_dir(), settings)?)
                }
                Placeholder::BundleExecutableDir => {
                    expanded.push_str(&bundle.dir_output_value(bundle.executable_dir(), settings)?)
                }
                Placeholder::Source | Placeholder::SourceOutDir | Placeholder::SourceGenDir => {
                    return Err(unsupported(*placeholder));
                }
            },
        }
    }
    Ok(OutputFile::new(expanded))
}
