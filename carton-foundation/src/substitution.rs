//! # Output-Path Substitution Patterns
//!
//! Destination paths for bundle contents are written as templates:
//!
//! ```text
//! {{bundle_resources_dir}}/{{source_file_part}}
//! ```
//!
//! A [`SubstitutionPattern`] is the parsed form: a sequence of literal
//! segments and [`Placeholder`]s. Parsing validates placeholder names;
//! expansion is context-dependent and lives with the consumers (a bundle
//! knows its own directories, a script rule knows its output dir), which
//! also decide which placeholders they support.

use std::fmt;

use thiserror::Error;

/// One recognized `{{...}}` placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Placeholder {
    /// The full source-absolute path of the source file.
    Source,
    /// The file name of the source, `icon.png`.
    SourceFilePart,
    /// The file name without its extension, `icon`.
    SourceNamePart,
    /// The source directory relative to the source root, `app/resources`.
    SourceRootRelativeDir,
    /// The per-source output directory. Not available in bundle rules.
    SourceOutDir,
    /// The per-source generated-file directory. Not available in bundle
    /// rules.
    SourceGenDir,
    /// The bundle's root directory.
    BundleRootDir,
    /// The bundle's contents directory.
    BundleContentsDir,
    /// The bundle's resources directory.
    BundleResourcesDir,
    /// The bundle's executable directory.
    BundleExecutableDir,
}

impl Placeholder {
    /// The name as it appears between the braces.
    pub fn name(&self) -> &'static str {
        match self {
            Placeholder::Source => "source",
            Placeholder::SourceFilePart => "source_file_part",
            Placeholder::SourceNamePart => "source_name_part",
            Placeholder::SourceRootRelativeDir => "source_root_relative_dir",
            Placeholder::SourceOutDir => "source_out_dir",
            Placeholder::SourceGenDir => "source_gen_dir",
            Placeholder::BundleRootDir => "bundle_root_dir",
            Placeholder::BundleContentsDir => "bundle_contents_dir",
            Placeholder::BundleResourcesDir => "bundle_resources_dir",
            Placeholder::BundleExecutableDir => "bundle_executable_dir",
        }
    }

    fn from_name(name: &str) -> Option<Placeholder> {
        Some(match name {
            "source" => Placeholder::Source,
            "source_file_part" => Placeholder::SourceFilePart,
            "source_name_part" => Placeholder::SourceNamePart,
            "source_root_relative_dir" => Placeholder::SourceRootRelativeDir,
            "source_out_dir" => Placeholder::SourceOutDir,
            "source_gen_dir" => Placeholder::SourceGenDir,
            "bundle_root_dir" => Placeholder::BundleRootDir,
            "bundle_contents_dir" => Placeholder::BundleContentsDir,
            "bundle_resources_dir" => Placeholder::BundleResourcesDir,
            "bundle_executable_dir" => Placeholder::BundleExecutableDir,
            _ => return None,
        })
    }
}

impl fmt::Display for Placeholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{{{}}}}}", self.name())
    }
}

/// Errors produced when parsing a substitution pattern.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubstitutionError {
    /// The pattern names a placeholder this tool does not define.
    #[error("unknown placeholder {{{{{name}}}}} in pattern {pattern:?}")]
    UnknownPlaceholder { name: String, pattern: String },
    /// A `{{` without a closing `}}`.
    #[error("unterminated placeholder in pattern {0:?}")]
    Unterminated(String),
}

/// One parsed piece of a pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternSegment {
    Literal(String),
    Placeholder(Placeholder),
}

/// A parsed `{{placeholder}}` template for an output path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubstitutionPattern {
    original: String,
    segments: Vec<PatternSegment>,
}

impl SubstitutionPattern {
    pub fn parse(pattern: &str) -> Result<Self, SubstitutionError> {
        let mut segments = Vec::new();
        let mut rest = pattern;
        while let Some(open) = rest.find("{{") {
            if open > 0 {
                segments.push(PatternSegment::Literal(rest[..open].to_string()));
            }
            let after = &rest[open + 2..];
            let close = after
                .find("}}")
                .ok_or_else(|| SubstitutionError::Unterminated(pattern.to_string()))?;
            let name = &after[..close];
            let placeholder = Placeholder::from_name(name).ok_or_else(|| {
                SubstitutionError::UnknownPlaceholder {
                    name: name.to_string(),
                    pattern: pattern.to_string(),
                }
            })?;
            segments.push(PatternSegment::Placeholder(placeholder));
            rest = &after[close + 2..];
        }
        if !rest.is_empty() {
            segments.push(PatternSegment::Literal(rest.to_string()));
        }
        Ok(SubstitutionPattern {
            original: pattern.to_string(),
            segments,
        })
    }

    pub fn segments(&self) -> &[PatternSegment] {
        &self.segments
    }

    /// The placeholders used by this pattern, in order of appearance.
    pub fn placeholders(&self) -> impl Iterator<Item = Placeholder> + '_ {
        self.segments.iter().filter_map(|segment| match segment {
            PatternSegment::Placeholder(placeholder) => Some(*placeholder),
            PatternSegment::Literal(_) => None,
        })
    }

    /// The unparsed pattern text.
    pub fn as_str(&self) -> &str {
        &self.original
    }
}

impl fmt::Display for SubstitutionPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.original)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_mixed_pattern() {
        let pattern =
            SubstitutionPattern::parse("{{bundle_resources_dir}}/img/{{source_file_part}}").unwrap();
        assert_eq!(
            pattern.segments(),
            &[
                PatternSegment::Placeholder(Placeholder::BundleResourcesDir),
                PatternSegment::Literal("/img/".to_string()),
                PatternSegment::Placeholder(Placeholder::SourceFilePart),
            ]
        );
        assert_eq!(
            pattern.placeholders().collect::<Vec<_>>(),
            vec![Placeholder::BundleResourcesDir, Placeholder::SourceFilePart]
        );
    }

    #[test]
    fn parse_literal_only() {
        let pattern = SubstitutionPattern::parse("App.app/Contents/Info.plist").unwrap();
        assert_eq!(pattern.segments().len(), 1);
        assert_eq!(pattern.placeholders().count(), 0);
    }

    #[test]
    fn unknown_placeholder_is_an_error() {
        let err = SubstitutionPattern::parse("{{bundle_plugins_dir}}/x").unwrap_err();
        assert_eq!(
            err,
            SubstitutionError::UnknownPlaceholder {
                name: "bundle_plugins_dir".to_string(),
                pattern: "{{bundle_plugins_dir}}/x".to_string(),
            }
        );
    }

    #[test]
    fn unterminated_placeholder_is_an_error() {
        let err = SubstitutionPattern::parse("{{source").unwrap_err();
        assert_eq!(err, SubstitutionError::Unterminated("{{source".to_string()));
    }

    #[test]
    fn display_round_trips() {
        let text = "{{bundle_contents_dir}}/MacOS/{{source_name_part}}";
        let pattern = SubstitutionPattern::parse(text).unwrap();
        assert_eq!(pattern.to_string(), text);
    }
}
