//! # Target Labels
//!
//! A label names one target in the build graph: `//app/resources:assets`
//! is the target `assets` defined in `//app/resources`. The shorthand
//! `//app/resources` is accepted on input and means
//! `//app/resources:resources`.
//!
//! [`LabelPattern`] is the glob form used by dependency filters:
//! `//app/*` matches every label under `//app/`, while a full label string
//! matches exactly one target.

use std::fmt;

use globset::{Glob, GlobMatcher};
use thiserror::Error;

use crate::paths::SourceDir;

/// Errors produced when parsing labels or label patterns.
#[derive(Debug, Error)]
pub enum LabelError {
    /// The label does not start with the `//` source-absolute prefix.
    #[error("label {0:?} is not source-absolute (expected a leading `//`)")]
    NotSourceAbsolute(String),
    /// The label has an empty target name, e.g. `//app:`.
    #[error("label {0:?} has an empty target name")]
    EmptyName(String),
    /// The glob in a label pattern failed to compile.
    #[error("invalid label pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },
}

/// Identity of one target: a directory and a name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Label {
    dir: SourceDir,
    name: String,
}

impl Label {
    pub fn new(dir: SourceDir, name: impl Into<String>) -> Self {
        let name = name.into();
        assert!(!name.is_empty(), "label name must not be empty");
        Label { dir, name }
    }

    /// Parses `//dir:name` or the `//dir` shorthand (name defaults to the
    /// last directory component).
    pub fn parse(value: &str) -> Result<Self, LabelError> {
        if !value.starts_with("//") {
            return Err(LabelError::NotSourceAbsolute(value.to_string()));
        }
        let (dir, name) = match value.split_once(':') {
            Some((dir, name)) => {
                if name.is_empty() {
                    return Err(LabelError::EmptyName(value.to_string()));
                }
                (dir.to_string(), name.to_string())
            }
            None => {
                let name = value
                    .trim_end_matches('/')
                    .rsplit('/')
                    .next()
                    .unwrap_or_default()
                    .to_string();
                if name.is_empty() {
                    return Err(LabelError::EmptyName(value.to_string()));
                }
                (value.to_string(), name)
            }
        };
        Ok(Label {
            dir: SourceDir::new(dir),
            name,
        })
    }

    pub fn dir(&self) -> &SourceDir {
        &self.dir
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.dir.without_trailing_slash(), self.name)
    }
}

/// A glob-like matcher over the textual form of labels.
///
/// Patterns are matched against the canonical `//dir:name` rendering, with
/// `*` spanning path separators. `//app/*` matches every label in a
/// subdirectory of `//app/`; `//app*` also covers `//app`'s own targets.
#[derive(Debug, Clone)]
pub struct LabelPattern {
    original: String,
    matcher: GlobMatcher,
}

impl LabelPattern {
    pub fn parse(pattern: &str) -> Result<Self, LabelError> {
        let glob = Glob::new(pattern).map_err(|source| LabelError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(LabelPattern {
            original: pattern.to_string(),
            matcher: glob.compile_matcher(),
        })
    }

    pub fn matches(&self, label: &Label) -> bool {
        self.matcher.is_match(label.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.original
    }
}

impl PartialEq for LabelPattern {
    fn eq(&self, other: &Self) -> bool {
        self.original == other.original
    }
}

impl Eq for LabelPattern {}

impl fmt::Display for LabelPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.original)
    }
}
