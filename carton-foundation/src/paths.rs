//! # Source-Tree Path Handles
//!
//! Paths in carton come in two flavors. Source-absolute paths start with
//! `//` and are relative to the source root (`//base/logging.rs`), never to
//! the current directory. Output paths are relative to the root build
//! directory and only become source-absolute once a build directory is
//! known.
//!
//! All three handles are thin wrappers around a `String` holding the
//! canonical textual form. They are cheap to clone, hashable, and ordered,
//! so they can be used directly as map keys when checking for output
//! collisions.

use std::fmt;

use thiserror::Error;

/// Errors produced when parsing path handles from untrusted input, for
/// example a build manifest.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PathError {
    /// The value does not start with the `//` source-absolute prefix.
    #[error("path {0:?} is not source-absolute (expected a leading `//`)")]
    NotSourceAbsolute(String),
    /// A file path ended with a `/`.
    #[error("source file {0:?} must not end with `/`")]
    TrailingSlash(String),
    /// An output path was absolute instead of build-directory-relative.
    #[error("output path {0:?} must be relative to the build directory")]
    NotBuildRelative(String),
}

/// A source-absolute path to a file, e.g. `//app/resources/icon.png`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourceFile(String);

impl SourceFile {
    /// Wraps an already-canonical source-absolute file path.
    ///
    /// # Panics
    ///
    /// Panics if `value` is not source-absolute or ends with `/`. Use
    /// [`SourceFile::parse`] for untrusted input.
    pub fn new(value: impl Into<String>) -> Self {
        let value = value.into();
        assert!(
            value.starts_with("//"),
            "source file must be source-absolute: {value:?}"
        );
        assert!(
            !value.ends_with('/'),
            "source file must not end with `/`: {value:?}"
        );
        SourceFile(value)
    }

    /// Validating constructor for untrusted input.
    pub fn parse(value: impl Into<String>) -> Result<Self, PathError> {
        let value = value.into();
        if !value.starts_with("//") {
            return Err(PathError::NotSourceAbsolute(value));
        }
        if value.ends_with('/') {
            return Err(PathError::TrailingSlash(value));
        }
        Ok(SourceFile(value))
    }

    /// The canonical textual form, including the `//` prefix.
    pub fn value(&self) -> &str {
        &self.0
    }

    /// The file name, everything after the last `/`.
    pub fn file_part(&self) -> &str {
        let last_slash = self.0.rfind('/').map_or(0, |i| i + 1);
        &self.0[last_slash..]
    }

    /// The file name without its extension. Dotfiles keep their full name.
    pub fn name_part(&self) -> &str {
        let file = self.file_part();
        match file.rfind('.') {
            Some(dot) if dot > 0 => &file[..dot],
            _ => file,
        }
    }

    /// The extension without the dot, if any.
    pub fn extension(&self) -> Option<&str> {
        let file = self.file_part();
        match file.rfind('.') {
            Some(dot) if dot > 0 => Some(&file[dot + 1..]),
            _ => None,
        }
    }

    /// The directory containing this file.
    pub fn dir(&self) -> SourceDir {
        let last_slash = self.0.rfind('/').expect("source file contains a slash");
        SourceDir(self.0[..last_slash + 1].to_string())
    }

    /// The containing directory relative to the source root, without the
    /// `//` prefix or a trailing slash. `//app/res/icon.png` gives
    /// `app/res`; a file directly under the root gives `""`.
    pub fn source_root_relative_dir(&self) -> &str {
        let last_slash = self.0.rfind('/').expect("source file contains a slash");
        if last_slash < 2 {
            ""
        } else {
            &self.0[2..last_slash]
        }
    }

    /// Whether this file lives inside `dir` (or a subdirectory of it).
    pub fn is_in(&self, dir: &SourceDir) -> bool {
        self.0.starts_with(dir.value())
    }
}

impl fmt::Display for SourceFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A source-absolute path to a directory, stored with a trailing `/`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourceDir(String);

impl SourceDir {
    /// Wraps a source-absolute directory path, appending the trailing `/`
    /// if missing.
    ///
    /// # Panics
    ///
    /// Panics if `value` is not source-absolute. Use [`SourceDir::parse`]
    /// for untrusted input.
    pub fn new(value: impl Into<String>) -> Self {
        let mut value = value.into();
        assert!(
            value.starts_with("//"),
            "source dir must be source-absolute: {value:?}"
        );
        if !value.ends_with('/') {
            value.push('/');
        }
        SourceDir(value)
    }

    /// Validating constructor for untrusted input.
    pub fn parse(value: impl Into<String>) -> Result<Self, PathError> {
        let value = value.into();
        if !value.starts_with("//") {
            return Err(PathError::NotSourceAbsolute(value));
        }
        Ok(SourceDir::new(value))
    }

    /// The source root itself.
    pub fn source_root() -> Self {
        SourceDir("//".to_string())
    }

    /// The canonical textual form, with the `//` prefix and trailing `/`.
    pub fn value(&self) -> &str {
        &self.0
    }

    /// The textual form without the trailing slash. The source root stays
    /// `//`.
    pub fn without_trailing_slash(&self) -> &str {
        if self.0.len() > 2 {
            self.0.trim_end_matches('/')
        } else {
            &self.0
        }
    }

    /// Appends a relative file path.
    pub fn join_file(&self, rel: &str) -> SourceFile {
        debug_assert!(!rel.starts_with('/'), "joined path must be relative: {rel:?}");
        SourceFile::new(format!("{}{}", self.0, rel))
    }

    /// Appends a relative directory path.
    pub fn join_dir(&self, rel: &str) -> SourceDir {
        debug_assert!(!rel.starts_with('/'), "joined path must be relative: {rel:?}");
        SourceDir::new(format!("{}{}", self.0, rel))
    }

    /// Whether `other` is this directory or a descendant of it.
    pub fn contains_dir(&self, other: &SourceDir) -> bool {
        other.0.starts_with(&self.0)
    }

    /// Whether `file` lives under this directory.
    pub fn contains_file(&self, file: &SourceFile) -> bool {
        file.value().starts_with(&self.0)
    }

    /// The remainder of this directory below `prefix`, without a leading
    /// slash but with the trailing one. Returns `None` when this directory
    /// is not inside `prefix`.
    pub fn strip_prefix(&self, prefix: &SourceDir) -> Option<&str> {
        self.0.strip_prefix(&prefix.0)
    }

    /// The parent directory, or `None` at the source root.
    pub fn parent(&self) -> Option<SourceDir> {
        if self.0.len() <= 2 {
            return None;
        }
        let trimmed = &self.0[..self.0.len() - 1];
        let last_slash = trimmed.rfind('/').expect("source dir contains a slash");
        Some(SourceDir(trimmed[..last_slash + 1].to_string()))
    }
}

impl fmt::Display for SourceDir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A path relative to the root build directory, e.g.
/// `App.app/Contents/Resources/icon.png`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OutputFile(String);

impl OutputFile {
    /// Wraps a build-directory-relative path.
    ///
    /// # Panics
    ///
    /// Panics if `value` is absolute. Use [`OutputFile::parse`] for
    /// untrusted input.
    pub fn new(value: impl Into<String>) -> Self {
        let value = value.into();
        assert!(
            !value.starts_with('/'),
            "output file must be build-dir-relative: {value:?}"
        );
        OutputFile(value)
    }

    /// Validating constructor for untrusted input.
    pub fn parse(value: impl Into<String>) -> Result<Self, PathError> {
        let value = value.into();
        if value.starts_with('/') {
            return Err(PathError::NotBuildRelative(value));
        }
        Ok(OutputFile(value))
    }

    /// The build-directory-relative textual form.
    pub fn value(&self) -> &str {
        &self.0
    }

    /// Resolves this output path to a source-absolute file under the given
    /// build directory.
    pub fn as_source_file(&self, build_dir: &SourceDir) -> SourceFile {
        build_dir.join_file(&self.0)
    }
}

impl fmt::Display for OutputFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
