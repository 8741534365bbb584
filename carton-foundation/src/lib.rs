//! Foundation value types for the carton build tool.
//!
//! # Overview
//!
//! Everything in this crate is a small immutable value type shared by the
//! higher-level crates:
//!
//! - [`SourceFile`], [`SourceDir`], [`OutputFile`] — handles on
//!   source-absolute (`//dir/file`) and build-directory-relative paths.
//! - [`Label`] — target identity of the form `//dir:name`.
//! - [`LabelPattern`] — a glob-like matcher over labels, used for
//!   dependency filters.
//! - [`SubstitutionPattern`] — a parsed `{{placeholder}}` output-path
//!   template, expanded per source file by the bundle machinery.
//!
//! None of these types touch the filesystem; they are textual handles with
//! the invariants the rest of the build tool relies on (source-absolute
//! prefixes, trailing slashes on directories, parsed placeholder names).

mod label;
mod paths;
mod substitution;

pub use label::{Label, LabelError, LabelPattern};
pub use paths::{OutputFile, PathError, SourceDir, SourceFile};
pub use substitution::{PatternSegment, Placeholder, SubstitutionError, SubstitutionPattern};
