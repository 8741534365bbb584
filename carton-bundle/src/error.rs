//! Error taxonomy for bundle configuration and resolution.
//!
//! Every error here is a configuration problem local to one target. The
//! resolution driver reports them and stops processing the affected target;
//! nothing in this crate panics on bad build input.

use carton_foundation::{Label, OutputFile, Placeholder, SourceDir, SourceFile};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BundleError {
    /// The destination pattern used a placeholder that cannot be expanded
    /// for a bundle copy rule.
    #[error("placeholder {placeholder} is not supported in bundle destination {pattern:?} (rule from {target})")]
    UnsupportedPlaceholder {
        placeholder: Placeholder,
        pattern: String,
        target: Label,
    },

    /// Two distinct sources expanded to the same destination; one would
    /// silently overwrite the other in the assembled bundle.
    #[error("bundle output {dest} is produced by both {first} and {second}")]
    OutputCollision {
        dest: OutputFile,
        first: SourceFile,
        second: SourceFile,
    },

    /// A `bundle_data` target contributed files but declared no
    /// destination pattern.
    #[error("bundle_data target {target} declares no destination pattern")]
    MissingDestination { target: Label },

    /// One of the configured bundle directories escapes the bundle root.
    #[error("bundle directory {dir} of {target} is outside the bundle root {root_dir}")]
    DirOutsideBundleRoot {
        target: Label,
        dir: SourceDir,
        root_dir: SourceDir,
    },

    /// The bundle root must be a strict descendant of the build directory.
    #[error("bundle root {root_dir} is not below the build directory {build_dir}")]
    RootDirNotBelowBuildDir {
        root_dir: SourceDir,
        build_dir: SourceDir,
    },

    /// A code signing script was configured without any outputs.
    #[error("code signing script of {target} declares no outputs")]
    CodeSigningNoOutputs { target: Label },

    /// Code signing sources, outputs, or arguments were configured without
    /// a script to consume them.
    #[error("{target} has code signing sources, outputs, or arguments but no script")]
    CodeSigningWithoutScript { target: Label },

    /// A `create_bundle` target was resolved without its directory layout.
    #[error("create_bundle target {target} has no bundle directories configured")]
    MissingBundleDirs { target: Label },

    /// Two targets in the same graph share a label.
    #[error("target {target} is defined more than once")]
    DuplicateTarget { target: Label },

    /// A dependency edge names a target the graph does not define.
    #[error("{target} depends on undeclared target {dependency}")]
    UnknownDependency { target: Label, dependency: Label },

    /// The dependency graph is not acyclic.
    #[error("dependency cycle involving {target}")]
    DependencyCycle { target: Label },
}
