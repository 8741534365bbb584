//! Build-directory context passed to path-derivation queries.

use carton_foundation::SourceDir;

/// The per-build context the bundle queries need: where the root build
/// directory lives. Passed by shared reference everywhere; never mutated by
/// this crate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildSettings {
    build_dir: SourceDir,
}

impl BuildSettings {
    pub fn new(build_dir: SourceDir) -> Self {
        BuildSettings { build_dir }
    }

    /// The root build directory, e.g. `//out/Debug/`.
    pub fn build_dir(&self) -> &SourceDir {
        &self.build_dir
    }
}
