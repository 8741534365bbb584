//! Bundle aggregation for the carton build tool.
//!
//! # Overview
//!
//! A platform bundle (an `.app` or `.framework` directory tree) is
//! assembled from one `create_bundle` target plus the `bundle_data`
//! targets reachable through its dependency graph. This crate owns the
//! data model for that aggregation:
//!
//! - [`BundleData`] — the per-target state: classified dependency sets,
//!   derived copy rules, directory layout, asset-catalog and code-signing
//!   metadata, and the output-path derivation queries.
//! - [`BundleFileRule`] — one copy rule (sources plus destination
//!   pattern).
//! - [`Target`] / [`TargetSpec`] / [`resolve_graph`] — the in-memory graph
//!   and the bottom-up driver that presents dependency edges to each
//!   `BundleData` and finalizes it.
//!
//! # Phases
//!
//! Resolution is single-threaded per target (the driver presents edges in
//! dependency order); once a target is resolved it is immutable and
//! freely shared across threads behind an `Arc`. All configuration
//! problems are reported as [`BundleError`] values local to one target —
//! the driver stops that target and the caller decides what else to do.

mod bundle_data;
mod error;
mod file_rule;
mod resolve;
mod settings;
mod target;
mod unique_list;

pub use bundle_data::{
    BundleData, BundleDirs, PRODUCT_TYPE_APPLICATION, PRODUCT_TYPE_FRAMEWORK,
};
pub use error::BundleError;
pub use file_rule::BundleFileRule;
pub use resolve::{TargetSpec, resolve_graph};
pub use settings::BuildSettings;
pub use target::{Target, TargetKind};
pub use unique_list::UniqueTargetList;
