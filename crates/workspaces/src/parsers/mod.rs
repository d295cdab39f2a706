//! Parsers for the pnpm files that carry version data.
//!
//! - [`lockfile`] decodes `pnpm-lock.yaml` into locked versions per importer
//! - [`catalog`] decodes the catalogs of `pnpm-workspace.yaml`

pub mod catalog;
pub mod lockfile;

pub use catalog::{
    build_catalog_dependencies, build_catalog_dependencies_with, extract_catalogs,
    extract_workspace_file, extract_workspace_file_with,
};
pub use lockfile::{
    HIGHEST_KNOWN_LOCKFILE_VERSION, LockfileOutcome, parse_lock, pnpm_constraint, read_lock,
    strip_peer_suffix,
};
