//! pnpm workspace resolution for dependency tooling.
//!
//! Given the package files found in a repository, this crate works out which
//! pnpm workspace each one belongs to and which lockfile pins its versions.
//! It also reads locked versions out of `pnpm-lock.yaml` and catalog entries
//! out of `pnpm-workspace.yaml`.
//!
//! # Architecture
//!
//! Two traits mark the seams to external collaborators:
//!
//! - [`GlobExpander`] - Expands workspace package globs into directories
//! - [`DependencyEnricher`] - Normalizes dependency names and classifies version specs
//!
//! [`WalkdirGlobExpander`] and [`NpmDependencyEnricher`] are the built-in
//! implementations.
//!
//! # Workspace annotation
//!
//! ```rust,no_run
//! use lockscope_workspaces::{annotate_all, PackageFileRecord, ResolverConfig};
//!
//! let config = ResolverConfig::new("/path/to/repo");
//! let mut records = vec![
//!     PackageFileRecord::new("packages/a/package.json"),
//!     PackageFileRecord::new("packages/b/package.json"),
//! ];
//! annotate_all(&config, &mut records);
//!
//! for record in &records {
//!     if let Some(lock_file) = record.lock_file() {
//!         println!("{} -> {}", record.package_file.display(), lock_file.display());
//!     }
//! }
//! ```
//!
//! Membership is a textual suffix test on member manifest paths. A workspace
//! whose filters match its own root directory therefore matches every
//! `package.json` below it, and `xpackages/a/package.json` matches a
//! `packages/a/package.json` record.
//!
//! # Lockfiles
//!
//! ```rust
//! use lockscope_workspaces::{parse_lock, DependencyCategory};
//!
//! let outcome = parse_lock("lockfileVersion: '6.0'\ndependencies:\n  left-pad:\n    version: 1.3.0\n");
//! let lock = outcome.into_lock();
//! assert_eq!(lock.lockfile_version, Some(6.0));
//! let root = lock.locked_versions_with_path.scope(".").unwrap();
//! assert_eq!(root.version(DependencyCategory::Dependencies, "left-pad"), Some("1.3.0"));
//! ```
//!
//! # Catalogs
//!
//! ```rust
//! use lockscope_workspaces::{build_catalog_dependencies, extract_catalogs};
//!
//! let catalogs = extract_catalogs("catalog:\n  react: ^18.3.0\n")?;
//! let deps = build_catalog_dependencies(&catalogs);
//! assert_eq!(deps[0].dep_name, "react");
//! assert_eq!(deps[0].catalog_name, "default");
//! # Ok::<(), lockscope_workspaces::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod config;
pub mod core;
pub mod discovery;
pub mod enrichment;
pub mod error;
pub mod parsers;

// Re-export configuration
pub use config::ResolverConfig;

// Re-export core types
pub use core::{
    CATALOG_DEPENDENCY_TYPE, Catalog, CatalogDependency, DEFAULT_CATALOG_NAME, DependencyCategory,
    DependencyDetails, LockedVersions, ManagerData, PackageFileRecord, PnpmLock, ROOT_SCOPE,
    ScopeVersions, SkipReason, WorkspaceDescriptor, WorkspaceFileContent, WorkspaceMatchCache,
    WorkspaceMembers, is_path_suffix,
};

// Re-export traits
pub use core::{DependencyEnricher, GlobExpander};

// Re-export discovery
pub use discovery::{
    WalkdirGlobExpander, WorkspaceAnnotator, annotate_all, extract_filters, find_workspace,
    locate_workspace, resolve_member_packages,
};

// Re-export parsers
pub use parsers::{
    LockfileOutcome, build_catalog_dependencies, build_catalog_dependencies_with,
    extract_catalogs, extract_workspace_file, extract_workspace_file_with, parse_lock,
    pnpm_constraint, read_lock, strip_peer_suffix,
};

pub use enrichment::NpmDependencyEnricher;

// Re-export error types
pub use error::{Error, Result};
