//! Core abstractions for pnpm workspace resolution.
//!
//! - **Traits** - the seams for external collaborators (glob expansion, dependency enrichment)
//! - **Types** - package file records, workspace descriptors, locked versions and catalogs

pub mod traits;
pub mod types;

pub use traits::{DependencyEnricher, GlobExpander};
pub use types::{
    CATALOG_DEPENDENCY_TYPE, Catalog, CatalogDependency, DEFAULT_CATALOG_NAME,
    DependencyCategory, DependencyDetails, LockedVersions, ManagerData, PackageFileRecord,
    PnpmLock, ROOT_SCOPE, ScopeVersions, SkipReason, WorkspaceDescriptor, WorkspaceFileContent,
    WorkspaceMatchCache, WorkspaceMembers, is_path_suffix,
};
