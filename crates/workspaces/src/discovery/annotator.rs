//! Associates package files with the lockfile of their pnpm workspace.

use crate::config::ResolverConfig;
use crate::core::traits::GlobExpander;
use crate::core::types::{
    PackageFileRecord, WorkspaceDescriptor, WorkspaceMatchCache, WorkspaceMembers,
};
use crate::discovery::{
    WalkdirGlobExpander, extract_filters, find_workspace, resolve_member_packages,
};

/// Stamps package files with the lockfile of the workspace they belong to.
///
/// Records are processed strictly in order. The first record of a workspace
/// triggers the member scan; later records of the same workspace reuse it
/// from the [`WorkspaceMatchCache`].
#[derive(Debug, Clone)]
pub struct WorkspaceAnnotator<E = WalkdirGlobExpander> {
    config: ResolverConfig,
    expander: E,
}

impl WorkspaceAnnotator<WalkdirGlobExpander> {
    /// Creates an annotator scanning the filesystem under `config.local_dir`.
    #[must_use]
    pub fn new(config: ResolverConfig) -> Self {
        let expander = WalkdirGlobExpander::new(config.manifest_file_name.clone());
        Self { config, expander }
    }
}

impl<E: GlobExpander> WorkspaceAnnotator<E> {
    /// Creates an annotator with a custom glob expander.
    #[must_use]
    pub fn with_expander(config: ResolverConfig, expander: E) -> Self {
        Self { config, expander }
    }

    /// The configuration in use.
    #[must_use]
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Sets the lockfile of every record that belongs to a pnpm workspace.
    ///
    /// Records that already carry a lockfile are left untouched, so calling
    /// this twice is a no-op the second time. A record whose workspace cannot
    /// be resolved stays unassigned; it never affects other records.
    pub fn annotate(&self, records: &mut [PackageFileRecord], cache: &mut WorkspaceMatchCache) {
        tracing::debug!("Detecting pnpm workspaces for {} package file(s)", records.len());
        for record in records.iter_mut() {
            self.annotate_record(record, cache);
        }
    }

    fn annotate_record(&self, record: &mut PackageFileRecord, cache: &mut WorkspaceMatchCache) {
        if let Some(lock_file) = record.lock_file() {
            tracing::trace!(
                package_file = %record.package_file.display(),
                lock_file = %lock_file.display(),
                "Found an existing lockfile; skipping pnpm workspace check"
            );
            return;
        }

        let Some(workspace) = find_workspace(&self.config, &record.package_file) else {
            return;
        };

        let members = cache.get_or_resolve(&workspace.workspace_config_path, || {
            self.resolve_members(&workspace)
        });

        if members.contains_package_file(&record.package_file) {
            record.manager_data.lock_file = Some(workspace.lock_file_path);
        } else {
            tracing::trace!(
                package_file = %record.package_file.display(),
                workspace = %workspace.workspace_config_path.display(),
                "Didn't find the package in the pnpm workspace"
            );
        }
    }

    fn resolve_members(&self, workspace: &WorkspaceDescriptor) -> WorkspaceMembers {
        let filters = extract_filters(&self.config, &workspace.workspace_config_path);
        let base_dir = self.config.local_path(workspace.root_dir());

        match resolve_member_packages(
            &self.expander,
            &base_dir,
            filters.as_deref(),
            &self.config.ignore_patterns,
            &self.config.manifest_file_name,
        ) {
            Ok(paths) => WorkspaceMembers::Resolved(paths),
            Err(err) => {
                tracing::debug!(
                    workspace = %workspace.workspace_config_path.display(),
                    "Failed to expand pnpm workspace packages: {err}"
                );
                WorkspaceMembers::Failed
            }
        }
    }
}

/// Annotates `records` with a fresh cache and returns the cache.
///
/// # Example
///
/// ```no_run
/// use lockscope_workspaces::{annotate_all, PackageFileRecord, ResolverConfig};
///
/// let mut records = vec![PackageFileRecord::new("packages/a/package.json")];
/// let cache = annotate_all(&ResolverConfig::new("/repo"), &mut records);
/// assert!(cache.len() <= 1);
/// ```
pub fn annotate_all(
    config: &ResolverConfig,
    records: &mut [PackageFileRecord],
) -> WorkspaceMatchCache {
    let mut cache = WorkspaceMatchCache::new();
    WorkspaceAnnotator::new(config.clone()).annotate(records, &mut cache);
    cache
}
