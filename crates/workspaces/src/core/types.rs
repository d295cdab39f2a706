//! Core types for package files, workspaces, locked versions and catalogs.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::{Path, PathBuf};

/// Dependency type attached to every catalog entry.
pub const CATALOG_DEPENDENCY_TYPE: &str = "pnpm.catalog";

/// Name of the catalog declared by the top-level `catalog` field.
pub const DEFAULT_CATALOG_NAME: &str = "default";

/// Importer scope used for single-project lockfiles and the workspace root.
pub const ROOT_SCOPE: &str = ".";

/// A package manifest discovered by the caller, annotated in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageFileRecord {
    /// Project-relative path of the manifest (e.g. `packages/a/package.json`).
    pub package_file: PathBuf,

    /// Package-manager specific data.
    #[serde(default)]
    pub manager_data: ManagerData,
}

impl PackageFileRecord {
    /// Creates a record with empty manager data.
    ///
    /// # Example
    ///
    /// ```
    /// use lockscope_workspaces::PackageFileRecord;
    ///
    /// let record = PackageFileRecord::new("packages/a/package.json");
    /// assert!(record.lock_file().is_none());
    /// ```
    #[must_use]
    pub fn new(package_file: impl Into<PathBuf>) -> Self {
        Self {
            package_file: package_file.into(),
            manager_data: ManagerData::default(),
        }
    }

    /// The lockfile governing this package file, once associated.
    #[must_use]
    pub fn lock_file(&self) -> Option<&Path> {
        self.manager_data.lock_file.as_deref()
    }
}

/// Mutable data attached to a [`PackageFileRecord`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagerData {
    /// Project-relative path of the lockfile governing the package file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lock_file: Option<PathBuf>,

    /// `name` field of the manifest, when the caller knows it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package_json_name: Option<String>,
}

/// Location of a workspace configuration and its sibling lockfile.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceDescriptor {
    /// Project-relative path of `pnpm-workspace.yaml`.
    pub workspace_config_path: PathBuf,

    /// Project-relative path of `pnpm-lock.yaml` next to it.
    pub lock_file_path: PathBuf,
}

impl WorkspaceDescriptor {
    /// Project-relative workspace root directory (empty for the project root).
    #[must_use]
    pub fn root_dir(&self) -> &Path {
        self.workspace_config_path
            .parent()
            .unwrap_or_else(|| Path::new(""))
    }
}

/// Outcome of expanding a workspace's package filters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkspaceMembers {
    /// Manifest paths of every member package, rooted at the local directory.
    Resolved(Vec<PathBuf>),
    /// Expansion failed; no package file is a member.
    Failed,
}

impl WorkspaceMembers {
    /// Whether `package_file` is the path-suffix of a member manifest.
    ///
    /// The test is textual, so `packages/a/package.json` also matches
    /// `/repo/xpackages/a/package.json` and a root `package.json` matches
    /// every member.
    #[must_use]
    pub fn contains_package_file(&self, package_file: &Path) -> bool {
        match self {
            Self::Resolved(paths) => paths.iter().any(|p| is_path_suffix(p, package_file)),
            Self::Failed => false,
        }
    }
}

/// Returns true if the textual form of `package_file` ends `candidate`.
///
/// Separators are normalized to `/` before comparing.
///
/// # Example
///
/// ```
/// use lockscope_workspaces::is_path_suffix;
/// use std::path::Path;
///
/// assert!(is_path_suffix(
///     Path::new("/repo/packages/a/package.json"),
///     Path::new("packages/a/package.json"),
/// ));
/// assert!(!is_path_suffix(
///     Path::new("/repo/packages/b/package.json"),
///     Path::new("packages/a/package.json"),
/// ));
/// ```
#[must_use]
pub fn is_path_suffix(candidate: &Path, package_file: &Path) -> bool {
    slash_path(candidate).ends_with(&slash_path(package_file))
}

pub(crate) fn slash_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Member lists keyed by workspace configuration path.
///
/// A cache lives for one annotation batch. Each workspace is scanned at most
/// once while the cache is alive; reusing a cache across batches skips the
/// rescan entirely.
#[derive(Debug, Clone, Default)]
pub struct WorkspaceMatchCache {
    entries: HashMap<PathBuf, WorkspaceMembers>,
}

impl WorkspaceMatchCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached members for a workspace configuration path.
    #[must_use]
    pub fn get(&self, workspace_config_path: &Path) -> Option<&WorkspaceMembers> {
        self.entries.get(workspace_config_path)
    }

    /// Returns the cached members, computing them with `resolve` on first use.
    pub fn get_or_resolve(
        &mut self,
        workspace_config_path: &Path,
        resolve: impl FnOnce() -> WorkspaceMembers,
    ) -> &WorkspaceMembers {
        self.entries
            .entry(workspace_config_path.to_path_buf())
            .or_insert_with(resolve)
    }

    /// Number of workspaces scanned.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no workspace has been scanned yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Dependency categories tracked in lockfile importers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DependencyCategory {
    /// `dependencies`
    Dependencies,
    /// `devDependencies`
    DevDependencies,
    /// `optionalDependencies`
    OptionalDependencies,
}

impl DependencyCategory {
    /// Every category, in lockfile order.
    pub const ALL: [Self; 3] = [
        Self::Dependencies,
        Self::DevDependencies,
        Self::OptionalDependencies,
    ];

    /// Field name used in lockfiles and manifests.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dependencies => "dependencies",
            Self::DevDependencies => "devDependencies",
            Self::OptionalDependencies => "optionalDependencies",
        }
    }
}

impl fmt::Display for DependencyCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Locked versions of one importer, per category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScopeVersions {
    /// Locked `dependencies`.
    pub dependencies: BTreeMap<String, String>,
    /// Locked `devDependencies`.
    pub dev_dependencies: BTreeMap<String, String>,
    /// Locked `optionalDependencies`.
    pub optional_dependencies: BTreeMap<String, String>,
}

impl ScopeVersions {
    /// Locked versions for a category.
    #[must_use]
    pub fn get(&self, category: DependencyCategory) -> &BTreeMap<String, String> {
        match category {
            DependencyCategory::Dependencies => &self.dependencies,
            DependencyCategory::DevDependencies => &self.dev_dependencies,
            DependencyCategory::OptionalDependencies => &self.optional_dependencies,
        }
    }

    /// Mutable locked versions for a category.
    pub fn get_mut(&mut self, category: DependencyCategory) -> &mut BTreeMap<String, String> {
        match category {
            DependencyCategory::Dependencies => &mut self.dependencies,
            DependencyCategory::DevDependencies => &mut self.dev_dependencies,
            DependencyCategory::OptionalDependencies => &mut self.optional_dependencies,
        }
    }

    /// Locked version of `name` in `category`.
    #[must_use]
    pub fn version(&self, category: DependencyCategory, name: &str) -> Option<&str> {
        self.get(category).get(name).map(String::as_str)
    }
}

/// `scope → category → package → version` table read from a lockfile.
///
/// The scope is [`ROOT_SCOPE`] for single-project lockfiles, otherwise the
/// importer path as written in the lockfile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LockedVersions {
    scopes: BTreeMap<String, ScopeVersions>,
}

impl LockedVersions {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts the versions of one scope, replacing any previous entry.
    pub fn insert(&mut self, scope: impl Into<String>, versions: ScopeVersions) {
        self.scopes.insert(scope.into(), versions);
    }

    /// Versions locked for a scope.
    #[must_use]
    pub fn scope(&self, scope: &str) -> Option<&ScopeVersions> {
        self.scopes.get(scope)
    }

    /// Iterates scopes in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ScopeVersions)> {
        self.scopes.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of scopes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    /// Whether the table has no scopes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    /// Selects the importer scope governing `package_file`.
    ///
    /// The scope key is the package directory relative to the lockfile's
    /// directory, or [`ROOT_SCOPE`] when they coincide. Package files outside
    /// the lockfile's directory have no scope.
    ///
    /// # Example
    ///
    /// ```
    /// use lockscope_workspaces::{LockedVersions, ScopeVersions};
    /// use std::path::Path;
    ///
    /// let mut locked = LockedVersions::new();
    /// locked.insert("packages/a", ScopeVersions::default());
    ///
    /// assert!(locked
    ///     .for_package_file(Path::new("pnpm-lock.yaml"), Path::new("packages/a/package.json"))
    ///     .is_some());
    /// assert!(locked
    ///     .for_package_file(Path::new("pnpm-lock.yaml"), Path::new("package.json"))
    ///     .is_none());
    /// ```
    #[must_use]
    pub fn for_package_file(
        &self,
        lock_file_path: &Path,
        package_file: &Path,
    ) -> Option<&ScopeVersions> {
        let lock_dir = lock_file_path.parent().unwrap_or_else(|| Path::new(""));
        let package_dir = package_file.parent().unwrap_or_else(|| Path::new(""));
        let relative = package_dir.strip_prefix(lock_dir).ok()?;
        let scope = slash_path(relative);
        if scope.is_empty() {
            self.scope(ROOT_SCOPE)
        } else {
            self.scope(&scope)
        }
    }
}

/// Result of reading a pnpm lockfile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PnpmLock {
    /// Normalized `lockfileVersion`; absent when the lockfile was unusable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lockfile_version: Option<f64>,

    /// Locked versions per importer scope.
    pub locked_versions_with_path: LockedVersions,
}

/// A named table of pinned versions declared in `pnpm-workspace.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    /// Catalog name; [`DEFAULT_CATALOG_NAME`] for the top-level `catalog`.
    pub name: String,

    /// Dependency name to version spec, in declaration order.
    pub dependencies: IndexMap<String, String>,
}

/// Why a dependency cannot be looked up in a registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SkipReason {
    /// Empty version spec.
    Empty,
    /// `workspace:` protocol reference.
    Workspace,
    /// `catalog:` protocol reference.
    CatalogReference,
    /// Local `file:`/`link:` or path reference.
    File,
    /// Git or GitHub reference without a tag.
    GitDependency,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "empty"),
            Self::Workspace => write!(f, "workspace"),
            Self::CatalogReference => write!(f, "catalog-reference"),
            Self::File => write!(f, "file"),
            Self::GitDependency => write!(f, "git-dependency"),
        }
    }
}

/// Lookup details derived from a raw version spec.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyDetails {
    /// Datasource to query for updates (`npm`, `github-tags`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub datasource: Option<String>,

    /// Version or tag currently requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_value: Option<String>,

    /// Package actually looked up, when it differs from the dependency name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package_name: Option<String>,

    /// Set when the dependency cannot be looked up.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip_reason: Option<SkipReason>,
}

/// One entry of a catalog, ready for update lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogDependency {
    /// Canonical dependency name.
    pub dep_name: String,

    /// Always [`CATALOG_DEPENDENCY_TYPE`].
    pub dep_type: String,

    /// Name of the owning catalog.
    pub catalog_name: String,

    /// Key as written, when name normalization changed it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_key: Option<String>,

    /// Enriched lookup details.
    #[serde(flatten)]
    pub details: DependencyDetails,
}

/// Dependencies extracted from a workspace configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceFileContent {
    /// Catalog dependencies, default catalog first.
    pub deps: Vec<CatalogDependency>,

    /// Project-relative path of the workspace configuration.
    pub package_file: PathBuf,

    /// Sibling lockfile, when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lock_file: Option<PathBuf>,
}
