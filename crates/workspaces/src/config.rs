//! Resolver configuration.
//!
//! All package-file paths handed to this crate are project-relative; they are
//! resolved against [`ResolverConfig::local_dir`] whenever the filesystem is
//! touched.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default pnpm workspace configuration file name.
pub const WORKSPACE_FILE_NAME: &str = "pnpm-workspace.yaml";

/// Default pnpm lockfile name.
pub const LOCK_FILE_NAME: &str = "pnpm-lock.yaml";

/// Default package manifest file name.
pub const MANIFEST_FILE_NAME: &str = "package.json";

/// Ignore globs applied to every workspace member scan, regardless of filters.
pub const DEFAULT_IGNORE_PATTERNS: [&str; 2] = ["**/node_modules/**", "**/bower_components/**"];

/// Configuration shared by workspace location, member matching and catalog extraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResolverConfig {
    /// Directory that project-relative paths are resolved against.
    pub local_dir: PathBuf,

    /// Workspace configuration file name.
    pub workspace_file_name: String,

    /// Lockfile name, expected next to the workspace configuration.
    pub lock_file_name: String,

    /// Manifest file name identifying a package directory.
    pub manifest_file_name: String,

    /// Globs excluded from member expansion.
    pub ignore_patterns: Vec<String>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            local_dir: PathBuf::from("."),
            workspace_file_name: WORKSPACE_FILE_NAME.to_string(),
            lock_file_name: LOCK_FILE_NAME.to_string(),
            manifest_file_name: MANIFEST_FILE_NAME.to_string(),
            ignore_patterns: DEFAULT_IGNORE_PATTERNS
                .iter()
                .map(ToString::to_string)
                .collect(),
        }
    }
}

impl ResolverConfig {
    /// Creates a default configuration rooted at `local_dir`.
    ///
    /// # Example
    ///
    /// ```
    /// use lockscope_workspaces::ResolverConfig;
    /// use std::path::Path;
    ///
    /// let config = ResolverConfig::new("/repo");
    /// assert_eq!(config.local_path(Path::new("pnpm-lock.yaml")), Path::new("/repo/pnpm-lock.yaml"));
    /// ```
    #[must_use]
    pub fn new(local_dir: impl Into<PathBuf>) -> Self {
        Self {
            local_dir: local_dir.into(),
            ..Self::default()
        }
    }

    /// Loads a configuration document. Missing keys fall back to defaults.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Yaml`] if the document is not valid YAML or has mistyped fields.
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(|source| Error::Yaml { source, path: None })
    }

    /// Resolves a project-relative path against [`Self::local_dir`].
    #[must_use]
    pub fn local_path(&self, relative: &Path) -> PathBuf {
        if relative.as_os_str().is_empty() {
            return self.local_dir.clone();
        }
        self.local_dir.join(relative)
    }
}
